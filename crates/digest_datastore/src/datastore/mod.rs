use std::future::Future;

use crate::{HistoryRecord, ModelConfiguration, NewHistoryRecord, NewModelConfiguration, ProviderKind};

pub mod postgres;

#[derive(Debug, thiserror::Error)]
pub enum ModelStoreError {
    #[error("a model configuration for {provider}/{model_id} already exists")]
    Duplicate {
        provider: ProviderKind,
        model_id: String,
    },
    #[error("model configuration {0} not found")]
    NotFound(i64),
    #[error("invalid model configuration: {0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// Access to registered [`ModelConfiguration`]s.
pub trait ModelStore {
    /// All configurations in insertion order.
    fn list_models(&self) -> impl Future<Output = anyhow::Result<Vec<ModelConfiguration>>> + Send;

    fn insert_model(
        &self,
        model: &NewModelConfiguration,
    ) -> impl Future<Output = Result<ModelConfiguration, ModelStoreError>> + Send;

    /// Clears the active flag everywhere and sets it on `id`.
    fn activate_model(&self, id: i64) -> impl Future<Output = Result<(), ModelStoreError>> + Send;

    fn deactivate_model(&self, id: i64)
        -> impl Future<Output = Result<(), ModelStoreError>> + Send;
}

/// Append-only log of processed videos.
pub trait HistoryStore {
    fn insert_history(
        &self,
        record: &NewHistoryRecord,
    ) -> impl Future<Output = anyhow::Result<HistoryRecord>> + Send;

    /// Most recent first, at most `limit` records.
    fn list_history(
        &self,
        limit: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<HistoryRecord>>> + Send;

    fn get_history(
        &self,
        id: i64,
    ) -> impl Future<Output = anyhow::Result<Option<HistoryRecord>>> + Send;

    fn latest_history(&self)
        -> impl Future<Output = anyhow::Result<Option<HistoryRecord>>> + Send;
}

pub trait DataStore: ModelStore + HistoryStore {}

impl<T: ModelStore + HistoryStore> DataStore for T {}

impl<T: ModelStore + Send + Sync> ModelStore for &T {
    async fn list_models(&self) -> anyhow::Result<Vec<ModelConfiguration>> {
        (**self).list_models().await
    }

    async fn insert_model(
        &self,
        model: &NewModelConfiguration,
    ) -> Result<ModelConfiguration, ModelStoreError> {
        (**self).insert_model(model).await
    }

    async fn activate_model(&self, id: i64) -> Result<(), ModelStoreError> {
        (**self).activate_model(id).await
    }

    async fn deactivate_model(&self, id: i64) -> Result<(), ModelStoreError> {
        (**self).deactivate_model(id).await
    }
}

impl<T: HistoryStore + Send + Sync> HistoryStore for &T {
    async fn insert_history(&self, record: &NewHistoryRecord) -> anyhow::Result<HistoryRecord> {
        (**self).insert_history(record).await
    }

    async fn list_history(&self, limit: i64) -> anyhow::Result<Vec<HistoryRecord>> {
        (**self).list_history(limit).await
    }

    async fn get_history(&self, id: i64) -> anyhow::Result<Option<HistoryRecord>> {
        (**self).get_history(id).await
    }

    async fn latest_history(&self) -> anyhow::Result<Option<HistoryRecord>> {
        (**self).latest_history().await
    }
}
