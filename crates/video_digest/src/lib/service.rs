use digest_datastore::{ModelConfiguration, ModelStore, ModelStoreError, ProviderKind};

use crate::{
    dispatcher::SummaryDispatcher, error::SummarizeError, llm::registry::SummarizerFactory,
    models::prepare_registration, SummaryLength,
};

/// Entry point for everything that needs a summary or manages models.
#[derive(Debug, Clone)]
pub struct SummaryService<M, F> {
    dispatcher: SummaryDispatcher<M, F>,
}

impl<M, F> SummaryService<M, F>
where
    M: ModelStore + Send + Sync,
    F: SummarizerFactory + Send + Sync,
{
    pub fn new(store: M, factory: F) -> Self {
        Self {
            dispatcher: SummaryDispatcher::new(store, factory),
        }
    }

    pub fn store(&self) -> &M {
        self.dispatcher.store()
    }

    pub async fn generate_summary(
        &self,
        text: &str,
        length: impl Into<SummaryLength>,
    ) -> Result<String, SummarizeError> {
        self.dispatcher.dispatch(text, length.into()).await
    }

    pub async fn get_active_model(&self) -> Result<ModelConfiguration, SummarizeError> {
        self.dispatcher.active_model().await
    }

    #[tracing::instrument(skip(self, api_key))]
    pub async fn register_model(
        &self,
        name: &str,
        provider: ProviderKind,
        model_id: &str,
        api_key: &str,
    ) -> Result<ModelConfiguration, ModelStoreError> {
        let new = prepare_registration(name, provider, model_id, api_key)?;

        let model = self
            .store()
            .insert_model(&new)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to register model"))?;

        tracing::info!(id = model.id, provider = %model.provider, model_id = %model.model_id, "Registered model");
        Ok(model)
    }

    #[tracing::instrument(skip(self))]
    pub async fn activate_model(&self, id: i64) -> Result<(), ModelStoreError> {
        self.store()
            .activate_model(id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to activate model"))?;
        tracing::info!("Activated model");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn deactivate_model(&self, id: i64) -> Result<(), ModelStoreError> {
        self.store()
            .deactivate_model(id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to deactivate model"))?;
        tracing::info!("Deactivated model");
        Ok(())
    }

    pub async fn list_models(&self) -> anyhow::Result<Vec<ModelConfiguration>> {
        self.store().list_models().await
    }
}
