use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use digest_datastore::{
    HistoryRecord, HistoryStore, ModelConfiguration, ModelStore, ModelStoreError,
    NewHistoryRecord, NewModelConfiguration, ProviderKind,
};

/// In-memory stand-in for the Postgres store. Rows keep insertion order and
/// the `(provider, model_id)` uniqueness rule.
#[derive(Clone, Default)]
pub struct MockDataStore {
    pub models: Arc<Mutex<Vec<ModelConfiguration>>>,
    pub history: Arc<Mutex<Vec<HistoryRecord>>>,
    pub fail_with: Option<String>,
}

impl MockDataStore {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn with_model(self, provider: &str, model_id: &str, is_active: bool) -> Self {
        {
            let mut models = self.models.lock().unwrap();
            let id = models.len() as i64 + 1;
            models.push(ModelConfiguration {
                id,
                name: format!("{provider} {model_id}"),
                provider: ProviderKind::from(provider),
                model_id: model_id.to_string(),
                api_key: format!("key-{id}"),
                is_active,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            });
        }
        self
    }

    pub fn active_ids(&self) -> Vec<i64> {
        self.models
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.is_active)
            .map(|m| m.id)
            .collect()
    }

    fn check_failure(&self) -> anyhow::Result<()> {
        match self.fail_with {
            Some(ref msg) => Err(anyhow::anyhow!("{}", msg)),
            None => Ok(()),
        }
    }
}

impl ModelStore for MockDataStore {
    async fn list_models(&self) -> anyhow::Result<Vec<ModelConfiguration>> {
        self.check_failure()?;
        Ok(self.models.lock().unwrap().clone())
    }

    async fn insert_model(
        &self,
        model: &NewModelConfiguration,
    ) -> Result<ModelConfiguration, ModelStoreError> {
        self.check_failure()?;
        let mut models = self.models.lock().unwrap();

        if models
            .iter()
            .any(|m| m.provider == model.provider && m.model_id == model.model_id)
        {
            return Err(ModelStoreError::Duplicate {
                provider: model.provider.clone(),
                model_id: model.model_id.clone(),
            });
        }

        let config = ModelConfiguration {
            id: models.iter().map(|m| m.id).max().unwrap_or(0) + 1,
            name: model.name.clone(),
            provider: model.provider.clone(),
            model_id: model.model_id.clone(),
            api_key: model.api_key.clone(),
            is_active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        models.push(config.clone());
        Ok(config)
    }

    async fn activate_model(&self, id: i64) -> Result<(), ModelStoreError> {
        self.check_failure()?;
        let mut models = self.models.lock().unwrap();

        if !models.iter().any(|m| m.id == id) {
            return Err(ModelStoreError::NotFound(id));
        }
        for model in models.iter_mut() {
            model.is_active = model.id == id;
        }
        Ok(())
    }

    async fn deactivate_model(&self, id: i64) -> Result<(), ModelStoreError> {
        self.check_failure()?;
        let mut models = self.models.lock().unwrap();

        let model = models
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ModelStoreError::NotFound(id))?;
        model.is_active = false;
        Ok(())
    }
}

impl HistoryStore for MockDataStore {
    async fn insert_history(&self, record: &NewHistoryRecord) -> anyhow::Result<HistoryRecord> {
        self.check_failure()?;
        let mut history = self.history.lock().unwrap();

        let id = history.len() as i64 + 1;
        let saved = HistoryRecord {
            id,
            video_url: record.video_url.clone(),
            title: record.title.clone(),
            duration: record.duration.clone(),
            thumbnail_url: record.thumbnail_url.clone(),
            transcript: record.transcript.clone(),
            summary: record.summary.clone(),
            summary_length: record.summary_length.clone(),
            // strictly increasing so ordering by time is deterministic
            created_at: Utc::now() + Duration::seconds(id),
        };
        history.push(saved.clone());
        Ok(saved)
    }

    async fn list_history(&self, limit: i64) -> anyhow::Result<Vec<HistoryRecord>> {
        self.check_failure()?;
        let history = self.history.lock().unwrap();
        Ok(history
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get_history(&self, id: i64) -> anyhow::Result<Option<HistoryRecord>> {
        self.check_failure()?;
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn latest_history(&self) -> anyhow::Result<Option<HistoryRecord>> {
        Ok(self.list_history(1).await?.into_iter().next())
    }
}
