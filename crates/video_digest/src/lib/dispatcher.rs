use digest_datastore::{ModelConfiguration, ModelStore};

use crate::{
    error::{ConfigurationError, SummarizeError, ValidationError},
    llm::registry::SummarizerFactory,
    models::select_active_model,
    Summarizer, SummaryLength,
};

/// Runs one summarization request against whichever model is active.
#[derive(Debug, Clone)]
pub struct SummaryDispatcher<M, F> {
    store: M,
    factory: F,
}

impl<M, F> SummaryDispatcher<M, F>
where
    M: ModelStore + Send + Sync,
    F: SummarizerFactory + Send + Sync,
{
    pub fn new(store: M, factory: F) -> Self {
        Self { store, factory }
    }

    pub fn store(&self) -> &M {
        &self.store
    }

    /// Resolves the configuration used for the next request.
    pub async fn active_model(&self) -> Result<ModelConfiguration, SummarizeError> {
        let models = self
            .store
            .list_models()
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to load model configurations"))
            .map_err(|e| SummarizeError::Summarization(format!("{e:#}")))?;

        select_active_model(&models)
            .cloned()
            .ok_or(ConfigurationError::NoActiveModel.into())
    }

    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn dispatch(
        &self,
        text: &str,
        length: SummaryLength,
    ) -> Result<String, SummarizeError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyTranscript.into());
        }

        let config = self.active_model().await?;
        let max_tokens = length.token_budget();

        let summarizer = self
            .factory
            .build(&config)
            .inspect_err(|e| tracing::error!(error = %e, model = config.id, "Unusable model configuration"))?;

        let summary = summarizer
            .summarize(text, max_tokens)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    provider = %config.provider,
                    model_id = %config.model_id,
                    "Summarization failed"
                )
            })?;

        tracing::info!(
            provider = %config.provider,
            model_id = %config.model_id,
            max_tokens,
            summary_len = summary.len(),
            "Generated summary"
        );

        Ok(summary)
    }
}
