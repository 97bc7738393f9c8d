use digest_datastore::{ModelConfiguration, ProviderKind};
use reqwest::Client;

use crate::{
    error::{ConfigurationError, ProviderError},
    llm::{anthropic::AnthropicClient, openai::OpenAIClient},
    Summarizer,
};

/// Builds a [`Summarizer`] for a resolved model configuration.
///
/// Adapters are constructed per request from the stored credential, so no
/// vendor client outlives the configuration it was built from.
pub trait SummarizerFactory {
    type Summarizer: Summarizer + Send + Sync;

    fn build(&self, config: &ModelConfiguration) -> Result<Self::Summarizer, ConfigurationError>;
}

impl<F: SummarizerFactory> SummarizerFactory for &F {
    type Summarizer = F::Summarizer;

    fn build(&self, config: &ModelConfiguration) -> Result<Self::Summarizer, ConfigurationError> {
        (**self).build(config)
    }
}

/// One variant per supported vendor.
#[derive(Clone)]
pub enum ProviderAdapter {
    OpenAI(OpenAIClient),
    Anthropic(AnthropicClient),
}

impl ProviderAdapter {
    pub fn provider(&self) -> ProviderKind {
        match self {
            ProviderAdapter::OpenAI(_) => ProviderKind::OpenAI,
            ProviderAdapter::Anthropic(_) => ProviderKind::Anthropic,
        }
    }
}

impl Summarizer for ProviderAdapter {
    async fn summarize(&self, text: &str, max_tokens: u32) -> Result<String, ProviderError> {
        match self {
            ProviderAdapter::OpenAI(client) => client.summarize(text, max_tokens).await,
            ProviderAdapter::Anthropic(client) => client.summarize(text, max_tokens).await,
        }
    }
}

/// The production factory: maps a provider kind to its HTTP adapter.
#[derive(Clone)]
pub struct ProviderRegistry {
    http_client: Client,
    openai_base_url: String,
    anthropic_base_url: String,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self {
            http_client: Client::new(),
            openai_base_url: crate::llm::openai::DEFAULT_BASE_URL.into(),
            anthropic_base_url: crate::llm::anthropic::DEFAULT_BASE_URL.into(),
        }
    }
}

impl ProviderRegistry {
    pub fn with_openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai_base_url = url.into();
        self
    }

    pub fn with_anthropic_base_url(mut self, url: impl Into<String>) -> Self {
        self.anthropic_base_url = url.into();
        self
    }

    pub fn supports(provider: &ProviderKind) -> bool {
        !matches!(provider, ProviderKind::Other(_))
    }
}

impl SummarizerFactory for ProviderRegistry {
    type Summarizer = ProviderAdapter;

    fn build(&self, config: &ModelConfiguration) -> Result<ProviderAdapter, ConfigurationError> {
        let adapter = match &config.provider {
            ProviderKind::OpenAI => ProviderAdapter::OpenAI(
                OpenAIClient::new(&config.api_key, &config.model_id)
                    .with_base_url(&self.openai_base_url)
                    .with_http_client(self.http_client.clone()),
            ),
            ProviderKind::Anthropic => ProviderAdapter::Anthropic(
                AnthropicClient::new(&config.api_key, &config.model_id)
                    .with_base_url(&self.anthropic_base_url)
                    .with_http_client(self.http_client.clone()),
            ),
            other @ ProviderKind::Other(_) => {
                return Err(ConfigurationError::UnsupportedProvider(other.clone()))
            }
        };

        Ok(adapter)
    }
}
