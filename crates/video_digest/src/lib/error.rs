use digest_datastore::ProviderKind;

/// Bad caller input. Never wrapped, never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty transcript")]
    EmptyTranscript,
    #[error("invalid YouTube URL: {0}")]
    InvalidUrl(String),
}

/// No usable model could be resolved for a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no active model configured")]
    NoActiveModel,
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(ProviderKind),
}

/// A vendor call failed. Carries the vendor and its original error text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{provider} request failed: {message}")]
pub struct ProviderError {
    pub provider: ProviderKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: ProviderKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
        }
    }
}

/// Outward error of `generate_summary`.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}; register a model and activate it first")]
    Configuration(#[from] ConfigurationError),
    #[error("failed to generate summary: {0}")]
    Summarization(String),
}

impl From<ProviderError> for SummarizeError {
    fn from(err: ProviderError) -> Self {
        SummarizeError::Summarization(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to get video transcript: {0:#}")]
    Transcript(anyhow::Error),
    #[error(transparent)]
    Summary(#[from] SummarizeError),
    #[error("failed to save history: {0:#}")]
    Store(anyhow::Error),
}

impl ProcessError {
    /// True when the caller sent something unusable, as opposed to a
    /// downstream failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ProcessError::Validation(_)
                | ProcessError::Transcript(_)
                | ProcessError::Summary(SummarizeError::Validation(_))
        )
    }
}
