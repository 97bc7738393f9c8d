use std::sync::{Arc, Mutex};

use digest_datastore::{ModelConfiguration, ProviderKind};
use video_digest::{
    error::{ConfigurationError, ProviderError},
    Summarizer, SummarizerFactory,
};

/// Records every adapter it builds and every summarize call made through them.
#[derive(Clone)]
pub struct MockSummarizerFactory {
    pub summary: String,
    pub builds: Arc<Mutex<Vec<i64>>>,
    pub calls: Arc<Mutex<Vec<(String, u32)>>>,
    pub fail_with: Option<String>,
}

impl MockSummarizerFactory {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            builds: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }
}

pub struct MockSummarizer {
    provider: ProviderKind,
    summary: String,
    calls: Arc<Mutex<Vec<(String, u32)>>>,
    fail_with: Option<String>,
}

impl SummarizerFactory for MockSummarizerFactory {
    type Summarizer = MockSummarizer;

    fn build(&self, config: &ModelConfiguration) -> Result<MockSummarizer, ConfigurationError> {
        if let ProviderKind::Other(_) = config.provider {
            return Err(ConfigurationError::UnsupportedProvider(
                config.provider.clone(),
            ));
        }
        self.builds.lock().unwrap().push(config.id);
        Ok(MockSummarizer {
            provider: config.provider.clone(),
            summary: self.summary.clone(),
            calls: self.calls.clone(),
            fail_with: self.fail_with.clone(),
        })
    }
}

impl Summarizer for MockSummarizer {
    async fn summarize(&self, text: &str, max_tokens: u32) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), max_tokens));
        if let Some(ref msg) = self.fail_with {
            return Err(ProviderError::new(self.provider.clone(), msg.clone()));
        }
        Ok(self.summary.clone())
    }
}
