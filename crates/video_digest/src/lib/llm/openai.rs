use digest_datastore::ProviderKind;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::ProviderError, llm::system_prompt, Summarizer};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("No content in response")]
    EmptyResponse,
}

impl From<OpenAIError> for ProviderError {
    fn from(err: OpenAIError) -> Self {
        ProviderError::new(ProviderKind::OpenAI, err.to_string())
    }
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Reuse a pooled client instead of opening a new one per adapter
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn build_request_body(&self, user_content: &str, max_tokens: u32) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "messages": [
                {
                    "role": "system",
                    "content": system_prompt(max_tokens)
                },
                {
                    "role": "user",
                    "content": user_content
                }
            ]
        })
    }

    pub async fn send_completion_request(
        &self,
        user_content: &str,
        max_tokens: u32,
    ) -> Result<CompletionResponse, OpenAIError> {
        let body = self.build_request_body(user_content, max_tokens);

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str::<CompletionResponse>(&body)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to decode response"))?)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    fn into_summary(self) -> Result<String, OpenAIError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(OpenAIError::EmptyResponse)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: Option<String>,
}

impl Summarizer for OpenAIClient {
    async fn summarize(&self, text: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let response = self
            .send_completion_request(text, max_tokens)
            .await
            .inspect_err(|e| tracing::error!(error = %e, model = %self.model, "Failed to summarize content"))?;

        Ok(response.into_summary()?)
    }
}
