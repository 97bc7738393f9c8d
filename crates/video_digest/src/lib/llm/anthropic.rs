use digest_datastore::ProviderKind;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::ProviderError, llm::system_prompt, Summarizer};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const USER_PREFIX: &str = "Please summarize the following text, focusing on key points: ";

#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AnthropicError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("No text block in response")]
    EmptyResponse,
}

impl From<AnthropicError> for ProviderError {
    fn from(err: AnthropicError) -> Self {
        ProviderError::new(ProviderKind::Anthropic, err.to_string())
    }
}

impl AnthropicClient {
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

    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn build_request_body(&self, text: &str, max_tokens: u32) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "system": system_prompt(max_tokens),
            "messages": [
                {
                    "role": "user",
                    "content": format!("{USER_PREFIX}{text}")
                }
            ]
        })
    }

    pub async fn send_messages_request(
        &self,
        text: &str,
        max_tokens: u32,
    ) -> Result<MessagesResponse, AnthropicError> {
        let body = self.build_request_body(text, max_tokens);

        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(AnthropicError::Api { status, message });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str::<MessagesResponse>(&body)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to decode response"))?)
    }
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

impl MessagesResponse {
    fn into_summary(self) -> Result<String, AnthropicError> {
        self.content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AnthropicError::EmptyResponse)
    }
}

impl Summarizer for AnthropicClient {
    async fn summarize(&self, text: &str, max_tokens: u32) -> Result<String, ProviderError> {
        let response = self
            .send_messages_request(text, max_tokens)
            .await
            .inspect_err(|e| tracing::error!(error = %e, model = %self.model, "Failed to summarize content"))?;

        Ok(response.into_summary()?)
    }
}
