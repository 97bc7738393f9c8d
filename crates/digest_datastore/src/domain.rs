use std::{convert::Infallible, fmt, str::FromStr};

use chrono::{DateTime, Utc};

/// The LLM vendor family a [`ModelConfiguration`] targets.
///
/// Unknown vendors are kept verbatim so that rows written by newer versions
/// still load; they are rejected only when an adapter is requested for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Other(String),
}

impl ProviderKind {
    /// Provider used when no configuration carries the active flag.
    pub const DEFAULT: ProviderKind = ProviderKind::OpenAI;

    pub fn as_str(&self) -> &str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Other(name) => name,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Ok(match name.as_str() {
            "openai" => ProviderKind::OpenAI,
            "anthropic" => ProviderKind::Anthropic,
            _ => ProviderKind::Other(name),
        })
    }
}

impl From<&str> for ProviderKind {
    fn from(value: &str) -> Self {
        value.parse().unwrap_or_else(|never: Infallible| match never {})
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered LLM credential/target.
#[derive(Clone, PartialEq, Eq)]
pub struct ModelConfiguration {
    pub id: i64,
    pub name: String,
    pub provider: ProviderKind,
    pub model_id: String,
    pub api_key: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// the api key must never end up in logs
impl fmt::Debug for ModelConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfiguration")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("model_id", &self.model_id)
            .field("api_key", &"<redacted>")
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Fields submitted when registering a [`ModelConfiguration`].
#[derive(Clone, PartialEq, Eq)]
pub struct NewModelConfiguration {
    pub name: String,
    pub provider: ProviderKind,
    pub model_id: String,
    pub api_key: String,
}

impl fmt::Debug for NewModelConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewModelConfiguration")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("model_id", &self.model_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// One completed processing of a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub id: i64,
    pub video_url: String,
    pub title: Option<String>,
    pub duration: Option<String>,
    pub thumbnail_url: Option<String>,
    pub transcript: String,
    pub summary: String,
    pub summary_length: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewHistoryRecord {
    pub video_url: String,
    pub title: Option<String>,
    pub duration: Option<String>,
    pub thumbnail_url: Option<String>,
    pub transcript: String,
    pub summary: String,
    pub summary_length: String,
}
