use std::{fmt, future::Future, str::FromStr};

use crate::error::ProviderError;

/// One vendor's summarization call, normalized to plain text in and out.
pub trait Summarizer {
    fn summarize(
        &self,
        text: &str,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

/// Coarse summary-size preference supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    pub fn token_budget(self) -> u32 {
        match self {
            SummaryLength::Short => 250,
            SummaryLength::Medium => 500,
            SummaryLength::Long => 1000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }

    /// Exact match on `short`, `medium` or `long`; anything else is `Medium`.
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "short" => SummaryLength::Short,
            "long" => SummaryLength::Long,
            _ => SummaryLength::Medium,
        }
    }
}

impl FromStr for SummaryLength {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SummaryLength::parse_lenient(s))
    }
}

impl From<&str> for SummaryLength {
    fn from(value: &str) -> Self {
        SummaryLength::parse_lenient(value)
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
