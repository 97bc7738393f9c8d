mod dispatcher;
pub mod error;
pub mod export;
mod llm;
pub mod models;
pub mod parser;
mod processor;
mod service;
pub mod tracing;
pub mod yt;

pub use dispatcher::SummaryDispatcher;
pub use llm::{anthropic, openai};
pub use llm::{
    registry::{ProviderAdapter, ProviderRegistry, SummarizerFactory},
    summarizer::{Summarizer, SummaryLength},
};
pub use processor::{builder::VideoProcessorBuilder, VideoProcessor};
pub use service::SummaryService;
