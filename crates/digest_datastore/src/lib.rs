//! # DataStore Module
//!
//! Persistence for the two record kinds the summarizer works with: registered
//! LLM model configurations and the history of processed videos.
//!
//! Postgres is accessed through sqlx. The [`ModelStore`] and [`HistoryStore`]
//! traits are the seam the rest of the workspace depends on, so tests can swap
//! in an in-memory store.

mod datastore;
mod domain;

pub use datastore::postgres::PgDataStore;
pub use datastore::{DataStore, HistoryStore, ModelStore, ModelStoreError};
pub use domain::{
    HistoryRecord, ModelConfiguration, NewHistoryRecord, NewModelConfiguration, ProviderKind,
};
