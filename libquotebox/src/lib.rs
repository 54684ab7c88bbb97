//! Quotebox - a random quote library with import, export and remote sync
//!
//! The library keeps an ordered collection of quote/category pairs,
//! persists it in SQLite, picks random quotes by category, and merges in
//! quotes from a remote source without creating duplicates.

pub mod codec;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod service;
pub mod sources;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use db::{Database, KeyValueStore};
pub use error::{QuoteboxError, Result};
pub use service::QuoteService;
pub use store::QuoteStore;
pub use types::{CategoryFilter, Quote, Severity, StatusMessage};
