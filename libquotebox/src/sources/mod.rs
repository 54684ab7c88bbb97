//! Remote quote sources
//!
//! A source is whatever the sync service merges from. Quotebox ships a
//! simulated server (a fixed set returned after a delay) and a file-backed
//! source; tests use [`mock::MockSource`].
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use libquotebox::sources::{QuoteSource, simulated::SimulatedSource};
//!
//! # async fn example() -> libquotebox::error::Result<()> {
//! let source = SimulatedSource::new(Duration::from_secs(3));
//! let quotes = source.fetch().await?;
//! println!("{} sent {} quotes", source.name(), quotes.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{expand_path, SyncConfig};
use crate::error::Result;
use crate::types::Quote;

pub mod file;
pub mod simulated;

// Available outside tests so integration tests can drive the sync service
pub mod mock;

/// An asynchronous supplier of quotes to merge
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the remote collection.
    ///
    /// May take arbitrarily long; there is no cancellation.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Fetch` when the source cannot deliver.
    async fn fetch(&self) -> Result<Vec<Quote>>;

    /// Short identifier used in logs and errors
    fn name(&self) -> &str;
}

/// Build the source described by the sync configuration
pub fn from_config(config: &SyncConfig) -> Arc<dyn QuoteSource> {
    match &config.source_file {
        Some(path) => Arc::new(file::FileSource::new(expand_path(path), config.delay())),
        None => Arc::new(simulated::SimulatedSource::new(config.delay())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_defaults_to_simulated() {
        let source = from_config(&SyncConfig::default());
        assert_eq!(source.name(), "simulated");
    }

    #[test]
    fn test_from_config_with_file() {
        let config = SyncConfig {
            source_file: Some("/tmp/server.json".to_string()),
            ..Default::default()
        };
        let source = from_config(&config);
        assert_eq!(source.name(), "file");
    }
}
