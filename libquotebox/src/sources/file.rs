//! Quote source backed by a JSON file
//!
//! Stands in for a server that publishes its collection as a JSON array.
//! The file is re-read on every fetch.

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;

use crate::codec;
use crate::error::{Result, SyncError};
use crate::sources::QuoteSource;
use crate::types::Quote;

pub struct FileSource {
    path: PathBuf,
    delay: Duration,
}

impl FileSource {
    pub fn new(path: PathBuf, delay: Duration) -> Self {
        Self { path, delay }
    }

    fn fetch_error(&self, reason: impl std::fmt::Display) -> SyncError {
        SyncError::Fetch {
            source_name: format!("{} ({})", self.name(), self.path.display()),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl QuoteSource for FileSource {
    async fn fetch(&self) -> Result<Vec<Quote>> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.fetch_error(e))?;

        codec::parse(&text).map_err(|e| self.fetch_error(e).into())
    }

    fn name(&self) -> &str {
        "file"
    }
}
