//! Mock quote source for testing
//!
//! Configurable success/failure and latency, with call counting and a
//! shared, mutable remote collection so tests can change what the "server"
//! returns between syncs.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::error::{Result, SyncError};
use crate::sources::QuoteSource;
use crate::types::Quote;

/// Configuration for mock source behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub name: String,

    /// Whether fetch should succeed
    pub fetch_succeeds: bool,

    /// Error to return on fetch failure
    pub fetch_error: Option<String>,

    /// Delay before completing a fetch
    pub delay: Duration,

    /// Collection returned on success
    pub quotes: Arc<Mutex<Vec<Quote>>>,

    /// Number of times fetch has been called
    pub fetch_call_count: Arc<Mutex<usize>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            fetch_succeeds: true,
            fetch_error: None,
            delay: Duration::from_millis(0),
            quotes: Arc::new(Mutex::new(Vec::new())),
            fetch_call_count: Arc::new(Mutex::new(0)),
        }
    }
}

/// Mock source for testing
pub struct MockSource {
    config: MockConfig,
}

impl MockSource {
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// A source that returns `quotes` immediately
    pub fn returning(quotes: Vec<Quote>) -> Self {
        Self::new(MockConfig {
            quotes: Arc::new(Mutex::new(quotes)),
            ..Default::default()
        })
    }

    /// A source that returns `quotes` after `delay`
    pub fn with_delay(quotes: Vec<Quote>, delay: Duration) -> Self {
        Self::new(MockConfig {
            quotes: Arc::new(Mutex::new(quotes)),
            delay,
            ..Default::default()
        })
    }

    /// A source whose fetch always fails
    pub fn failing(error: &str) -> Self {
        Self::new(MockConfig {
            fetch_succeeds: false,
            fetch_error: Some(error.to_string()),
            ..Default::default()
        })
    }

    /// Replace the collection returned by later fetches
    pub fn set_quotes(&self, quotes: Vec<Quote>) {
        *self.config.quotes.lock().unwrap() = quotes;
    }

    /// Number of times fetch was called
    pub fn fetch_call_count(&self) -> usize {
        *self.config.fetch_call_count.lock().unwrap()
    }
}

#[async_trait]
impl QuoteSource for MockSource {
    async fn fetch(&self) -> Result<Vec<Quote>> {
        *self.config.fetch_call_count.lock().unwrap() += 1;

        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }

        if self.config.fetch_succeeds {
            Ok(self.config.quotes.lock().unwrap().clone())
        } else {
            let reason = self
                .config
                .fetch_error
                .clone()
                .unwrap_or_else(|| "Mock fetch failed".to_string());
            Err(SyncError::Fetch {
                source_name: self.config.name.clone(),
                reason,
            }
            .into())
        }
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_success() {
        let source = MockSource::returning(vec![Quote::new("A", "X")]);

        assert_eq!(source.name(), "mock");
        assert_eq!(source.fetch().await.unwrap(), vec![Quote::new("A", "X")]);
        assert_eq!(source.fetch_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let source = MockSource::failing("Connection refused");

        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("Connection refused"));
        assert_eq!(source.fetch_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_set_quotes() {
        let source = MockSource::returning(vec![]);
        assert!(source.fetch().await.unwrap().is_empty());

        source.set_quotes(vec![Quote::new("B", "Y")]);
        assert_eq!(source.fetch().await.unwrap(), vec![Quote::new("B", "Y")]);
        assert_eq!(source.fetch_call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_with_delay() {
        let source = MockSource::with_delay(vec![], Duration::from_millis(50));

        let start = std::time::Instant::now();
        source.fetch().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
