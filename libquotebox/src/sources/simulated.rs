//! Simulated quote server

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::error::Result;
use crate::sources::QuoteSource;
use crate::types::Quote;

/// The collection the simulated server always returns
pub fn server_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The greatest glory in living lies not in never falling, but in rising every time we fall.",
            "Life",
        ),
        Quote::new(
            "The future belongs to those who believe in the beauty of their dreams.",
            "Inspiration",
        ),
        Quote::new("The mind is everything. What you think you become.", "Mindfulness"),
    ]
}

/// Returns a fixed collection after a fixed latency. Never fails.
pub struct SimulatedSource {
    quotes: Vec<Quote>,
    delay: Duration,
}

impl SimulatedSource {
    pub fn new(delay: Duration) -> Self {
        Self::with_quotes(server_quotes(), delay)
    }

    pub fn with_quotes(quotes: Vec<Quote>, delay: Duration) -> Self {
        Self { quotes, delay }
    }
}

#[async_trait]
impl QuoteSource for SimulatedSource {
    async fn fetch(&self) -> Result<Vec<Quote>> {
        debug!("Simulated server responding in {:?}", self.delay);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        Ok(self.quotes.clone())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
