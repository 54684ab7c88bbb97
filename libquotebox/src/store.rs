//! Authoritative in-memory quote collection mirrored to durable storage

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::db::{keys, KeyValueStore};
use crate::error::{Result, StorageError};
use crate::types::{default_quotes, Quote};

/// What `QuoteStore::load` found in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored collection replaced the in-memory one
    Loaded(usize),
    /// Nothing stored; in-memory collection kept
    Missing,
    /// Stored value could not be read or parsed; in-memory collection kept
    Malformed,
}

pub struct QuoteStore {
    quotes: Vec<Quote>,
    storage: Arc<dyn KeyValueStore>,
}

impl QuoteStore {
    /// Create a store seeded with the default quotes
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_quotes(storage, default_quotes())
    }

    pub fn with_quotes(storage: Arc<dyn KeyValueStore>, quotes: Vec<Quote>) -> Self {
        Self { quotes, storage }
    }

    /// Create a default-seeded store and load whatever is persisted
    pub async fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self::new(storage);
        store.load().await;
        store
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// Never fails: read and parse errors are logged and the current
    /// collection is kept.
    pub async fn load(&mut self) -> LoadOutcome {
        match self.try_load().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to load quotes from storage, keeping current quotes: {}", e);
                LoadOutcome::Malformed
            }
        }
    }

    /// Like `load`, but returns the storage error instead of logging it
    pub async fn try_load(&mut self) -> Result<LoadOutcome> {
        let stored = match self.storage.get(keys::QUOTES).await {
            Ok(Some(stored)) if !stored.is_empty() => stored,
            Ok(_) => {
                debug!("No stored quotes, keeping {} in memory", self.quotes.len());
                return Ok(LoadOutcome::Missing);
            }
            Err(e) => {
                return Err(StorageError::Read {
                    key: keys::QUOTES.to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
        };

        let quotes: Vec<Quote> =
            serde_json::from_str(&stored).map_err(|e| StorageError::Read {
                key: keys::QUOTES.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Loaded {} quotes from storage", quotes.len());
        self.quotes = quotes;
        Ok(LoadOutcome::Loaded(self.quotes.len()))
    }

    /// Persist the full collection.
    ///
    /// Failures are logged; the in-memory collection is unaffected either way.
    /// Returns whether the write succeeded.
    pub async fn save(&self) -> bool {
        match self.try_save().await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save quotes to storage: {}", e);
                false
            }
        }
    }

    /// Like `save`, but returns the storage error instead of logging it
    pub async fn try_save(&self) -> Result<()> {
        let serialized = serde_json::to_string(&self.quotes).map_err(|e| StorageError::Write {
            key: keys::QUOTES.to_string(),
            reason: e.to_string(),
        })?;

        self.storage
            .set(keys::QUOTES, &serialized)
            .await
            .map_err(|e| StorageError::Write {
                key: keys::QUOTES.to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }

    /// Append a quote. Does not check the collection for duplicates.
    pub fn add(&mut self, quote: Quote) {
        if self.contains(&quote) {
            warn!("Adding a quote that is already stored: {}", quote);
        }
        self.quotes.push(quote);
    }

    /// Append every candidate not structurally present, in candidate order.
    ///
    /// Candidates are also checked against ones accepted earlier in the same
    /// batch. Returns the number appended.
    pub fn extend_new<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = Quote>,
    {
        let mut seen: HashSet<Quote> = self.quotes.iter().cloned().collect();
        let before = self.quotes.len();

        for quote in candidates {
            if seen.insert(quote.clone()) {
                self.quotes.push(quote);
            }
        }

        self.quotes.len() - before
    }

    /// Current ordered collection
    pub fn snapshot(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn contains(&self, quote: &Quote) -> bool {
        self.quotes.contains(quote)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
