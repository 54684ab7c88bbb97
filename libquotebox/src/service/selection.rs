//! Category filtering and random selection
//!
//! Categories are derived from the collection on every call. Applying a
//! filter remembers it in durable storage; picking a quote remembers it in
//! the session store.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use super::events::{Event, EventBus};
use super::SharedStore;
use crate::db::{keys, KeyValueStore};
use crate::types::{CategoryFilter, Quote};

/// Distinct categories in first-seen order
pub fn categories_of(quotes: &[Quote]) -> Vec<String> {
    let mut seen = HashSet::new();
    quotes
        .iter()
        .filter(|quote| seen.insert(quote.category.as_str()))
        .map(|quote| quote.category.clone())
        .collect()
}

/// Category option list as shown to the user: "all" first
pub fn category_options(quotes: &[Quote]) -> Vec<String> {
    std::iter::once(CategoryFilter::ALL.to_string())
        .chain(categories_of(quotes))
        .collect()
}

/// Quotes matching `filter`, in collection order
pub fn filter_quotes(quotes: &[Quote], filter: &CategoryFilter) -> Vec<Quote> {
    quotes
        .iter()
        .filter(|quote| filter.matches(quote))
        .cloned()
        .collect()
}

/// Result of picking from a candidate subset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    Quote(Quote),
    /// The subset was empty
    NoQuote,
}

impl Pick {
    pub const EMPTY_MESSAGE: &'static str = "No quotes in this category.";

    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Pick::Quote(quote) => Some(quote),
            Pick::NoQuote => None,
        }
    }
}

impl std::fmt::Display for Pick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pick::Quote(quote) => write!(f, "{}", quote),
            Pick::NoQuote => write!(f, "{}", Self::EMPTY_MESSAGE),
        }
    }
}

/// Uniform pick using the thread RNG
pub fn pick(subset: &[Quote]) -> Pick {
    pick_with(subset, &mut rand::thread_rng())
}

/// Uniform pick using `rng`
pub fn pick_with<R: Rng + ?Sized>(subset: &[Quote], rng: &mut R) -> Pick {
    if subset.is_empty() {
        return Pick::NoQuote;
    }
    let index = rng.gen_range(0..subset.len());
    Pick::Quote(subset[index].clone())
}

/// A filter together with the quote it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub filter: CategoryFilter,
    pub pick: Pick,
}

/// Selection service
///
/// Owns the "which category, which quote" state: the persisted filter in
/// durable storage and the last viewed quote in the session store.
#[derive(Clone)]
pub struct SelectionService {
    store: SharedStore,
    local: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    event_bus: EventBus,
}

impl SelectionService {
    pub fn new(
        store: SharedStore,
        local: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store,
            local,
            session,
            event_bus,
        }
    }

    /// Current category option list, "all" first
    pub async fn categories(&self) -> Vec<String> {
        let store = self.store.lock().await;
        category_options(store.snapshot())
    }

    /// Narrow the collection to `filter` and remember the filter.
    ///
    /// The filter is persisted even when nothing matches.
    pub async fn apply(&self, filter: &CategoryFilter) -> Vec<Quote> {
        let subset = {
            let store = self.store.lock().await;
            filter_quotes(store.snapshot(), filter)
        };

        if let Err(e) = self.local.set(keys::LAST_CATEGORY_FILTER, filter.as_str()).await {
            warn!("Failed to persist category filter '{}': {}", filter, e);
        }

        debug!("Filter '{}' matched {} quotes", filter, subset.len());
        subset
    }

    /// Apply `filter` and pick a random quote from the result
    pub async fn show_random(&self, filter: &CategoryFilter) -> Selection {
        let subset = self.apply(filter).await;
        let pick = pick(&subset);

        match &pick {
            Pick::Quote(quote) => {
                self.remember_viewed(quote).await;
                self.event_bus.emit(Event::QuoteShown {
                    quote: quote.clone(),
                    filter: filter.to_string(),
                });
            }
            Pick::NoQuote => self.event_bus.emit(Event::NoQuoteInCategory {
                filter: filter.to_string(),
            }),
        }

        Selection {
            filter: filter.clone(),
            pick,
        }
    }

    /// The persisted filter, `All` when none was saved or it can't be read
    pub async fn last_filter(&self) -> CategoryFilter {
        match self.local.get(keys::LAST_CATEGORY_FILTER).await {
            Ok(stored) => CategoryFilter::from(stored.as_deref().filter(|s| !s.is_empty())),
            Err(e) => {
                warn!("Failed to read category filter, using all: {}", e);
                CategoryFilter::All
            }
        }
    }

    /// Re-apply the persisted filter and pick a quote from it
    pub async fn restore_last_filter(&self) -> Selection {
        let filter = self.last_filter().await;
        self.show_random(&filter).await
    }

    /// The last quote shown in this session
    pub async fn last_viewed(&self) -> Option<Quote> {
        let stored = match self.session.get(keys::LAST_VIEWED_QUOTE).await {
            Ok(stored) => stored?,
            Err(e) => {
                warn!("Failed to read last viewed quote: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&stored) {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!("Ignoring malformed last viewed quote: {}", e);
                None
            }
        }
    }

    async fn remember_viewed(&self, quote: &Quote) {
        let result = match serde_json::to_string(quote) {
            Ok(json) => self.session.set(keys::LAST_VIEWED_QUOTE, &json).await,
            Err(e) => {
                warn!("Failed to serialize last viewed quote: {}", e);
                return;
            }
        };

        if let Err(e) = result {
            warn!("Failed to save last viewed quote: {}", e);
        }
    }
}
