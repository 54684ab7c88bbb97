//! Event system for status reporting
//!
//! Services emit events as they work; front ends subscribe and render them.
//! Every event that the user should see maps to a [`StatusMessage`].
//!
//! The bus uses `tokio::sync::broadcast`: emitting never blocks, events are
//! dropped when nobody is subscribed, and a lagging subscriber loses the
//! oldest events first.
//!
//! # Example
//!
//! ```no_run
//! use libquotebox::service::events::{Event, EventBus};
//!
//! # async fn example() {
//! let event_bus = EventBus::new(100);
//! let mut receiver = event_bus.subscribe();
//!
//! event_bus.emit(Event::SyncStarted { source: "simulated".to_string() });
//!
//! if let Ok(event) = receiver.recv().await {
//!     if let Some(status) = event.status() {
//!         println!("[{}] {}", status.severity, status.message);
//!     }
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{Quote, StatusMessage};

pub type EventReceiver = broadcast::Receiver<Event>;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: Event) {
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A quote was picked for display
    QuoteShown { quote: Quote, filter: String },

    /// The selected category has no quotes
    NoQuoteInCategory { filter: String },

    /// A quote was added by hand
    QuoteAdded { quote: Quote },

    /// A submitted quote was rejected before any change
    QuoteRejected { message: String },

    /// An import finished; `added` may be zero
    QuotesImported { added: usize },

    /// An import was rejected before any change
    ImportFailed { message: String },

    /// The collection grew; category lists should be refreshed
    QuotesChanged { total: usize },

    SyncStarted { source: String },

    /// A sync merged `added` new quotes (possibly zero)
    SyncCompleted { added: usize },

    SyncFailed { error: String },

    /// A sync was requested while another was still running
    SyncSkipped,
}

impl Event {
    /// The status line a front end should show for this event, if any
    pub fn status(&self) -> Option<StatusMessage> {
        match self {
            Event::QuoteAdded { .. } => Some(StatusMessage::success("Quote added.")),
            Event::QuoteRejected { message } => Some(StatusMessage::error(message.clone())),
            Event::QuotesImported { added: 0 } => {
                Some(StatusMessage::info("No new quotes to import."))
            }
            Event::QuotesImported { added } => Some(StatusMessage::success(format!(
                "{} quotes imported successfully!",
                added
            ))),
            Event::ImportFailed { message } => Some(StatusMessage::error(message.clone())),
            Event::SyncStarted { .. } => Some(StatusMessage::info("Syncing data with server...")),
            Event::SyncCompleted { added: 0 } => {
                Some(StatusMessage::info("Sync complete. No new quotes found."))
            }
            Event::SyncCompleted { added } => Some(StatusMessage::success(format!(
                "Sync complete! {} new quotes added.",
                added
            ))),
            Event::SyncFailed { .. } => {
                Some(StatusMessage::error("Sync failed. Check your connection."))
            }
            Event::SyncSkipped => Some(StatusMessage::info("Sync already in progress.")),
            Event::QuoteShown { .. }
            | Event::NoQuoteInCategory { .. }
            | Event::QuotesChanged { .. } => None,
        }
    }
}
