//! Sync service: merge quotes from a remote source
//!
//! A sync fetches the remote collection, then appends every remote quote
//! that is not already stored. The remote side wins only in the sense that
//! new quotes are taken without asking; local quotes are never modified or
//! removed.
//!
//! The fetch runs without holding the store lock, so quotes added while a
//! fetch is outstanding are seen by the merge that follows it.
//!
//! Only one sync runs at a time. A sync requested while another is in flight
//! returns [`SyncOutcome::AlreadyRunning`] without fetching.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::events::{Event, EventBus};
use super::SharedStore;
use crate::error::{ConfigError, Result};
use crate::sources::QuoteSource;

/// What a completed `sync()` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// This many new quotes were appended and saved
    Merged(usize),
    /// The remote had nothing new
    UpToDate,
    /// Another sync was in flight; nothing was fetched
    AlreadyRunning,
}

impl SyncOutcome {
    pub fn added(&self) -> usize {
        match self {
            SyncOutcome::Merged(added) => *added,
            SyncOutcome::UpToDate | SyncOutcome::AlreadyRunning => 0,
        }
    }
}

/// Clears the in-flight flag however the sync ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct SyncService {
    store: SharedStore,
    source: Arc<dyn QuoteSource>,
    event_bus: EventBus,
    in_flight: Arc<AtomicBool>,
    last_synced_at: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl SyncService {
    pub fn new(store: SharedStore, source: Arc<dyn QuoteSource>, event_bus: EventBus) -> Self {
        Self {
            store,
            source,
            event_bus,
            in_flight: Arc::new(AtomicBool::new(false)),
            last_synced_at: Arc::new(Mutex::new(None)),
        }
    }

    /// Fetch from the source and merge anything new.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Fetch` if the source fails. The collection is
    /// unchanged and no retry is scheduled.
    pub async fn sync(&self) -> Result<SyncOutcome> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!("Sync requested while another is running, skipping");
            self.event_bus.emit(Event::SyncSkipped);
            return Ok(SyncOutcome::AlreadyRunning);
        }
        let _in_flight = InFlight(&self.in_flight);

        info!("Syncing with {}", self.source.name());
        self.event_bus.emit(Event::SyncStarted {
            source: self.source.name().to_string(),
        });

        let remote = match self.source.fetch().await {
            Ok(remote) => remote,
            Err(e) => {
                warn!("Sync with {} failed: {}", self.source.name(), e);
                self.event_bus.emit(Event::SyncFailed {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let (added, total) = {
            let mut store = self.store.lock().await;
            let added = store.extend_new(remote);
            if added > 0 {
                store.save().await;
            }
            (added, store.len())
        };

        self.record_success();
        if added > 0 {
            info!("Sync merged {} new quotes ({} total)", added, total);
            self.event_bus.emit(Event::QuotesChanged { total });
        } else {
            debug!("Sync found nothing new");
        }
        self.event_bus.emit(Event::SyncCompleted { added });

        Ok(if added > 0 {
            SyncOutcome::Merged(added)
        } else {
            SyncOutcome::UpToDate
        })
    }

    /// Whether a sync is currently in flight
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// When the last successful sync finished
    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        *self.last_synced_at.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record_success(&self) {
        *self.last_synced_at.lock().unwrap_or_else(|e| e.into_inner()) = Some(Utc::now());
    }

    /// Start syncing every `period`, first after one full period.
    ///
    /// Each tick runs in its own task, so a slow fetch does not delay the
    /// timer; overlapping ticks are absorbed by the in-flight guard. Abort
    /// the returned handle to stop the timer (a sync already started runs to
    /// completion).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero period; no task is
    /// started.
    pub fn spawn_periodic(&self, period: Duration) -> Result<JoinHandle<()>> {
        if period.is_zero() {
            return Err(ConfigError::InvalidValue(
                "sync interval must be greater than zero".to_string(),
            )
            .into());
        }
        let service = self.clone();

        Ok(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let service = service.clone();
                tokio::spawn(async move {
                    if let Err(e) = service.sync().await {
                        error!("Periodic sync failed: {}", e);
                    }
                });
            }
        }))
    }
}
