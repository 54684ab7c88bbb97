//! Service layer for Quotebox
//!
//! `QuoteService` is the single entry point the command line tools use. It
//! owns the shared quote collection and coordinates the sub-services:
//!
//! - `SelectionService`: category filter, random pick, last viewed quote
//! - `LibraryService`: add, import, export
//! - `SyncService`: merge from a remote source, once or periodically
//! - `EventBus`: status events for whatever front end is listening
//!
//! # Example
//!
//! ```no_run
//! use libquotebox::service::QuoteService;
//! use libquotebox::types::CategoryFilter;
//!
//! # async fn example() -> libquotebox::Result<()> {
//! let service = QuoteService::new().await?;
//!
//! let selection = service.show_random(&CategoryFilter::from("Life")).await;
//! println!("{}", selection.pick);
//!
//! let outcome = service.sync().await?;
//! println!("{} new quotes", outcome.added());
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod library;
pub mod selection;
pub mod sync;
pub mod validation;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use self::events::{EventBus, EventReceiver};
use self::library::LibraryService;
use self::selection::{Selection, SelectionService};
use self::sync::{SyncOutcome, SyncService};
use crate::db::{Database, KeyValueStore};
use crate::sources::{self, QuoteSource};
use crate::store::QuoteStore;
use crate::types::{CategoryFilter, Quote};
use crate::{Config, Result};

/// The quote collection as shared between sub-services
pub type SharedStore = Arc<Mutex<QuoteStore>>;

/// Main service facade
///
/// All sub-services share one `SharedStore` and one `EventBus`, so a quote
/// added through the library is immediately visible to selection and sync.
pub struct QuoteService {
    config: Arc<Config>,
    store: SharedStore,
    selection: SelectionService,
    library: LibraryService,
    sync: SyncService,
    event_bus: EventBus,
}

impl QuoteService {
    /// Create a service from the default configuration file, or defaults
    /// when none exists
    pub async fn new() -> Result<Self> {
        let config = Config::load_or_default()?;
        Self::from_config(config).await
    }

    /// Open durable storage at `config.storage.path`, a fresh session store,
    /// and the configured remote source.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn from_config(config: Config) -> Result<Self> {
        let local: Arc<dyn KeyValueStore> = Arc::new(Database::new(&config.storage.path).await?);
        let session: Arc<dyn KeyValueStore> = Arc::new(Database::in_memory().await?);
        let source = sources::from_config(&config.sync);

        Ok(Self::with_parts(local, session, source, config).await)
    }

    /// Assemble a service from explicit collaborators.
    ///
    /// The collection is loaded from `local` before returning.
    pub async fn with_parts(
        local: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        source: Arc<dyn QuoteSource>,
        config: Config,
    ) -> Self {
        let store = QuoteStore::open(Arc::clone(&local)).await;
        debug!("Opened quote store with {} quotes", store.len());

        let store: SharedStore = Arc::new(Mutex::new(store));
        let event_bus = EventBus::new(100);

        let selection =
            SelectionService::new(Arc::clone(&store), local, session, event_bus.clone());
        let library = LibraryService::new(
            Arc::clone(&store),
            event_bus.clone(),
            config.export.file_name.clone(),
        );
        let sync = SyncService::new(Arc::clone(&store), source, event_bus.clone());

        Self {
            config: Arc::new(config),
            store,
            selection,
            library,
            sync,
            event_bus,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn selection(&self) -> &SelectionService {
        &self.selection
    }

    pub fn library(&self) -> &LibraryService {
        &self.library
    }

    /// Access the sync service
    ///
    /// Cheap to clone; clones share the in-flight guard.
    pub fn sync_service(&self) -> &SyncService {
        &self.sync
    }

    /// Copy of the current collection
    pub async fn quotes(&self) -> Vec<Quote> {
        self.store.lock().await.snapshot().to_vec()
    }

    /// Category option list, "all" first
    pub async fn categories(&self) -> Vec<String> {
        self.selection.categories().await
    }

    pub async fn show_random(&self, filter: &CategoryFilter) -> Selection {
        self.selection.show_random(filter).await
    }

    pub async fn restore_last_filter(&self) -> Selection {
        self.selection.restore_last_filter().await
    }

    pub async fn last_viewed(&self) -> Option<Quote> {
        self.selection.last_viewed().await
    }

    pub async fn add_quote(&self, text: &str, category: &str) -> Result<Quote> {
        self.library.add_quote(text, category).await
    }

    pub async fn export_json(&self) -> Result<String> {
        self.library.export_json().await
    }

    /// Write the export file; see [`LibraryService::export_to`]
    pub async fn export_to_file(&self, target: &Path) -> Result<PathBuf> {
        self.library.export_to(target).await
    }

    pub async fn import_json(&self, text: &str) -> Result<usize> {
        self.library.import_json(text).await
    }

    pub async fn import_file(&self, path: &Path) -> Result<usize> {
        self.library.import_file(path).await
    }

    pub async fn sync(&self) -> Result<SyncOutcome> {
        self.sync.sync().await
    }

    /// Start the periodic sync timer if `[sync] enabled` is set
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the configured interval is zero.
    pub fn spawn_periodic_sync(&self) -> Result<Option<JoinHandle<()>>> {
        if !self.config.sync.enabled {
            debug!("Periodic sync disabled");
            return Ok(None);
        }
        let handle = self.sync.spawn_periodic(self.config.sync.interval())?;
        Ok(Some(handle))
    }

    /// Subscribe to service events
    ///
    /// Multiple subscribers are supported; each sees every event emitted
    /// after it subscribed.
    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }
}
