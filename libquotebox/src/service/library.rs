//! Library service: adding, importing and exporting quotes

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::events::{Event, EventBus};
use super::validation::validate_new_quote;
use super::SharedStore;
use crate::codec;
use crate::error::{ExportError, ImportError, QuoteboxError, Result};
use crate::types::Quote;

#[derive(Clone)]
pub struct LibraryService {
    store: SharedStore,
    event_bus: EventBus,
    export_file_name: String,
}

impl LibraryService {
    pub fn new(store: SharedStore, event_bus: EventBus, export_file_name: String) -> Self {
        Self {
            store,
            event_bus,
            export_file_name,
        }
    }

    /// Copy of the current collection
    pub async fn quotes(&self) -> Vec<Quote> {
        self.store.lock().await.snapshot().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    /// Validate, append and persist a single quote.
    ///
    /// The quote is not checked against the collection for duplicates.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if either field is blank; nothing changes.
    pub async fn add_quote(&self, text: &str, category: &str) -> Result<Quote> {
        let quote = match validate_new_quote(text, category) {
            Ok(quote) => quote,
            Err(e) => {
                self.event_bus.emit(Event::QuoteRejected {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let total = {
            let mut store = self.store.lock().await;
            store.add(quote.clone());
            store.save().await;
            store.len()
        };

        info!("Added quote in category '{}'", quote.category);
        self.event_bus.emit(Event::QuoteAdded {
            quote: quote.clone(),
        });
        self.event_bus.emit(Event::QuotesChanged { total });
        Ok(quote)
    }

    /// Merge a JSON array of quotes, skipping ones already stored.
    ///
    /// Returns the number added. The store is persisted only when that is
    /// non-zero.
    ///
    /// # Errors
    ///
    /// `ImportError::Parse` or `ImportError::Shape`; nothing is added.
    pub async fn import_json(&self, text: &str) -> Result<usize> {
        let imported = {
            let mut store = self.store.lock().await;
            match codec::import_into(&mut store, text) {
                Ok(0) => Ok((0, store.len())),
                Ok(added) => {
                    store.save().await;
                    Ok((added, store.len()))
                }
                Err(e) => Err(e),
            }
        };

        match imported {
            Ok((added, total)) => {
                info!("Imported {} new quotes", added);
                if added > 0 {
                    self.event_bus.emit(Event::QuotesChanged { total });
                }
                self.event_bus.emit(Event::QuotesImported { added });
                Ok(added)
            }
            Err(e) => {
                warn!("Import rejected: {}", e);
                self.event_bus.emit(Event::ImportFailed {
                    message: import_failure_message(&e).to_string(),
                });
                Err(e)
            }
        }
    }

    /// Read `path` and import its contents
    pub async fn import_file(&self, path: &Path) -> Result<usize> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                let error: QuoteboxError = ImportError::Io(e).into();
                self.event_bus.emit(Event::ImportFailed {
                    message: import_failure_message(&error).to_string(),
                });
                return Err(error);
            }
        };
        self.import_json(&text).await
    }

    /// Pretty JSON of the full collection
    pub async fn export_json(&self) -> Result<String> {
        let store = self.store.lock().await;
        codec::export(store.snapshot())
    }

    /// Write the export file.
    ///
    /// A directory target gets the configured file name (`quotes.json` by
    /// default). Returns the path written.
    pub async fn export_to(&self, target: &Path) -> Result<PathBuf> {
        let is_dir = tokio::fs::metadata(target)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        let path = if is_dir {
            target.join(&self.export_file_name)
        } else {
            target.to_path_buf()
        };

        // Serialize under the lock, write after releasing it
        let (json, count) = {
            let store = self.store.lock().await;
            (codec::export(store.snapshot())?, store.len())
        };
        tokio::fs::write(&path, json).await.map_err(ExportError::Io)?;
        info!("Exported {} quotes to {}", count, path.display());
        Ok(path)
    }

    pub fn export_file_name(&self) -> &str {
        &self.export_file_name
    }
}

/// User-facing message for a failed import
pub fn import_failure_message(error: &QuoteboxError) -> &'static str {
    match error {
        QuoteboxError::Import(ImportError::Shape(_)) => {
            "Imported JSON is not a valid array of quotes."
        }
        QuoteboxError::Import(ImportError::Io(_)) => "Failed to read import file.",
        _ => "Failed to parse JSON file.",
    }
}
