//! Error types for Quotebox

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuoteboxError>;

#[derive(Error, Debug)]
pub enum QuoteboxError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl QuoteboxError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            QuoteboxError::InvalidInput(_) => 3,
            QuoteboxError::Import(_) => 3,
            QuoteboxError::Sync(_) => 2,
            QuoteboxError::Config(_) => 1,
            QuoteboxError::Storage(_) => 1,
            QuoteboxError::Export(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("Database operation failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to parse JSON file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Imported JSON is not a valid array of quotes (found {0})")]
    Shape(String),

    #[error("Failed to read import file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize quotes: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone)]
pub enum SyncError {
    #[error("Fetch from '{source_name}' failed: {reason}")]
    Fetch { source_name: String, reason: String },
}
