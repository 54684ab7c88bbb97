//! Key/value storage for Quotebox
//!
//! Two scopes share the same schema: a durable SQLite file that survives
//! restarts, and an in-memory database that lives only as long as the
//! process (the "session").

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;

use crate::error::{Result, StorageError};

/// Well-known storage keys
pub mod keys {
    /// Durable: JSON array of every quote
    pub const QUOTES: &str = "quotes";
    /// Durable: last selected category filter
    pub const LAST_CATEGORY_FILTER: &str = "lastCategoryFilter";
    /// Session: JSON of the last displayed quote
    pub const LAST_VIEWED_QUOTE: &str = "lastViewedQuote";
}

/// String key/value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) a durable database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self> {
        // Expand path and create parent directories
        let expanded_path = shellexpand::tilde(db_path).to_string();
        let path = Path::new(&expanded_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }

        // Use forward slashes for SQLite URL (works on both Windows and Unix)
        // Use mode=rwc to allow creating the database file if it doesn't exist
        let db_url = format!("sqlite://{}?mode=rwc", expanded_path.replace('\\', "/"));

        let pool = SqlitePool::connect(&db_url)
            .await
            .map_err(StorageError::Database)?;

        Self::migrate(pool).await
    }

    /// Open a session-scoped database that is discarded on drop
    pub async fn in_memory() -> Result<Self> {
        // Every connection to :memory: gets its own database, so pin the
        // pool to a single connection that never expires.
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(StorageError::Database)?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(StorageError::Migration)?;

        Ok(Self { pool })
    }

    /// Close the underlying pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        use sqlx::Row;

        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(row.map(|r| r.get("value")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, strftime('%s', 'now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteboxError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_initialization_with_invalid_path() {
        #[cfg(unix)]
        let invalid_path = "/tmp/test\0invalid.db";

        #[cfg(windows)]
        let invalid_path = "C:\\invalid<>path\\test.db";

        let result = Database::new(invalid_path).await;
        match result {
            Err(QuoteboxError::Storage(_)) => {}
            _ => panic!("Expected StorageError for invalid path"),
        }
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(db.get(keys::QUOTES).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get_and_overwrite() {
        let db = Database::in_memory().await.unwrap();

        db.set(keys::LAST_CATEGORY_FILTER, "Life").await.unwrap();
        assert_eq!(
            db.get(keys::LAST_CATEGORY_FILTER).await.unwrap().as_deref(),
            Some("Life")
        );

        db.set(keys::LAST_CATEGORY_FILTER, "all").await.unwrap();
        assert_eq!(
            db.get(keys::LAST_CATEGORY_FILTER).await.unwrap().as_deref(),
            Some("all")
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let db = Database::in_memory().await.unwrap();
        db.set(keys::LAST_VIEWED_QUOTE, "{}").await.unwrap();
        db.remove(keys::LAST_VIEWED_QUOTE).await.unwrap();
        assert_eq!(db.get(keys::LAST_VIEWED_QUOTE).await.unwrap(), None);

        // Removing again is fine
        db.remove(keys::LAST_VIEWED_QUOTE).await.unwrap();
    }

    #[tokio::test]
    async fn test_durable_database_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("quotes.db");
        let db_path = db_path.to_str().unwrap();

        let db = Database::new(db_path).await.unwrap();
        db.set(keys::QUOTES, "[]").await.unwrap();
        db.close().await;

        let reopened = Database::new(db_path).await.unwrap();
        assert_eq!(reopened.get(keys::QUOTES).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let first = Database::in_memory().await.unwrap();
        let second = Database::in_memory().await.unwrap();

        first.set(keys::LAST_VIEWED_QUOTE, "x").await.unwrap();
        assert_eq!(second.get(keys::LAST_VIEWED_QUOTE).await.unwrap(), None);
    }
}
