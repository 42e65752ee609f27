use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use eco_core::{KeyValueStorage, StorageError};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// [`KeyValueStorage`] backed by a single SQLite table.
pub struct SqliteStorage {
    pool: SqlitePool,
}

fn backend_error(e: sqlx::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

impl SqliteStorage {
    /// Connect using a sqlx-style URL (e.g. `sqlite:plans.db?mode=rwc`).
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = SqlitePool::connect(database_url).await.map_err(|e| {
            StorageError::Connection(format!("failed to connect to '{database_url}': {e}"))
        })?;
        Ok(Self { pool })
    }

    /// Open the database file at `path`, creating it if it does not exist.
    pub async fn open(path: &Path) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| {
                StorageError::Connection(format!("failed to open '{}': {e}", path.display()))
            })?;
        Ok(Self { pool })
    }

    /// A private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StorageError::Configuration(e.to_string()))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Backend(format!("failed to run migrations: {e}")))?;
        Ok(())
    }

    /// Every stored key, alphabetically.
    pub async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT key FROM local_storage ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(backend_error)?;

        rows.iter()
            .map(|row| row.try_get("key").map_err(backend_error))
            .collect()
    }
}

#[async_trait]
impl KeyValueStorage for SqliteStorage {
    async fn get_item(
        &self,
        key: &str,
    ) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM local_storage WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend_error)?;

        row.map(|row| row.try_get("value").map_err(backend_error))
            .transpose()
    }

    async fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(backend_error)?;

        tracing::trace!(key, bytes = value.len(), "stored item");
        Ok(())
    }

    async fn remove_item(
        &self,
        key: &str,
    ) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(backend_error)?;
        Ok(())
    }
}
