use std::path::Path;

use async_trait::async_trait;
use eco_core::storage::{KeyValueStorage, StorageError, StorageFactory};

use crate::repository::SqliteStorage;

/// The `sqlite` plan storage backend.
///
/// ```rust,no_run
/// use eco_core::storage::StorageRegistry;
/// use eco_store_sqlite::SqliteStorageFactory;
///
/// let mut registry = StorageRegistry::default();
/// registry.register(Box::new(SqliteStorageFactory));
/// ```
pub struct SqliteStorageFactory;

#[async_trait]
impl StorageFactory for SqliteStorageFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// `":memory:"` opens a private in-memory database, a `sqlite:` URL is
    /// handed to sqlx as is, and anything else is a database file, created
    /// when missing. The schema is brought up to date on every open.
    async fn open(
        &self,
        connection_string: &str,
    ) -> Result<Box<dyn KeyValueStorage>, StorageError> {
        let target = connection_string.trim();
        let storage = if target == ":memory:" {
            SqliteStorage::in_memory().await?
        } else if target.starts_with("sqlite:") {
            SqliteStorage::new(target).await?
        } else if target.is_empty() {
            return Err(StorageError::Configuration(
                "sqlite backend needs a database path or ':memory:'".to_string(),
            ));
        } else {
            SqliteStorage::open(Path::new(target)).await?
        };
        storage.run_migrations().await?;

        tracing::debug!(connection = target, "sqlite storage ready");
        Ok(Box::new(storage))
    }
}
