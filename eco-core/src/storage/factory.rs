//! Picking the plan storage backend from configuration.
//!
//! The `[storage]` section of the planner config names a backend and where
//! it keeps its data. The in-process `memory` backend is always available;
//! other crates register their own (`eco-store-sqlite` adds `sqlite`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::memory::MemoryStorageFactory;
use super::repository::{KeyValueStorage, StorageError};

/// Backend used when the config does not name one.
const DEFAULT_BACKEND: &str = "sqlite";

/// Database file used when the config does not name one.
const DEFAULT_DATABASE: &str = "eco_plans.db";

/// The `[storage]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend name, matched case-insensitively.
    pub backend: String,

    /// Where the backend keeps plans. The memory backend ignores it.
    pub connection_string: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND, DEFAULT_DATABASE)
    }
}

impl StorageConfig {
    pub fn new(
        backend: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            connection_string: connection_string.into(),
        }
    }

    /// Plans kept in process memory, gone when the program exits.
    pub fn memory() -> Self {
        Self::new(MemoryStorageFactory::NAME, "")
    }
}

/// Opens one kind of [`KeyValueStorage`].
#[async_trait]
pub trait StorageFactory: Send + Sync {
    /// Lowercase name used in `[storage] backend`.
    fn backend_name(&self) -> &'static str;

    /// Opens the store at `connection_string`, ready for plan reads and
    /// writes.
    async fn open(
        &self,
        connection_string: &str,
    ) -> Result<Box<dyn KeyValueStorage>, StorageError>;
}

/// The backends a planner build can open.
pub struct StorageRegistry {
    factories: Vec<Box<dyn StorageFactory>>,
}

impl Default for StorageRegistry {
    fn default() -> Self {
        Self {
            factories: vec![Box::new(MemoryStorageFactory)],
        }
    }
}

impl StorageRegistry {
    /// Adds a backend, replacing an earlier one of the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn StorageFactory>,
    ) {
        let name = factory.backend_name();
        self.factories.retain(|f| f.backend_name() != name);
        self.factories.push(factory);
    }

    /// Registered backend names, sorted.
    pub fn backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.iter().map(|f| f.backend_name()).collect();
        names.sort_unstable();
        names
    }

    /// Opens the backend `config` names.
    pub async fn open(
        &self,
        config: &StorageConfig,
    ) -> Result<Box<dyn KeyValueStorage>, StorageError> {
        let requested = config.backend.trim().to_ascii_lowercase();
        let Some(factory) = self
            .factories
            .iter()
            .find(|f| f.backend_name() == requested)
        else {
            return Err(StorageError::Configuration(format!(
                "unknown storage backend '{}' (available: {})",
                config.backend,
                self.backends().join(", ")
            )));
        };

        debug!(
            backend = %requested,
            connection = %config.connection_string,
            "opening plan storage"
        );
        factory.open(&config.connection_string).await
    }
}
