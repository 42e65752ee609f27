use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::factory::StorageFactory;
use super::repository::{KeyValueStorage, StorageError};

/// In-process key-value store.
///
/// Clones share the same underlying map, so a test can keep one handle to
/// inspect or tamper with what another handle wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `key = value`.
    pub fn with_item(
        key: &str,
        value: &str,
    ) -> Self {
        let mut items = HashMap::new();
        items.insert(key.to_string(), value.to_string());
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Backend("memory storage lock poisoned".to_string())
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(
        &self,
        key: &str,
    ) -> Result<Option<String>, StorageError> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.get(key).cloned())
    }

    async fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(
        &self,
        key: &str,
    ) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// Opens a fresh, empty [`MemoryStorage`] each time.
pub struct MemoryStorageFactory;

impl MemoryStorageFactory {
    pub const NAME: &'static str = "memory";
}

#[async_trait]
impl StorageFactory for MemoryStorageFactory {
    fn backend_name(&self) -> &'static str {
        Self::NAME
    }

    async fn open(
        &self,
        _connection_string: &str,
    ) -> Result<Box<dyn KeyValueStorage>, StorageError> {
        Ok(Box::new(MemoryStorage::new()))
    }
}
