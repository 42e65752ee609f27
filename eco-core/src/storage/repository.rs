use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// String key-value store with the semantics of browser `localStorage`.
///
/// Values are opaque strings; callers own their encoding.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// `Ok(None)` when the key has never been written or was removed.
    async fn get_item(
        &self,
        key: &str,
    ) -> Result<Option<String>, StorageError>;

    /// Creates or replaces the value under `key`.
    async fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    async fn remove_item(
        &self,
        key: &str,
    ) -> Result<(), StorageError>;
}
