pub mod factory;
pub mod memory;
pub mod repository;

pub use factory::{StorageConfig, StorageFactory, StorageRegistry};
pub use memory::{MemoryStorage, MemoryStorageFactory};
pub use repository::{KeyValueStorage, StorageError};
