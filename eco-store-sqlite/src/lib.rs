mod factory;
mod repository;

pub use factory::SqliteStorageFactory;
pub use repository::SqliteStorage;
