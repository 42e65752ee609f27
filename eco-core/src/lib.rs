pub mod calculations;
pub mod models;
pub mod plans;
pub mod storage;

pub use models::*;
pub use plans::{Clock, PLANS_STORAGE_KEY, PlanStore, SystemClock};
pub use storage::{KeyValueStorage, StorageError};
