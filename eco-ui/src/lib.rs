pub mod app;
pub mod config;
pub mod csv_loader;
pub mod logging;
pub mod render;
pub mod shell;
pub mod state;
pub mod utils;

pub use app::{PlannerApp, PlannerError, SAVE_ACKNOWLEDGEMENT, SavedPlanItem};
