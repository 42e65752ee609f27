mod aggregate_result;
mod expense_entry;
pub mod money;
mod plan_snapshot;

pub use aggregate_result::{AdviceTier, AggregateResult, CategoryTotal};
pub use expense_entry::{DEFAULT_CATEGORY, ExpenseEntry, ExpenseTag};
pub use plan_snapshot::{DEFAULT_PLAN_NAME, NewPlanSnapshot, PlanSnapshot};
