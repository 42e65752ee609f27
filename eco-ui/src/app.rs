//! The planner session: form state, the latest calculation and saved plans.
//!
//! [`PlannerApp`] is what a front end drives. Every user action maps onto one
//! method here; the CLI and the interactive shell are thin layers over it.

use eco_core::calculations::Aggregator;
use eco_core::storage::{StorageConfig, StorageRegistry};
use eco_core::{AggregateResult, ExpenseEntry, PlanSnapshot, PlanStore, StorageError};
use eco_store_sqlite::SqliteStorageFactory;
use thiserror::Error;
use tracing::{debug, info};

use crate::render::{PieChart, Summary};
use crate::state::PlanForm;
use crate::utils::plan_label;

/// Acknowledgement shown after a plan is saved.
pub const SAVE_ACKNOWLEDGEMENT: &str = "Plan saved locally. (Demo only)";

/// Errors from planner actions that touch saved plans.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlannerError {
    /// Saving is offered only once the plan has been calculated.
    #[error("calculate the plan before saving it")]
    NotCalculated,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One entry of the saved-plans list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPlanItem {
    pub id: i64,
    /// `"<name> — ₱<income>"`.
    pub label: String,
}

/// Registry with every storage backend this application ships.
pub fn build_registry() -> StorageRegistry {
    let mut registry = StorageRegistry::default();
    registry.register(Box::new(SqliteStorageFactory));
    registry
}

/// Opens the configured backend and wraps it in a [`PlanStore`].
pub async fn open_plan_store(config: &StorageConfig) -> Result<PlanStore, StorageError> {
    debug!(backend = %config.backend, "opening plan store");
    let storage = build_registry().open(config).await?;
    Ok(PlanStore::new(storage))
}

pub struct PlannerApp {
    form: PlanForm,
    aggregator: Aggregator,
    store: PlanStore,
    result: Option<AggregateResult>,
    summary: Summary,
    chart: PieChart,
    save_enabled: bool,
}

impl PlannerApp {
    pub fn new(store: PlanStore) -> Self {
        Self::with_aggregator(store, Aggregator::default())
    }

    pub fn with_aggregator(
        store: PlanStore,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            form: PlanForm::new(),
            aggregator,
            store,
            result: None,
            summary: Summary::cleared(),
            chart: PieChart::default(),
            save_enabled: false,
        }
    }

    pub fn form(&self) -> &PlanForm {
        &self.form
    }

    pub fn set_name(
        &mut self,
        name: &str,
    ) {
        self.form.name = name.to_string();
    }

    pub fn set_income(
        &mut self,
        text: &str,
    ) {
        self.form.set_income_text(text);
    }

    pub fn add_expense_row(&mut self) -> usize {
        self.form.add_row()
    }

    pub fn add_expense(
        &mut self,
        entry: ExpenseEntry,
    ) -> usize {
        self.form.push_entry(entry)
    }

    pub fn import_expenses(
        &mut self,
        entries: impl IntoIterator<Item = ExpenseEntry>,
    ) -> usize {
        let mut count = 0;
        for entry in entries {
            self.form.push_entry(entry);
            count += 1;
        }
        debug!(count, "imported expense rows");
        count
    }

    /// Overwrites row `index`. Returns `false` when there is no such row.
    pub fn edit_expense_row(
        &mut self,
        index: usize,
        entry: ExpenseEntry,
    ) -> bool {
        self.form.set_row(index, entry)
    }

    pub fn remove_expense_row(
        &mut self,
        index: usize,
    ) -> Option<ExpenseEntry> {
        self.form.remove_row(index)
    }

    /// Aggregates the form and refreshes the summary and chart.
    pub fn calculate(&mut self) -> &AggregateResult {
        let result = self.aggregator.calculate(self.form.income, self.form.rows());
        self.summary = Summary::from_result(&result);
        self.chart = PieChart::from_result(&result);
        self.save_enabled = true;

        debug!(
            score = result.eco_score,
            categories = result.category_totals.len(),
            "plan calculated"
        );
        self.result.insert(result)
    }

    pub fn result(&self) -> Option<&AggregateResult> {
        self.result.as_ref()
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn chart(&self) -> &PieChart {
        &self.chart
    }

    pub fn can_save(&self) -> bool {
        self.save_enabled
    }

    /// Saves the form as a new plan.
    ///
    /// The saved values are the form's current contents, not those of the
    /// last calculation.
    pub async fn save_plan(&mut self) -> Result<PlanSnapshot, PlannerError> {
        if !self.save_enabled {
            return Err(PlannerError::NotCalculated);
        }
        let saved = self.store.save(self.form.to_new_plan()).await?;
        Ok(saved)
    }

    /// Resets the form to a single blank row and clears the outputs.
    pub fn clear_form(&mut self) {
        self.form.clear();
        self.result = None;
        self.summary = Summary::cleared();
        self.chart = PieChart::default();
    }

    /// Replaces the form with a saved plan and recalculates.
    ///
    /// Returns `false`, leaving the form untouched, when no plan has `id`.
    pub async fn load_plan(
        &mut self,
        id: i64,
    ) -> Result<bool, PlannerError> {
        let Some(plan) = self.store.get(id).await? else {
            debug!(id, "load ignored, no plan with that id");
            return Ok(false);
        };
        self.form.fill_from(&plan);
        self.calculate();

        info!(id, name = %plan.name, "loaded plan");
        Ok(true)
    }

    pub async fn delete_plan(
        &mut self,
        id: i64,
    ) -> Result<bool, PlannerError> {
        Ok(self.store.delete(id).await?)
    }

    /// Saved plans, most recently saved first.
    pub async fn saved_plans(&self) -> Result<Vec<SavedPlanItem>, PlannerError> {
        let plans = self.store.list().await?;
        Ok(plans
            .iter()
            .map(|plan| SavedPlanItem {
                id: plan.id,
                label: plan_label(plan),
            })
            .collect())
    }
}
