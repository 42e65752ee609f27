//! Form state for the planner session.
//!
//! This holds what the user has entered so far. Values are coerced as they
//! come in, so the form always holds valid records; nothing here is
//! persisted until the plan is explicitly saved.

use eco_core::calculations::common::parse_money;
use eco_core::{ExpenseEntry, NewPlanSnapshot, PlanSnapshot};
use rust_decimal::Decimal;

/// The plan being edited.
///
/// There is always at least one expense row; a fresh form has a single
/// blank one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanForm {
    pub name: String,
    pub income: Decimal,
    rows: Vec<ExpenseEntry>,
}

impl Default for PlanForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            income: Decimal::ZERO,
            rows: vec![ExpenseEntry::blank()],
        }
    }
}

impl PlanForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ExpenseEntry] {
        &self.rows
    }

    /// Sets income from raw text; unparseable input becomes 0.
    pub fn set_income_text(
        &mut self,
        text: &str,
    ) {
        self.income = parse_money(text);
    }

    /// Appends a blank row and returns its index.
    pub fn add_row(&mut self) -> usize {
        self.rows.push(ExpenseEntry::blank());
        self.rows.len() - 1
    }

    /// Adds a filled-in row. A form still holding only its untouched blank
    /// row has that row replaced instead.
    pub fn push_entry(
        &mut self,
        entry: ExpenseEntry,
    ) -> usize {
        if self.rows.len() == 1 && self.rows[0] == ExpenseEntry::blank() {
            self.rows[0] = entry;
            return 0;
        }
        self.rows.push(entry);
        self.rows.len() - 1
    }

    /// Replaces the row at `index`. Returns `false` when there is no such row.
    pub fn set_row(
        &mut self,
        index: usize,
        entry: ExpenseEntry,
    ) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                *row = entry;
                true
            }
            None => false,
        }
    }

    /// Removes the row at `index`.
    ///
    /// The last remaining row cannot be removed; `None` is returned for it
    /// and for indexes past the end.
    pub fn remove_row(
        &mut self,
        index: usize,
    ) -> Option<ExpenseEntry> {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return None;
        }
        Some(self.rows.remove(index))
    }

    /// Resets to a fresh form with a single blank row.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Replaces every field with a saved plan's values.
    pub fn fill_from(
        &mut self,
        plan: &PlanSnapshot,
    ) {
        self.name = plan.name.clone();
        self.income = plan.income;
        self.rows = if plan.entries.is_empty() {
            vec![ExpenseEntry::blank()]
        } else {
            plan.entries.clone()
        };
    }

    /// Snapshot of the form as it would be saved.
    pub fn to_new_plan(&self) -> NewPlanSnapshot {
        NewPlanSnapshot::new(self.name.clone(), self.income, self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use eco_core::ExpenseTag;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn rent() -> ExpenseEntry {
        ExpenseEntry::new("Rent", dec!(400), ExpenseTag::Neutral)
    }

    #[test]
    fn new_form_has_one_blank_row() {
        let form = PlanForm::new();

        assert_eq!(form.rows(), &[ExpenseEntry::blank()]);
        assert_eq!(form.income, Decimal::ZERO);
        assert!(form.name.is_empty());
    }

    #[test]
    fn income_text_is_coerced() {
        let mut form = PlanForm::new();

        form.set_income_text("1500.75php");
        assert_eq!(form.income, dec!(1500.75));

        form.set_income_text("lots");
        assert_eq!(form.income, Decimal::ZERO);
    }

    #[test]
    fn push_entry_fills_untouched_first_row() {
        let mut form = PlanForm::new();

        assert_eq!(form.push_entry(rent()), 0);
        assert_eq!(form.push_entry(rent()), 1);
        assert_eq!(form.rows().len(), 2);
    }

    #[test]
    fn push_entry_keeps_edited_first_row() {
        let mut form = PlanForm::new();
        form.set_row(0, ExpenseEntry::new("Bus", dec!(20), ExpenseTag::Sustainable));

        assert_eq!(form.push_entry(rent()), 1);
    }

    #[test]
    fn remove_row_keeps_at_least_one() {
        let mut form = PlanForm::new();
        form.add_row();

        assert_eq!(form.remove_row(5), None);
        assert_eq!(form.remove_row(1), Some(ExpenseEntry::blank()));
        assert_eq!(form.remove_row(0), None);
        assert_eq!(form.rows().len(), 1);
    }

    #[test]
    fn remove_row_removes_the_given_row() {
        let mut form = PlanForm::new();
        form.push_entry(ExpenseEntry::new("a", dec!(1), ExpenseTag::Neutral));
        form.push_entry(ExpenseEntry::new("b", dec!(2), ExpenseTag::Neutral));
        form.push_entry(ExpenseEntry::new("c", dec!(3), ExpenseTag::Neutral));

        form.remove_row(1);

        let names: Vec<&str> = form.rows().iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn fill_from_empty_plan_leaves_one_blank_row() {
        let mut form = PlanForm::new();
        form.push_entry(rent());
        form.push_entry(rent());

        form.fill_from(&PlanSnapshot {
            id: 1,
            name: "Empty".to_string(),
            income: dec!(10),
            entries: vec![],
        });

        assert_eq!(form.rows(), &[ExpenseEntry::blank()]);
        assert_eq!(form.name, "Empty");
        assert_eq!(form.income, dec!(10));
    }

    #[test]
    fn clear_resets_everything() {
        let mut form = PlanForm::new();
        form.name = "June".to_string();
        form.income = dec!(1000);
        form.push_entry(rent());
        form.add_row();

        form.clear();

        assert_eq!(form, PlanForm::new());
    }

    #[test]
    fn to_new_plan_copies_fields() {
        let mut form = PlanForm::new();
        form.name = "June".to_string();
        form.income = dec!(1000);
        form.push_entry(rent());

        assert_eq!(
            form.to_new_plan(),
            NewPlanSnapshot::new("June", dec!(1000), vec![rent()])
        );
    }
}
