use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ExpenseEntry;

/// Name given to a plan saved without one.
pub const DEFAULT_PLAN_NAME: &str = "Plan";

/// A saved, named copy of a budget's income and expense entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub id: i64,

    #[serde(default)]
    pub name: String,

    #[serde(with = "crate::models::money", default)]
    pub income: Decimal,

    #[serde(rename = "rows", default)]
    pub entries: Vec<ExpenseEntry>,
}

/// For saving new plans (no id yet)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewPlanSnapshot {
    pub name: String,
    pub income: Decimal,
    pub entries: Vec<ExpenseEntry>,
}

impl NewPlanSnapshot {
    pub fn new(
        name: impl Into<String>,
        income: Decimal,
        entries: Vec<ExpenseEntry>,
    ) -> Self {
        Self {
            name: name.into(),
            income,
            entries,
        }
    }

    /// Assigns `id`, substituting the default name when the given one is empty.
    pub fn into_snapshot(
        self,
        id: i64,
    ) -> PlanSnapshot {
        let name = if self.name.is_empty() {
            DEFAULT_PLAN_NAME.to_string()
        } else {
            self.name
        };
        PlanSnapshot {
            id,
            name,
            income: self.income,
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::ExpenseTag;

    #[test]
    fn empty_name_becomes_plan() {
        let snapshot = NewPlanSnapshot::new("", dec!(10), vec![]).into_snapshot(7);

        assert_eq!(snapshot.name, "Plan");
        assert_eq!(snapshot.id, 7);
    }

    #[test]
    fn whitespace_name_is_kept() {
        let snapshot = NewPlanSnapshot::new("  ", dec!(10), vec![]).into_snapshot(7);

        assert_eq!(snapshot.name, "  ");
    }

    #[test]
    fn uses_wire_layout() {
        let snapshot = NewPlanSnapshot::new(
            "June",
            dec!(1000),
            vec![ExpenseEntry::new("Rent", dec!(400.5), ExpenseTag::Neutral)],
        )
        .into_snapshot(1718000000000);

        let json = serde_json::to_string(&snapshot).unwrap();

        assert_eq!(
            json,
            r#"{"id":1718000000000,"name":"June","income":1000,"rows":[{"name":"Rent","amt":400.5,"tag":"neutral"}]}"#
        );
    }
}
