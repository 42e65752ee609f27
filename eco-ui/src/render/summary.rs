use std::fmt;

use eco_core::AggregateResult;
use rust_decimal::Decimal;

use crate::utils::format_money;

/// Advice shown before anything has been calculated.
pub const CLEARED_ADVICE: &str = "Calculate to see advice.";

/// The figures panel: totals, score and advice, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub income: String,
    pub expenses: String,
    pub balance: String,
    pub score: String,
    pub advice: String,
}

impl Summary {
    pub fn from_result(result: &AggregateResult) -> Self {
        Self {
            income: format_money(result.total_income),
            expenses: format_money(result.total_expenses),
            balance: format_money(result.balance),
            score: format!("{} / 100", result.eco_score),
            advice: result.advice.advice().to_string(),
        }
    }

    /// The state of a freshly cleared form.
    pub fn cleared() -> Self {
        let zero = format_money(Decimal::ZERO);
        Self {
            income: zero.clone(),
            expenses: zero.clone(),
            balance: zero,
            score: "—".to_string(),
            advice: CLEARED_ADVICE.to_string(),
        }
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::cleared()
    }
}

impl fmt::Display for Summary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Income:    {}", self.income)?;
        writeln!(f, "Expenses:  {}", self.expenses)?;
        writeln!(f, "Balance:   {}", self.balance)?;
        writeln!(f, "Eco-score: {}", self.score)?;
        write!(f, "{}", self.advice)
    }
}
