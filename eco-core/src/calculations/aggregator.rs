//! Budget aggregation and eco-score calculation.
//!
//! The aggregator reduces an income figure and a list of tagged expense
//! entries into totals, a per-category breakdown and a 0–100 eco-score.
//!
//! # Eco-score
//!
//! | Step | Adjustment |
//! |------|------------|
//! | Base | 50 |
//! | Sustainable share | `+ round(sustainable / denom × 30)` |
//! | Unsustainable share | `− round(unsustainable / denom × 40)` |
//! | Savings | `+ 10` when income > 0 and balance ≥ 10% of income |
//! | Clamp | to `[0, 100]` after all adjustments |
//!
//! `denom` is the total of all expenses, or 1 when there are none, so an
//! empty plan has zero shares rather than a division fault.
//!
//! Sums and products saturate at [`Decimal::MAX`] / [`Decimal::MIN`], so
//! amounts near the edge of the decimal range still produce a result.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use eco_core::calculations::Aggregator;
//! use eco_core::{AdviceTier, ExpenseEntry, ExpenseTag};
//!
//! let entries = vec![
//!     ExpenseEntry::new("Groceries", dec!(200), ExpenseTag::Sustainable),
//!     ExpenseEntry::new("Gas", dec!(300), ExpenseTag::Unsustainable),
//!     ExpenseEntry::new("Rent", dec!(400), ExpenseTag::Neutral),
//! ];
//!
//! let result = Aggregator::default().calculate(dec!(1000), &entries);
//!
//! assert_eq!(result.total_expenses, dec!(900));
//! assert_eq!(result.balance, dec!(100));
//! assert_eq!(result.eco_score, 54);
//! assert_eq!(result.advice, AdviceTier::Fair);
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::round_half_up_whole;
use crate::models::{AdviceTier, AggregateResult, CategoryTotal, ExpenseEntry, ExpenseTag};

/// Errors reported when validating an [`EcoScoreConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EcoScoreConfigError {
    /// The base score must lie within the 0–100 scale.
    #[error("base score must be between 0 and 100, got {0}")]
    InvalidBaseScore(Decimal),

    /// Weights and bonuses are magnitudes and cannot be negative.
    #[error("{name} must be non-negative, got {value}")]
    NegativeWeight { name: &'static str, value: Decimal },

    /// The savings threshold is a fraction of income.
    #[error("savings threshold must be between 0 and 1, got {0}")]
    InvalidSavingsThreshold(Decimal),
}

/// Weights used by the eco-score.
///
/// [`EcoScoreConfig::default`] holds the published scoring rule; the other
/// values exist so a deployment can tune the weighting from its config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcoScoreConfig {
    /// Starting score before any adjustment.
    pub base_score: Decimal,

    /// Points added for a plan that is entirely sustainable spending.
    pub sustainable_weight: Decimal,

    /// Points removed for a plan that is entirely unsustainable spending.
    pub unsustainable_weight: Decimal,

    /// Flat bonus for meeting the savings threshold.
    pub savings_bonus: Decimal,

    /// Fraction of income the balance must reach to earn the bonus.
    pub savings_threshold: Decimal,
}

impl Default for EcoScoreConfig {
    fn default() -> Self {
        Self {
            base_score: Decimal::from(50),
            sustainable_weight: Decimal::from(30),
            unsustainable_weight: Decimal::from(40),
            savings_bonus: Decimal::from(10),
            savings_threshold: Decimal::new(10, 2),
        }
    }
}

impl EcoScoreConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`EcoScoreConfigError`] if:
    /// - `base_score` is outside `[0, 100]`
    /// - any weight or the savings bonus is negative
    /// - `savings_threshold` is outside `[0, 1]`
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use eco_core::calculations::{EcoScoreConfig, EcoScoreConfigError};
    ///
    /// let config = EcoScoreConfig {
    ///     savings_threshold: dec!(1.5),
    ///     ..EcoScoreConfig::default()
    /// };
    ///
    /// assert_eq!(
    ///     config.validate(),
    ///     Err(EcoScoreConfigError::InvalidSavingsThreshold(dec!(1.5)))
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), EcoScoreConfigError> {
        if self.base_score < Decimal::ZERO || self.base_score > Decimal::ONE_HUNDRED {
            return Err(EcoScoreConfigError::InvalidBaseScore(self.base_score));
        }
        for (name, value) in [
            ("sustainable weight", self.sustainable_weight),
            ("unsustainable weight", self.unsustainable_weight),
            ("savings bonus", self.savings_bonus),
        ] {
            if value < Decimal::ZERO {
                return Err(EcoScoreConfigError::NegativeWeight { name, value });
            }
        }
        if self.savings_threshold < Decimal::ZERO || self.savings_threshold > Decimal::ONE {
            return Err(EcoScoreConfigError::InvalidSavingsThreshold(
                self.savings_threshold,
            ));
        }
        Ok(())
    }
}

/// Sums by tag, accumulated in a single pass over the entries.
#[derive(Debug, Default)]
struct TagTotals {
    sustainable: Decimal,
    unsustainable: Decimal,
    neutral: Decimal,
}

impl TagTotals {
    fn add(
        &mut self,
        tag: ExpenseTag,
        amount: Decimal,
    ) {
        let total = match tag {
            ExpenseTag::Sustainable => &mut self.sustainable,
            ExpenseTag::Unsustainable => &mut self.unsustainable,
            ExpenseTag::Neutral => &mut self.neutral,
        };
        *total = total.saturating_add(amount);
    }
}

/// Calculator turning income and expense entries into an [`AggregateResult`].
///
/// Deterministic and side-effect free; every input produces a result.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: EcoScoreConfig,
}

impl Aggregator {
    pub fn new(config: EcoScoreConfig) -> Self {
        Self { config }
    }

    /// Aggregates one plan.
    pub fn calculate(
        &self,
        income: Decimal,
        entries: &[ExpenseEntry],
    ) -> AggregateResult {
        let mut total_expenses = Decimal::ZERO;
        let mut tags = TagTotals::default();
        let mut category_totals: Vec<CategoryTotal> = Vec::new();

        for entry in entries {
            total_expenses = total_expenses.saturating_add(entry.amount);
            tags.add(entry.tag, entry.amount);

            let category = entry.reported_category();
            match category_totals.iter_mut().find(|c| c.category == category) {
                Some(bucket) => bucket.amount = bucket.amount.saturating_add(entry.amount),
                None => category_totals.push(CategoryTotal {
                    category: category.to_string(),
                    amount: entry.amount,
                }),
            }
        }

        let balance = income.saturating_sub(total_expenses);
        let eco_score = self.eco_score(income, balance, total_expenses, &tags);
        let advice = AdviceTier::from_score(eco_score);

        debug!(
            %income,
            %total_expenses,
            %balance,
            categories = category_totals.len(),
            eco_score,
            tier = advice.as_str(),
            "aggregated budget plan"
        );

        AggregateResult {
            total_income: income,
            total_expenses,
            balance,
            category_totals,
            sustainable_total: tags.sustainable,
            unsustainable_total: tags.unsustainable,
            neutral_total: tags.neutral,
            eco_score,
            advice,
        }
    }

    fn eco_score(
        &self,
        income: Decimal,
        balance: Decimal,
        total_expenses: Decimal,
        tags: &TagTotals,
    ) -> u8 {
        let denom = if total_expenses > Decimal::ZERO {
            total_expenses
        } else {
            Decimal::ONE
        };
        let sustainable_points = round_half_up_whole(
            share(tags.sustainable, denom).saturating_mul(self.config.sustainable_weight),
        );
        let unsustainable_points = round_half_up_whole(
            share(tags.unsustainable, denom).saturating_mul(self.config.unsustainable_weight),
        );

        let mut score = self
            .config
            .base_score
            .saturating_add(sustainable_points)
            .saturating_sub(unsustainable_points);
        if income > Decimal::ZERO
            && balance >= income.saturating_mul(self.config.savings_threshold)
        {
            score = score.saturating_add(self.config.savings_bonus);
        }

        score
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
            .round()
            .to_u8()
            .unwrap_or_default()
    }
}

/// `part / denom` for a positive `denom`, saturating when the quotient is
/// out of range.
fn share(
    part: Decimal,
    denom: Decimal,
) -> Decimal {
    part.checked_div(denom).unwrap_or(if part.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Aggregates with the default scoring rule.
pub fn aggregate(
    income: Decimal,
    entries: &[ExpenseEntry],
) -> AggregateResult {
    Aggregator::default().calculate(income, entries)
}
