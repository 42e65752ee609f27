use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Advice band an eco-score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceTier {
    Excellent,
    Good,
    Fair,
    Low,
}

impl AdviceTier {
    /// [80,100] excellent, [60,80) good, [40,60) fair, below 40 low.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Low => "low",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Self::Excellent => {
                "Excellent — your plan strongly favors sustainable choices and savings."
            }
            Self::Good => {
                "Good — some sustainable choices. Consider shifting more to low-carbon options."
            }
            Self::Fair => {
                "Fair — there are improvements available: public transit, local produce, repair-first."
            }
            Self::Low => {
                "Low — high share of unsustainable spending. Prioritize reuse, repair, and public transport."
            }
        }
    }
}

/// Summed amount for one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// Totals, category breakdown and eco-score for one calculation pass.
///
/// Derived on every calculation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub total_income: Decimal,
    pub total_expenses: Decimal,

    /// `total_income - total_expenses`; negative when overspent.
    pub balance: Decimal,

    /// One bucket per reported category, in first-seen order.
    pub category_totals: Vec<CategoryTotal>,

    pub sustainable_total: Decimal,
    pub unsustainable_total: Decimal,
    pub neutral_total: Decimal,

    /// Always within 0..=100.
    pub eco_score: u8,
    pub advice: AdviceTier,
}
