use std::fmt;

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calculations::common::parse_money;

/// Label reported for an expense whose category was left blank.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Environmental classification of a single expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpenseTag {
    #[default]
    Neutral,
    Sustainable,
    Unsustainable,
}

impl ExpenseTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Sustainable => "sustainable",
            Self::Unsustainable => "unsustainable",
        }
    }

    /// Strict parse; `None` for anything that is not a known tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" => Some(Self::Neutral),
            "sustainable" => Some(Self::Sustainable),
            "unsustainable" => Some(Self::Unsustainable),
            _ => None,
        }
    }

    /// Parses a tag the way the planner form does: unknown values are neutral.
    pub fn parse_lenient(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            if !s.trim().is_empty() {
                tracing::debug!(input = %s, "unrecognized expense tag, treating as neutral");
            }
            Self::Neutral
        })
    }
}

impl fmt::Display for ExpenseTag {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ExpenseTag {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

struct TagVisitor;

impl Visitor<'_> for TagVisitor {
    type Value = ExpenseTag;

    fn expecting(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("an expense tag string")
    }

    fn visit_str<E: de::Error>(
        self,
        v: &str,
    ) -> Result<ExpenseTag, E> {
        Ok(ExpenseTag::parse_lenient(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<ExpenseTag, E> {
        Ok(ExpenseTag::Neutral)
    }

    fn visit_none<E: de::Error>(self) -> Result<ExpenseTag, E> {
        Ok(ExpenseTag::Neutral)
    }

    fn visit_bool<E: de::Error>(
        self,
        _v: bool,
    ) -> Result<ExpenseTag, E> {
        Ok(ExpenseTag::Neutral)
    }

    fn visit_i64<E: de::Error>(
        self,
        _v: i64,
    ) -> Result<ExpenseTag, E> {
        Ok(ExpenseTag::Neutral)
    }

    fn visit_u64<E: de::Error>(
        self,
        _v: u64,
    ) -> Result<ExpenseTag, E> {
        Ok(ExpenseTag::Neutral)
    }

    fn visit_f64<E: de::Error>(
        self,
        _v: f64,
    ) -> Result<ExpenseTag, E> {
        Ok(ExpenseTag::Neutral)
    }
}

impl<'de> Deserialize<'de> for ExpenseTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TagVisitor)
    }
}

/// One tagged expense line of a budget plan.
///
/// The category is kept exactly as entered so a saved plan reloads verbatim;
/// use [`ExpenseEntry::reported_category`] wherever the label is aggregated or
/// shown. On the wire the fields are named `name`, `amt` and `tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    #[serde(rename = "name", default)]
    pub category: String,

    #[serde(rename = "amt", with = "crate::models::money", default)]
    pub amount: Decimal,

    #[serde(default)]
    pub tag: ExpenseTag,
}

impl ExpenseEntry {
    pub fn new(
        category: impl Into<String>,
        amount: Decimal,
        tag: ExpenseTag,
    ) -> Self {
        Self {
            category: category.into(),
            amount,
            tag,
        }
    }

    /// Builds an entry from raw form text, coercing the amount and tag.
    pub fn from_input(
        category: &str,
        amount: &str,
        tag: &str,
    ) -> Self {
        Self {
            category: category.to_string(),
            amount: parse_money(amount),
            tag: ExpenseTag::parse_lenient(tag),
        }
    }

    /// A blank entry, as shown in a freshly added form row.
    pub fn blank() -> Self {
        Self::new(String::new(), Decimal::ZERO, ExpenseTag::Neutral)
    }

    /// The category label used for totals and display ("Other" when empty).
    ///
    /// Only an empty label is replaced; whitespace is a label like any other.
    pub fn reported_category(&self) -> &str {
        if self.category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            &self.category
        }
    }
}
