//! Common utility functions for budget calculations.
//!
//! This module provides the numeric coercion applied to every amount a user
//! types, and the rounding rules shared by the eco-score and the display.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

/// Leading numeric literal: optional sign, digits with optional fraction (or
/// a bare fraction), optional exponent.
static MONEY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<sign>[+-])?(?:(?P<int>\d+)(?:\.(?P<frac>\d*))?|\.(?P<bare>\d+))(?:[eE](?P<exp>[+-]?\d+))?",
    )
    .expect("money prefix pattern is valid")
});

/// Coerces user-entered text into an amount.
///
/// Leading whitespace is skipped and the longest numeric prefix is read, so
/// `"12.50 pesos"` is `12.50`. The value is then rounded to the nearest
/// double, the precision a saved plan stores, so `"0.1234567890123456789"`
/// is `0.12345678901234568`. Anything without a numeric prefix, as well as
/// values too large to represent, becomes zero. This never fails.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use eco_core::calculations::common::parse_money;
///
/// assert_eq!(parse_money("200"), dec!(200));
/// assert_eq!(parse_money("  3.75kg"), dec!(3.75));
/// assert_eq!(parse_money("1e3"), dec!(1000));
/// assert_eq!(parse_money(""), Decimal::ZERO);
/// assert_eq!(parse_money("Infinity"), Decimal::ZERO);
/// ```
pub fn parse_money(input: &str) -> Decimal {
    let trimmed = input.trim_start();
    let Some(caps) = MONEY_PREFIX.captures(trimmed) else {
        if !trimmed.is_empty() {
            tracing::debug!(input = %input, "non-numeric amount, treating as 0");
        }
        return Decimal::ZERO;
    };

    let negative = caps.name("sign").is_some_and(|s| s.as_str() == "-");
    let int = caps.name("int").map_or("0", |m| m.as_str());
    let frac = caps
        .name("frac")
        .or_else(|| caps.name("bare"))
        .map_or("", |m| m.as_str());

    let mut mantissa = String::with_capacity(int.len() + frac.len() + 2);
    if negative {
        mantissa.push('-');
    }
    mantissa.push_str(int);
    if !frac.is_empty() {
        mantissa.push('.');
        mantissa.push_str(frac);
    }

    let parsed = match caps.name("exp") {
        Some(exp) => Decimal::from_scientific(&format!("{mantissa}e{}", exp.as_str())),
        None => Decimal::from_str(&mantissa),
    };

    match parsed {
        Ok(value) => to_stored_precision(value),
        Err(e) => {
            tracing::debug!(input = %input, "amount out of range, treating as 0: {}", e);
            Decimal::ZERO
        }
    }
}

/// Rounds `value` to the nearest double, written back as its shortest
/// decimal form.
///
/// Amounts are stored as JSON numbers, so this is exactly the value a saved
/// plan reads back.
pub fn to_stored_precision(value: Decimal) -> Decimal {
    value
        .to_string()
        .parse::<f64>()
        .map_or(Decimal::ZERO, decimal_from_f64)
}

/// Converts a float read from storage into a [`Decimal`].
///
/// Uses the shortest decimal representation of the float, so `0.1` becomes
/// exactly `0.1`. Non-finite or unrepresentable values become zero.
pub fn decimal_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&value.to_string())
        .or_else(|_| Decimal::from_scientific(&format!("{value:e}")))
        .unwrap_or(Decimal::ZERO)
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use eco_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to the nearest whole number, with halves going toward positive
/// infinity (`2.5 -> 3`, `-2.5 -> -2`).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use eco_core::calculations::common::round_half_up_whole;
///
/// assert_eq!(round_half_up_whole(dec!(6.6667)), dec!(7));
/// assert_eq!(round_half_up_whole(dec!(-2.5)), dec!(-2));
/// ```
pub fn round_half_up_whole(value: Decimal) -> Decimal {
    value.saturating_add(Decimal::new(5, 1)).floor()
}
