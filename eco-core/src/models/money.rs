//! Serde adapter for monetary fields stored as JSON numbers.
//!
//! Whole amounts are written as integers (`300`), everything else as the
//! nearest double (`12.5`). Amounts entered through
//! [`parse_money`](crate::calculations::common::parse_money) are already at
//! that precision, so they read back unchanged. Reading is permissive:
//! numbers, numeric strings and `null` are all accepted, and anything that
//! cannot be coerced becomes zero.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

use crate::calculations::common::{decimal_from_f64, parse_money};

pub fn serialize<S: Serializer>(
    value: &Decimal,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if value.fract().is_zero() {
        if let Some(whole) = value.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    // Parsing the decimal text rounds correctly; `to_f64` may be off by an ulp.
    let float = value.to_string().parse::<f64>().unwrap_or(0.0);
    serializer.serialize_f64(float)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    deserializer.deserialize_any(MoneyVisitor)
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Decimal;

    fn expecting(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("a number, a numeric string, or null")
    }

    fn visit_i64<E: de::Error>(
        self,
        v: i64,
    ) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(
        self,
        v: u64,
    ) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(
        self,
        v: f64,
    ) -> Result<Decimal, E> {
        Ok(decimal_from_f64(v))
    }

    fn visit_str<E: de::Error>(
        self,
        v: &str,
    ) -> Result<Decimal, E> {
        Ok(parse_money(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }
}
