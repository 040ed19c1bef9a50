//! Monetary amounts in minor currency units.
//!
//! Amounts arrive as JSON numbers and may be integers or decimals. They are
//! held as [`Decimal`] so that `12.5` stays `12.5` instead of drifting
//! through binary floating point arithmetic.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Number;

/// Converts a JSON number to a decimal.
///
/// Returns `None` when the value does not fit a `Decimal` (roughly ±7.9e28).
/// Numbers written with a fractional part keep at least one decimal place,
/// so `500.0` is written back as `500.0` rather than `500`.
pub fn from_json_number(n: &Number) -> Option<Decimal> {
    if let Some(v) = n.as_i64() {
        return Some(Decimal::from(v));
    }
    if let Some(v) = n.as_u64() {
        return Some(Decimal::from(v));
    }

    let text = n.to_string();
    let mut value = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()?;
    if value.scale() == 0 {
        value.rescale(1);
    }
    Some(value)
}

/// Converts a decimal back to a JSON number.
///
/// Values with no decimal places become JSON integers when they fit 64 bits.
/// Everything else is written as a float.
pub fn to_json_number(value: &Decimal) -> Option<Number> {
    if value.scale() == 0 {
        if let Some(v) = value.to_i64() {
            return Some(Number::from(v));
        }
        if let Some(v) = value.to_u64() {
            return Some(Number::from(v));
        }
    }
    Number::from_f64(value.to_f64()?)
}

/// Serde adapter writing a [`Decimal`] as a plain JSON number.
///
/// Use with `#[serde(with = "common::amount::json_number")]`.
pub mod json_number {
    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Number;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        super::to_json_number(value)
            .ok_or_else(|| S::Error::custom(format!("amount {value} cannot be written as JSON")))?
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let n = Number::deserialize(deserializer)?;
        super::from_json_number(&n)
            .ok_or_else(|| D::Error::custom(format!("amount {n} is out of range")))
    }
}
