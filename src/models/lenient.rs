//! Forgiving field deserializers.
//!
//! Records arrive from collaborators whose storage is loosely typed. A bad
//! value in one field is replaced by that field's default and logged; it
//! never fails the whole record.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::YearMonth;
use crate::calculation::parse_hire_date;

/// Interprets a raw JSON/YAML value as a decimal amount.
///
/// Accepts numbers and numeric strings (a comma decimal separator is
/// tolerated). Returns `None` for anything else, including null.
pub(crate) fn parse_amount(raw: &Value) -> Option<Decimal> {
    match raw {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        Value::String(s) => {
            let trimmed = s.trim().replace(',', ".");
            Decimal::from_str(&trimmed)
                .or_else(|_| Decimal::from_scientific(&trimmed))
                .ok()
        }
        _ => None,
    }
}

pub(crate) fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match parse_amount(&raw) {
        Some(amount) => amount,
        None => {
            if !raw.is_null() {
                warn!(value = %raw, "Non-numeric amount replaced by 0");
            }
            Decimal::ZERO
        }
    })
}

/// Like [`decimal_or_zero`] but negative amounts are also replaced by 0.
pub(crate) fn non_negative_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = decimal_or_zero(deserializer)?;
    if amount.is_sign_negative() {
        warn!(value = %amount, "Negative adjustment amount replaced by 0");
        return Ok(Decimal::ZERO);
    }
    Ok(amount)
}

/// Missing, null or malformed all mean "not supplied".
pub(crate) fn optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let amount = parse_amount(&raw).filter(|a| !a.is_sign_negative());
    if amount.is_none() && !raw.is_null() {
        warn!(value = %raw, "Malformed optional amount ignored");
    }
    Ok(amount)
}

pub(crate) fn hire_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let parsed = match &raw {
        Value::String(s) => parse_hire_date(s),
        _ => None,
    };
    if parsed.is_none() && !raw.is_null() {
        warn!(value = %raw, "Unparsable hire date treated as missing");
    }
    Ok(parsed)
}

/// A `"YYYY-MM"` marker; anything unparsable becomes `None`.
pub(crate) fn year_month<'de, D>(deserializer: D) -> Result<Option<YearMonth>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let parsed = match &raw {
        Value::String(s) => s.parse::<YearMonth>().ok(),
        _ => None,
    };
    if parsed.is_none() && !raw.is_null() {
        warn!(value = %raw, "Malformed year-month treated as missing");
    }
    Ok(parsed)
}
