//! Lenient decoding of monetary amounts and dates
//!
//! The backend stores amounts as whatever the form sent, so a record may carry
//! a number, a numeric string, `null`, or garbage. Anything that is not a
//! finite number counts as zero.

use chrono::{DateTime, NaiveDate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Parse a loosely typed JSON amount, treating non-numeric input as zero
pub fn from_value(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from(u)
            } else {
                n.as_f64().and_then(Decimal::from_f64).unwrap_or(Decimal::ZERO)
            }
        }
        Value::String(s) => parse_str(s),
        _ => Decimal::ZERO,
    }
}

/// Parse an amount typed by a user or stored as text
pub fn parse_str(s: &str) -> Decimal {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .or_else(|| {
            s.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .and_then(Decimal::from_f64)
        })
        .unwrap_or(Decimal::ZERO)
}

/// Serde adapter for `amount` fields
pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(from_value).unwrap_or(Decimal::ZERO))
}

/// Serde adapter for optional amount fields such as report totals
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(from_value(&v)),
    })
}

/// Parse a backend date: RFC 3339 timestamps or plain `YYYY-MM-DD`
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .or_else(|| {
            // "2026-10-17T00:00:00" without an offset
            raw.get(..10)
                .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
        })
}

/// Format an amount for display with two decimals
pub fn display(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
