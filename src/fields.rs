//! Field-level helpers shared by the record types
//!
//! The backend is loose about key names (`_id` next to `id`, camelCase next to
//! snake_case) and about value types. Records are therefore decoded from a
//! [`Record`] map, where each field takes the first key that is present and
//! a value of the wrong type degrades to the field's empty value.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::amount;

/// A raw JSON object about to become a typed record
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub(crate) struct Record(Map<String, Value>);

impl Record {
    fn first(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    /// The record id; `_id` wins over `id` when both are sent
    pub(crate) fn id(&self) -> String {
        self.reference(&["_id", "id"]).unwrap_or_default()
    }

    pub(crate) fn text(&self, keys: &[&str]) -> String {
        self.first(keys).map(text_from_value).unwrap_or_default()
    }

    pub(crate) fn optional_text(&self, keys: &[&str]) -> Option<String> {
        Some(self.text(keys)).filter(|text| !text.is_empty())
    }

    pub(crate) fn reference(&self, keys: &[&str]) -> Option<String> {
        self.first(keys).and_then(reference_from_value)
    }

    pub(crate) fn amount(&self, keys: &[&str]) -> Decimal {
        self.first(keys).map(amount::from_value).unwrap_or_default()
    }

    pub(crate) fn date(&self, keys: &[&str]) -> Option<String> {
        self.first(keys).and_then(date_from_value)
    }

    /// Decode a typed value, falling back to its default on any mismatch
    pub(crate) fn lenient<T: DeserializeOwned + Default>(&self, keys: &[&str]) -> T {
        self.first(keys)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }
}

fn reference_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("_id")
            .filter(|v| !v.is_null())
            .or_else(|| map.get("id"))
            .and_then(reference_from_value),
        _ => None,
    }
}

fn text_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn date_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Decode an optional date string; anything but a non-empty string is `None`
pub fn date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(date_from_value))
}
