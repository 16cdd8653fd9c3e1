//! Normalization of backend response shapes
//!
//! Endpoints answer with a bare array, a bare object, `{ "data": ... }`, or
//! `{ "success": bool, "data": ..., "error" | "message": ... }`. Callers only
//! ever see the canonical list or single record.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Normalize a response into a list of records
pub fn into_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => decode_items(items),
        Value::Object(mut map) => {
            if let Some(failure) = failure_message(&map) {
                return Err(Error::api(failure));
            }
            match map.remove("data") {
                Some(Value::Array(items)) => decode_items(items),
                Some(Value::Null) | None if succeeded(&map) => Ok(Vec::new()),
                _ => Err(Error::api("Invalid response data format")),
            }
        }
        _ => Err(Error::api("Invalid response data format")),
    }
}

/// Normalize a response into a single record
pub fn into_single<T: DeserializeOwned>(value: Value) -> Result<T> {
    let value = match value {
        Value::Object(mut map) => {
            if let Some(failure) = failure_message(&map) {
                return Err(Error::api(failure));
            }
            match map.remove("data") {
                Some(data @ Value::Object(_)) => data,
                Some(other) => {
                    map.insert("data".to_string(), other);
                    Value::Object(map)
                }
                None => Value::Object(map),
            }
        }
        other => other,
    };

    Ok(serde_json::from_value(value)?)
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(Error::from))
        .collect()
}

fn succeeded(map: &serde_json::Map<String, Value>) -> bool {
    matches!(map.get("success"), Some(Value::Bool(true)))
}

fn failure_message(map: &serde_json::Map<String, Value>) -> Option<String> {
    if !matches!(map.get("success"), Some(Value::Bool(false))) {
        return None;
    }

    let text = |key: &str| match map.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };

    Some(
        text("error")
            .or_else(|| text("message"))
            .unwrap_or_else(|| "Request failed".to_string()),
    )
}
