//! Tolerant field accessors over raw backend payloads.
//!
//! Each accessor encodes one defaulting policy. A field that is absent
//! is silently defaulted; a field that is present but wrong-shaped is
//! defaulted with a debug log, since that usually means a backend
//! schema change worth noticing.

use serde_json::Value;

use crate::domain::foundation::Timestamp;

/// Returns the field as a string slice, or `None` for anything else.
pub(crate) fn str_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

/// Returns the field as an owned string, defaulting to `""`.
pub(crate) fn string_or_empty(payload: &Value, key: &str) -> String {
    match payload.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            tracing::debug!(
                "field '{}' has {} shape, defaulting to empty string",
                key,
                json_kind(other)
            );
            String::new()
        }
        None => String::new(),
    }
}

/// Returns the field as a bool, defaulting to `false`.
///
/// Only a JSON boolean counts; truthy strings or numbers never grant
/// `true`.
pub(crate) fn bool_or_false(payload: &Value, key: &str) -> bool {
    match payload.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            tracing::debug!(
                "field '{}' has {} shape, defaulting to false",
                key,
                json_kind(other)
            );
            false
        }
        None => false,
    }
}

/// Parses the field as an ISO-8601 timestamp, `None` on any failure.
pub(crate) fn timestamp_field(payload: &Value, key: &str) -> Option<Timestamp> {
    match payload.get(key) {
        Some(Value::String(raw)) => {
            let parsed = Timestamp::parse_iso8601(raw);
            if parsed.is_none() {
                tracing::debug!("field '{}' is not a valid ISO-8601 timestamp: {}", key, raw);
            }
            parsed
        }
        Some(other) => {
            tracing::debug!("field '{}' has {} shape, expected string", key, json_kind(other));
            None
        }
        None => None,
    }
}

/// Human-readable JSON value kind for log messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
