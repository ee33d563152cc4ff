//! Tolerant accessor for the gate service's JSON payloads.
//!
//! The remote API returns the same logical resource sometimes as a bare
//! object and sometimes as a one-element array, depending on endpoint and
//! query shape. Normalizing that here keeps the branching out of every
//! caller.

use serde_json::{Map, Value};

use crate::errors::JsonError;

/// Parse `text` as an object, unwrapping a one-element array if needed.
pub fn parse_object(text: &str) -> Result<Map<String, Value>, JsonError> {
    let value: Value = serde_json::from_str(text).map_err(|source| JsonError::Malformed {
        payload: text.to_string(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(map)) => Ok(map),
            _ => Err(JsonError::UnexpectedShape {
                payload: text.to_string(),
            }),
        },
        _ => Err(JsonError::UnexpectedShape {
            payload: text.to_string(),
        }),
    }
}

/// Parse `text` as an array. Blank input is an empty array; a non-array
/// value becomes a one-element array wrapping it.
pub fn parse_array(text: &str) -> Result<Vec<Value>, JsonError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(text).map_err(|source| JsonError::Malformed {
        payload: text.to_string(),
        source,
    })?;
    match value {
        Value::Array(items) => Ok(items),
        other => Ok(vec![other]),
    }
}

/// Textual value of a top-level field, or `None` when the field is absent
/// or the input is blank. Strings come back unquoted, numbers as digits.
pub fn field_at(text: &str, field: &str) -> Result<Option<String>, JsonError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let object = parse_object(text)?;
    Ok(object.get(field).map(render_scalar))
}

/// Shorthand for the ubiquitous `id` field.
pub fn id_field(text: &str) -> Result<Option<String>, JsonError> {
    field_at(text, "id")
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
