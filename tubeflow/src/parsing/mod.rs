//! Recovering JSON from generation output.
//!
//! Models often wrap JSON in prose or code fences. Parsing first tries the
//! whole text, then the span from the first `{` to the last `}`.

use crate::errors::ParseError;
use serde_json::{Map, Value};
use tracing::trace;

/// Parses JSON out of raw generation text.
///
/// # Errors
///
/// Returns `ParseError` when neither the whole text nor its outermost brace
/// span is valid JSON.
pub fn parse_json(raw: &str) -> Result<Value, ParseError> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return Ok(value);
    }

    let Some(span) = brace_span(raw) else {
        return Err(ParseError::new("no JSON object found", raw));
    };
    trace!(chars = span.len(), "Parsing embedded JSON span");
    serde_json::from_str::<Value>(span).map_err(|e| ParseError::new(e.to_string(), raw))
}

/// Parses raw generation text and requires a JSON object.
///
/// # Errors
///
/// Returns `ParseError` if no JSON can be recovered or it is not an object.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, ParseError> {
    match parse_json(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(ParseError::new(
            format!("expected a JSON object, got {}", type_name(&other)),
            raw,
        )),
    }
}

/// Returns a trimmed, non-empty string field.
#[must_use]
pub fn str_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Returns an array field, or an empty slice when absent or not an array.
#[must_use]
pub fn array_field<'a>(object: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    object
        .get(key)
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}

/// Reads a non-negative integer id from a number or numeric string.
#[must_use]
pub fn id_value(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
