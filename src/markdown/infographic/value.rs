//! Loose accessors over untyped JSON payloads.
//!
//! Payloads are hand-written in blog posts, so optional fields follow
//! JavaScript truthiness: `null`, `false`, `0` and `""` count as absent.

use serde_json::Value;

/// JavaScript-style truthiness.
pub(super) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a scalar the way it was written: strings unquoted, numbers and
/// booleans verbatim, `null` as nothing. Containers fall back to compact JSON.
pub(super) fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Optional display field, `None` when missing or falsy.
pub(super) fn text_field(data: &Value, key: &str) -> Option<String> {
    data.get(key).filter(|v| is_truthy(v)).map(display)
}

/// Optional string field compared by name (`trend`, `status`, `color`, ...).
pub(super) fn name_field<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str)
}

/// Required sequence field.
pub(super) fn array_field<'a>(data: &'a Value, key: &str) -> Option<&'a Vec<Value>> {
    data.get(key).and_then(Value::as_array)
}

/// A bare value becomes a one-element list; a list is taken as-is.
pub(super) fn as_list(data: &Value) -> Vec<&Value> {
    match data {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}
