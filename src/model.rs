//! Data binding.
//!
//! Templates name model values by dotted path (`order.lines.0.qty`). The
//! render driver only talks to [`DataModel`]; the crate ships an
//! implementation for `serde_json::Value`, which is also what list items are
//! handed back as, so a `foreach` body can use an item as its own scope.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::Value;

use crate::types::format_number;

/// A value resolved from the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Object(Value),
}

impl ModelValue {
    /// Text written into a cell for this value.
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::Bytes(b) => format!("<{} bytes>", b.len()),
            Self::List(items) => items
                .iter()
                .map(|v| ModelValue::from_json(v).display_text())
                .collect::<Vec<_>>()
                .join(", "),
            Self::Object(v) => v.to_string(),
        }
    }

    /// Convert a JSON value, decoding base64 strings to bytes.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Text(String::new()),
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n
                .as_f64()
                .map_or_else(|| Self::Text(n.to_string()), Self::Number),
            Value::String(s) => decode_bytes(s).map_or_else(|| Self::Text(s.clone()), Self::Bytes),
            Value::Array(items) => Self::List(items.clone()),
            Value::Object(_) => Self::Object(value.clone()),
        }
    }

    /// Items to iterate for `foreach`. Scalars iterate once.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::List(items) => items,
            Self::Object(v) => vec![v],
            Self::Text(s) => vec![Value::String(s)],
            Self::Number(n) => vec![serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)],
            Self::Bool(b) => vec![Value::Bool(b)],
            Self::Bytes(b) => vec![Value::String(format!("base64:{}", BASE64.encode(b)))],
        }
    }
}

/// Read-only lookup of template bindings.
pub trait DataModel {
    /// Resolve a dotted path. An empty path or `.` names the model itself.
    fn lookup(&self, path: &str) -> Option<ModelValue>;
}

impl DataModel for Value {
    fn lookup(&self, path: &str) -> Option<ModelValue> {
        resolve_path(self, path).map(ModelValue::from_json)
    }
}

/// A model with nothing in it. Every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyModel;

impl DataModel for EmptyModel {
    fn lookup(&self, _path: &str) -> Option<ModelValue> {
        None
    }
}

/// Walk `path` through objects (by key) and arrays (by numeric index).
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    if path.is_empty() || path == "." {
        return Some(root);
    }
    path.split('.').try_fold(root, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|idx| items.get(idx)),
        _ => None,
    })
}

/// `base64:<data>` or `data:<mime>;base64,<data>`.
pub(crate) fn decode_bytes(s: &str) -> Option<Vec<u8>> {
    let payload = if let Some(rest) = s.strip_prefix("base64:") {
        rest
    } else if let Some(rest) = s.strip_prefix("data:") {
        let (_, data) = rest.split_once(";base64,")?;
        data
    } else {
        return None;
    };
    match BASE64.decode(payload.trim()) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::debug!("model string is not valid base64: {e}");
            None
        }
    }
}
