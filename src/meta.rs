//! Untyped node metadata.
//!
//! Producers attach arbitrary key/value pairs under `facets.metadata.meta`.
//! Any level may be missing or shaped differently; all of those read as an
//! empty mapping.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Str(String),
    Num(f64),
    Bool(bool),
    Absent,
}

pub type Metadata = BTreeMap<String, MetaValue>;

impl MetaValue {
    /// Nested objects and arrays are kept as their compact JSON text.
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => MetaValue::Absent,
            Value::Bool(b) => MetaValue::Bool(*b),
            Value::Number(n) => n.as_f64().map(MetaValue::Num).unwrap_or(MetaValue::Absent),
            Value::String(s) => MetaValue::Str(s.clone()),
            Value::Array(_) | Value::Object(_) => MetaValue::Str(v.to_string()),
        }
    }

    /// Falsy values are suppressed from every display.
    pub fn is_falsy(&self) -> bool {
        match self {
            MetaValue::Absent => true,
            MetaValue::Bool(b) => !b,
            MetaValue::Num(n) => *n == 0.0 || n.is_nan(),
            MetaValue::Str(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Str(s) => f.write_str(s),
            MetaValue::Num(n) => write!(f, "{}", n),
            MetaValue::Bool(b) => write!(f, "{}", b),
            MetaValue::Absent => Ok(()),
        }
    }
}

/// Read `facets.metadata.meta`.
pub fn metadata_from_facets(facets: Option<&Value>) -> Metadata {
    facets
        .and_then(|f| f.get("metadata"))
        .and_then(|m| m.get("meta"))
        .and_then(Value::as_object)
        .map(|meta| {
            meta.iter()
                .map(|(k, v)| (k.clone(), MetaValue::from_json(v)))
                .collect()
        })
        .unwrap_or_default()
}

/// Entries worth showing, in key order.
pub fn visible_entries(meta: &Metadata) -> impl Iterator<Item = (&String, &MetaValue)> {
    meta.iter().filter(|(_, v)| !v.is_falsy())
}

/// `row_count` -> `row count`.
pub fn display_key(key: &str) -> String {
    key.replace('_', " ")
}

/// Flattened `key: value` text used for search matching.
pub fn flatten(meta: &Metadata) -> String {
    visible_entries(meta)
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}
