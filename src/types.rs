//! Common types used throughout rowferry
//!
//! This module contains shared type definitions, type aliases,
//! and small helpers used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One row of a collection. No schema is enforced.
pub type Record = JsonObject;

/// Name of the distinguished key field
pub const ID_FIELD: &str = "id";

// ============================================================================
// Record Identity
// ============================================================================

/// The `id` of a record: a sequence-assigned integer or a client-assigned
/// UUID-like string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Destination-assigned sequence value
    Int(i64),
    /// Client-assigned stable key
    Text(String),
}

impl RecordId {
    /// Read the id of a record, if it has a usable one
    pub fn of(record: &Record) -> Option<Self> {
        Self::from_value(record.get(ID_FIELD)?)
    }

    /// Interpret a JSON value as an id
    pub fn from_value(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Number(n) => n.as_i64().map(Self::Int),
            JsonValue::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Integer form, for identity-keyed collections
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// JSON helpers
// ============================================================================

/// Walk a dotted path (`$.a.b` or `a.b`) through nested objects
pub fn extract_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match current {
            JsonValue::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Extract an opaque continuation token at `path`.
///
/// Strings are returned verbatim; numbers are rendered with their JSON text.
/// Null, missing and empty values yield `None`.
pub fn extract_token(value: &JsonValue, path: &str) -> Option<String> {
    match extract_path(value, path)? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
