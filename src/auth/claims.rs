//! Decoded claim values.
//!
//! Token payloads are untyped JSON. Rather than passing `serde_json`
//! values through the authorization path, claims are narrowed into a
//! closed variant type with a single textual form used uniformly for
//! equality comparison. Configuration values are always plain strings,
//! so a boolean claim `true` matches the configured value `"true"` and
//! an integer `1` matches `"1"` regardless of JSON type.

use std::collections::HashMap;

use serde_json::Value;

/// The full decoded claim set of a verified token. Produced fresh per
/// request, never persisted.
pub type Claims = HashMap<String, ClaimValue>;

/// A single decoded claim value.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Sequence(Vec<ClaimValue>),
}

impl ClaimValue {
    /// Natural textual form, used for equality against configured
    /// requirement values.
    pub fn stringify(&self) -> String {
        match self {
            ClaimValue::Null => "null".to_string(),
            ClaimValue::Bool(b) => b.to_string(),
            ClaimValue::Number(n) => n.to_string(),
            ClaimValue::String(s) => s.clone(),
            ClaimValue::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(ClaimValue::stringify).collect();
                format!("[{}]", parts.join(","))
            }
        }
    }

    /// The elements of a sequence claim, or `None` for scalars.
    pub fn as_sequence(&self) -> Option<&[ClaimValue]> {
        match self {
            ClaimValue::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Value> for ClaimValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ClaimValue::Null,
            Value::Bool(b) => ClaimValue::Bool(b),
            Value::Number(n) => ClaimValue::Number(n),
            Value::String(s) => ClaimValue::String(s),
            Value::Array(items) => {
                ClaimValue::Sequence(items.into_iter().map(ClaimValue::from).collect())
            }
            // Objects carry no authorization semantics; keep their
            // compact JSON form so existence checks still work.
            Value::Object(_) => ClaimValue::String(value.to_string()),
        }
    }
}

/// Flatten a decoded token payload into a claim map. Anything other
/// than a JSON object yields an empty claim set.
pub fn claims_from_json(payload: Value) -> Claims {
    match payload {
        Value::Object(map) => map
            .into_iter()
            .map(|(name, value)| (name, ClaimValue::from(value)))
            .collect(),
        _ => Claims::new(),
    }
}
