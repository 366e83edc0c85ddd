// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Structured values stored in a [`LogEvent`](super::LogEvent)'s `fields` map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A value extracted or derived by a processor.
///
/// `Map` uses an [`IndexMap`] rather than a `HashMap` so nested field access
/// and serialization are deterministic, which makes processor output
/// reproducible in tests without weakening the unordered-mapping semantics
/// the data model requires (iteration order is an implementation detail, not
/// a guarantee callers may depend on).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<FieldValue>),
    Map(IndexMap<String, FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Looks up a dotted path (`a.b.c`) through nested maps. A path that
    /// traverses a non-map value is a miss, never an error.
    pub fn get_path<'a>(&'a self, path: &str) -> Option<&'a FieldValue> {
        let mut current = self;
        for segment in path.split('.') {
            match current {
                FieldValue::Map(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Converts to a `serde_json::Value`, the interop format used at
    /// configuration and processor boundaries.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::from(*i),
            FieldValue::Float(f) => serde_json::Value::from(*f),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::List(items) => serde_json::Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldValue::Map(map) => {
                serde_json::Value::Object(map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
        }
    }

    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::Array(items) => FieldValue::List(items.into_iter().map(FieldValue::from_json).collect()),
            serde_json::Value::Object(map) => {
                FieldValue::Map(map.into_iter().map(|(k, v)| (k, FieldValue::from_json(v))).collect())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_path_reaches_nested_maps() {
        let mut inner = IndexMap::new();
        inner.insert("b".to_string(), FieldValue::Int(7));
        let mut outer = IndexMap::new();
        outer.insert("a".to_string(), FieldValue::Map(inner));
        let value = FieldValue::Map(outer);

        assert_eq!(value.get_path("a.b"), Some(&FieldValue::Int(7)));
    }

    #[test]
    fn path_through_non_map_is_a_miss_not_an_error() {
        let value = FieldValue::Int(1);
        assert_eq!(value.get_path("a.b"), None);
    }

    #[test]
    fn json_round_trip_preserves_shape() {
        let original = FieldValue::List(vec![FieldValue::Int(1), FieldValue::String("x".into()), FieldValue::Null]);
        let json = original.to_json();
        assert_eq!(FieldValue::from_json(json), original);
    }
}
