// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The canonical record that traverses a pipeline.

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::event_id::EventId;
use super::field_value::FieldValue;

/// A single log record flowing through a pipeline.
///
/// `id`, `timestamp` and `source` are set once at ingestion and are non-empty
/// for the lifetime of the event inside the processor chain. `raw_data` is
/// conceptually immutable after admission; processors that need to change the
/// raw payload write a new field instead of mutating it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub id: EventId,
    #[serde(with = "crate::value_objects::datetime_serde")]
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub raw_data: String,
    #[serde(default)]
    pub fields: IndexMap<String, FieldValue>,
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
    #[serde(default)]
    pub tags: IndexSet<String>,
}

impl LogEvent {
    /// Creates an event at arrival time, for sources that cannot supply
    /// their own event timestamp.
    pub fn new(source: impl Into<String>, raw_data: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            timestamp: Utc::now(),
            source: source.into(),
            raw_data: raw_data.into(),
            fields: IndexMap::new(),
            metadata: IndexMap::new(),
            tags: IndexSet::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Looks up a field by dotted path (`a.b.c`). A path through a
    /// non-mapping value is a miss, never an error.
    pub fn get_field(&self, path: &str) -> Option<&FieldValue> {
        let mut parts = path.splitn(2, '.');
        let head = parts.next()?;
        let value = self.fields.get(head)?;
        match parts.next() {
            Some(rest) => value.get_path(rest),
            None => Some(value),
        }
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// `true` once `id`, `timestamp`, and `source` are populated, the
    /// invariant the processor chain requires on admission.
    pub fn is_admissible(&self) -> bool {
        !self.source.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_field_lookup_uses_dotted_path() {
        let mut event = LogEvent::new("stdin", "{}");
        let mut nested = IndexMap::new();
        nested.insert("city".to_string(), FieldValue::from("Paris"));
        event.set_field("geo", FieldValue::Map(nested));

        assert_eq!(event.get_field("geo.city"), Some(&FieldValue::from("Paris")));
        assert_eq!(event.get_field("geo.country"), None);
    }

    #[test]
    fn new_event_is_admissible() {
        let event = LogEvent::new("file", "hello");
        assert!(event.is_admissible());
        assert!(!event.id.to_string().is_empty());
    }

    #[test]
    fn serde_round_trip_preserves_tags_order() {
        let mut event = LogEvent::new("stdin", "hello");
        event.add_tag("b");
        event.add_tag("a");

        let json = serde_json::to_string(&event).unwrap();
        let restored: LogEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.tags.iter().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
