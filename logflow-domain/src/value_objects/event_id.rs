// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Type-safe identifier for a single [`LogEvent`](crate::value_objects::LogEvent).
//!
//! `EventId` wraps a [`Ulid`](ulid::Ulid) so event identifiers sort in
//! creation order and carry their creation timestamp without an extra field.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use ulid::Ulid;

use super::generic_id::{GenericId, IdCategory};
use crate::LogFlowError;

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EventId(GenericId<EventMarker>);

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct EventMarker;

impl IdCategory for EventMarker {
    fn category_name() -> &'static str {
        "event"
    }

    fn validate_id(ulid: &Ulid) -> Result<(), LogFlowError> {
        if *ulid == Ulid::nil() {
            return Err(LogFlowError::invalid_config("event id cannot be nil"));
        }
        Ok(())
    }
}

impl EventId {
    /// Generates a new event id with the current timestamp.
    pub fn new() -> Self {
        Self(GenericId::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Result<Self, LogFlowError> {
        Ok(Self(GenericId::from_ulid(ulid)?))
    }

    pub fn from_string(s: &str) -> Result<Self, LogFlowError> {
        Ok(Self(GenericId::from_string(s)?))
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0.as_ulid()
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.0.timestamp_ms()
    }

    pub fn datetime(&self) -> chrono::DateTime<chrono::Utc> {
        self.0.datetime()
    }

    #[cfg(test)]
    pub fn nil() -> Self {
        Self(GenericId::nil())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EventId {
    type Err = LogFlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl From<Ulid> for EventId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid).unwrap_or_else(|_| Self::new())
    }
}

impl Serialize for EventId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let generic_id = GenericId::deserialize(deserializer)?;
        Ok(Self(generic_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_time_ordered() {
        let a = EventId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = EventId::new();
        assert!(a.timestamp_ms() <= b.timestamp_ms());
    }

    #[test]
    fn round_trips_through_string() {
        let id = EventId::new();
        let parsed: EventId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn nil_ulid_is_rejected() {
        assert!(EventId::from_ulid(Ulid::nil()).is_err());
    }
}
