// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Shared ULID-backed identifier machinery.
//!
//! `EventId` and `PipelineId` are both "a `Ulid`, validated and displayed the
//! same way, but not interchangeable with each other." `GenericId<Marker>` is
//! the zero-sized-marker newtype that gives each of them a distinct Rust type
//! while sharing one implementation of parsing, validation and
//! serialization.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::marker::PhantomData;
use ulid::Ulid;

use crate::LogFlowError;

/// Per-category validation hook, implemented by each marker type.
pub trait IdCategory {
    fn category_name() -> &'static str;
    fn validate_id(ulid: &Ulid) -> Result<(), LogFlowError>;
}

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct GenericId<M> {
    ulid: Ulid,
    _marker: PhantomData<M>,
}

impl<M: IdCategory> GenericId<M> {
    pub fn new() -> Self {
        Self { ulid: Ulid::new(), _marker: PhantomData }
    }

    pub fn from_ulid(ulid: Ulid) -> Result<Self, LogFlowError> {
        M::validate_id(&ulid)?;
        Ok(Self { ulid, _marker: PhantomData })
    }

    pub fn from_string(s: &str) -> Result<Self, LogFlowError> {
        let ulid = Ulid::from_string(s)
            .map_err(|e| LogFlowError::invalid_config(format!("invalid {} id '{}': {}", M::category_name(), s, e)))?;
        Self::from_ulid(ulid)
    }

    pub fn from_timestamp_ms(timestamp_ms: u64) -> Result<Self, LogFlowError> {
        let ulid = Ulid::from_parts(timestamp_ms, ulid::Ulid::new().random());
        Self::from_ulid(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.ulid.timestamp_ms()
    }

    pub fn datetime(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp_millis(self.timestamp_ms() as i64).unwrap_or_else(chrono::Utc::now)
    }

    pub fn validate(&self) -> Result<(), LogFlowError> {
        M::validate_id(&self.ulid)
    }

    pub fn is_nil(&self) -> bool {
        self.ulid == Ulid::nil()
    }

    #[cfg(test)]
    pub fn nil() -> Self {
        Self { ulid: Ulid::nil(), _marker: PhantomData }
    }
}

impl<M: IdCategory> Default for GenericId<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Display for GenericId<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ulid)
    }
}

impl<M> AsRef<Ulid> for GenericId<M> {
    fn as_ref(&self) -> &Ulid {
        &self.ulid
    }
}

impl<M> Serialize for GenericId<M> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.ulid.to_string().serialize(serializer)
    }
}

impl<'de, M> Deserialize<'de> for GenericId<M> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let ulid = Ulid::from_string(&s).map_err(serde::de::Error::custom)?;
        Ok(Self { ulid, _marker: PhantomData })
    }
}
