// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Type-safe identifier for a configured pipeline instance inside the
//! [`Engine`](crate) registry.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use ulid::Ulid;

use super::generic_id::{GenericId, IdCategory};
use crate::LogFlowError;

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PipelineId(GenericId<PipelineMarker>);

#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct PipelineMarker;

impl IdCategory for PipelineMarker {
    fn category_name() -> &'static str {
        "pipeline"
    }

    fn validate_id(ulid: &Ulid) -> Result<(), LogFlowError> {
        if *ulid == Ulid::nil() {
            return Err(LogFlowError::invalid_config("pipeline id cannot be nil"));
        }
        Ok(())
    }
}

impl PipelineId {
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
}

impl Default for PipelineId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PipelineId {
    type Err = LogFlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl Serialize for PipelineId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PipelineId {
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
    fn round_trips_through_string() {
        let id = PipelineId::new();
        let parsed: PipelineId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
