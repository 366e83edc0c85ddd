// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! What the batcher does when a sink's queue is full.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Wait for room; never drops a batch.
    Block,
    /// Evict the oldest queued batch to make room, incrementing `events_dropped`.
    DropOldest,
    /// Discard the batch that would overflow the queue, incrementing `events_dropped`.
    DropNew,
}

impl Default for OverflowPolicy {
    fn default() -> Self {
        OverflowPolicy::Block
    }
}

impl OverflowPolicy {
    pub fn drops_events(&self) -> bool {
        !matches!(self, OverflowPolicy::Block)
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OverflowPolicy::Block => "block",
            OverflowPolicy::DropOldest => "drop_oldest",
            OverflowPolicy::DropNew => "drop_new",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for OverflowPolicy {
    type Err = crate::LogFlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "block" => Ok(OverflowPolicy::Block),
            "drop_oldest" => Ok(OverflowPolicy::DropOldest),
            "drop_new" => Ok(OverflowPolicy::DropNew),
            other => Err(crate::LogFlowError::invalid_config(format!("unknown overflow_policy '{}'", other))),
        }
    }
}
