// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Maximum time the batcher waits, after the first event of a batch, before
//! emitting it regardless of size.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchTimeout {
    seconds: f64,
}

impl BatchTimeout {
    pub const DEFAULT_SECS: f64 = 5.0;

    /// A non-positive value is clamped to zero, which causes every non-empty
    /// timeout tick to emit immediately.
    pub fn from_secs_f64(seconds: f64) -> Self {
        Self { seconds: seconds.max(0.0) }
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs_f64(self.seconds)
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl Default for BatchTimeout {
    fn default() -> Self {
        Self::from_secs_f64(Self::DEFAULT_SECS)
    }
}

impl fmt::Display for BatchTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_seconds_clamp_to_zero() {
        assert_eq!(BatchTimeout::from_secs_f64(-1.0).seconds(), 0.0);
    }
}
