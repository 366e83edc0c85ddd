// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Bounded capacity for one of the pipeline runtime's internal channels
//! (`ingest`, `out`, per-sink).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCapacity {
    slots: usize,
}

impl QueueCapacity {
    pub const MIN: usize = 1;

    pub fn new(slots: usize) -> Self {
        Self { slots: slots.max(Self::MIN) }
    }

    /// `Q_ingest = 10 * batch_size`, shared by all sources.
    pub fn ingest_default(batch_size: super::batch_size::BatchSize) -> Self {
        Self::new(10 * batch_size.value())
    }

    /// `Q_out = 4 * batch_size`, between processors and the batcher.
    pub fn out_default(batch_size: super::batch_size::BatchSize) -> Self {
        Self::new(4 * batch_size.value())
    }

    /// `Q_sink = 2`, one per sink, holding batches awaiting write.
    pub fn sink_default() -> Self {
        Self::new(2)
    }

    pub fn value(&self) -> usize {
        self.slots
    }
}

impl fmt::Display for QueueCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::batch_size::BatchSize;

    #[test]
    fn ingest_and_out_scale_with_batch_size() {
        let batch_size = BatchSize::new(100);
        assert_eq!(QueueCapacity::ingest_default(batch_size).value(), 1000);
        assert_eq!(QueueCapacity::out_default(batch_size).value(), 400);
        assert_eq!(QueueCapacity::sink_default().value(), 2);
    }
}
