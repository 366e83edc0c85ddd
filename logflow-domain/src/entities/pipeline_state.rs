// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The pipeline lifecycle state machine.

use serde::{Deserialize, Serialize};

/// Allowed transitions:
///
/// ```text
/// created → starting → running → stopping → stopped
///                       │            │
///                       ▼            ▼
///                     failed      failed
/// stopped → starting (restart)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Created,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl PipelineState {
    /// Whether `next` is a legal transition from `self`.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Created, Starting)
                | (Starting, Running)
                | (Starting, Failed)
                | (Running, Stopping)
                | (Running, Failed)
                | (Stopping, Stopped)
                | (Stopping, Failed)
                | (Stopped, Starting)
        )
    }

    /// No further transitions happen without an explicit restart.
    pub fn is_complete(&self) -> bool {
        matches!(self, PipelineState::Stopped | PipelineState::Failed)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PipelineState::Starting | PipelineState::Running | PipelineState::Stopping)
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PipelineState::Created => "created",
            PipelineState::Starting => "starting",
            PipelineState::Running => "running",
            PipelineState::Stopping => "stopping",
            PipelineState::Stopped => "stopped",
            PipelineState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_can_move_to_stopping_or_failed() {
        assert!(PipelineState::Running.can_transition_to(PipelineState::Stopping));
        assert!(PipelineState::Running.can_transition_to(PipelineState::Failed));
        assert!(!PipelineState::Running.can_transition_to(PipelineState::Created));
    }

    #[test]
    fn stopped_can_restart() {
        assert!(PipelineState::Stopped.can_transition_to(PipelineState::Starting));
    }

    #[test]
    fn failed_and_stopped_are_terminal() {
        assert!(PipelineState::Failed.is_complete());
        assert!(PipelineState::Stopped.is_complete());
        assert!(!PipelineState::Running.is_complete());
    }
}
