// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! One variant per lifecycle transition an `Engine` makes observable.

use serde::{Deserialize, Serialize};

use crate::value_objects::PipelineId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    Loaded { pipeline_id: PipelineId, name: String },
    Started { pipeline_id: PipelineId },
    Stopped { pipeline_id: PipelineId },
    Restarted { pipeline_id: PipelineId },
    Removed { pipeline_id: PipelineId },
    Failed { pipeline_id: PipelineId, reason: String },
}

impl PipelineEvent {
    pub fn pipeline_id(&self) -> &PipelineId {
        match self {
            PipelineEvent::Loaded { pipeline_id, .. }
            | PipelineEvent::Started { pipeline_id }
            | PipelineEvent::Stopped { pipeline_id }
            | PipelineEvent::Restarted { pipeline_id }
            | PipelineEvent::Removed { pipeline_id }
            | PipelineEvent::Failed { pipeline_id, .. } => pipeline_id,
        }
    }

}
