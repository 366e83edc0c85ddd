// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Per-pipeline counters exposed to the Engine's `get_metrics` operation.
//!
//! Counters are monotonically non-decreasing while a pipeline runs, and are
//! reset to zero on restart (constructing a fresh `PipelineMetrics` is how
//! `restart_pipeline` achieves that).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::pipeline_state::PipelineState;

#[derive(Debug)]
pub struct PipelineMetrics {
    events_processed: AtomicU64,
    events_dropped: AtomicU64,
    processing_errors: AtomicU64,
    #[allow(dead_code)]
    started_at: DateTime<Utc>,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            events_processed: AtomicU64::new(0),
            events_dropped: AtomicU64::new(0),
            processing_errors: AtomicU64::new(0),
            started_at: Utc::now(),
        }
    }

    pub fn record_processed(&self, count: u64) {
        self.events_processed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, count: u64) {
        self.events_dropped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.processing_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed.load(Ordering::Relaxed)
    }

    pub fn events_dropped(&self) -> u64 {
        self.events_dropped.load(Ordering::Relaxed)
    }

    pub fn processing_errors(&self) -> u64 {
        self.processing_errors.load(Ordering::Relaxed)
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }

    /// Renders a point-in-time snapshot suitable for `get_metrics`.
    pub fn snapshot(
        &self,
        state: PipelineState,
        source_count: usize,
        processor_count: usize,
        sink_count: usize,
        sink_write_errors: HashMap<String, u64>,
        failure_reason: Option<String>,
    ) -> PipelineMetricsSnapshot {
        PipelineMetricsSnapshot {
            events_processed: self.events_processed(),
            events_dropped: self.events_dropped(),
            processing_errors: self.processing_errors(),
            uptime_seconds: self.uptime_seconds(),
            running: state == PipelineState::Running,
            state,
            sources: source_count,
            processors: processor_count,
            sinks: sink_count,
            sink_write_errors,
            failure_reason,
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// An owned, serializable snapshot — what actually crosses the Engine API
/// boundary, since `PipelineMetrics` itself holds non-`Clone` atomics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetricsSnapshot {
    pub events_processed: u64,
    pub events_dropped: u64,
    pub processing_errors: u64,
    pub uptime_seconds: i64,
    pub running: bool,
    pub state: PipelineState,
    pub sources: usize,
    pub processors: usize,
    pub sinks: usize,
    pub sink_write_errors: HashMap<String, u64>,
    pub failure_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = PipelineMetrics::new();
        metrics.record_processed(3);
        metrics.record_processed(2);
        metrics.record_dropped(1);
        metrics.record_error();

        assert_eq!(metrics.events_processed(), 5);
        assert_eq!(metrics.events_dropped(), 1);
        assert_eq!(metrics.processing_errors(), 1);
    }

    #[test]
    fn snapshot_reports_running_only_in_running_state() {
        let metrics = PipelineMetrics::new();
        let snap = metrics.snapshot(PipelineState::Running, 1, 0, 1, HashMap::new(), None);
        assert!(snap.running);

        let snap = metrics.snapshot(PipelineState::Failed, 1, 0, 1, HashMap::new(), Some("boom".into()));
        assert!(!snap.running);
        assert_eq!(snap.failure_reason.as_deref(), Some("boom"));
    }
}
