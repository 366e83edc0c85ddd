// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Metrics Service
//!
//! Prometheus-based metrics collection for pipeline observability: events
//! processed/dropped, processing errors, per-sink write errors, and a gauge
//! of currently active pipelines. Every counter is labelled by pipeline
//! name, so a single registry aggregates every pipeline the `Engine` runs.
//! Exposing this registry over HTTP is out of scope; the registry itself,
//! and its use inside the runtime, is not.

use std::sync::Arc;

use prometheus::{IntCounterVec, IntGauge, Opts, Registry};

use logflow_domain::LogFlowError;

#[derive(Clone)]
pub struct MetricsService {
    registry: Arc<Registry>,
    events_processed_total: IntCounterVec,
    events_dropped_total: IntCounterVec,
    processing_errors_total: IntCounterVec,
    sink_write_errors_total: IntCounterVec,
    active_pipelines: IntGauge,
}

impl MetricsService {
    pub fn new() -> Result<Self, LogFlowError> {
        let registry = Registry::new();

        let events_processed_total = IntCounterVec::new(
            Opts::new("events_processed_total", "Events that reached at least one sink").namespace("logflow"),
            &["pipeline"],
        )
        .map_err(|e| LogFlowError::internal(format!("failed to create events_processed_total metric: {}", e)))?;

        let events_dropped_total = IntCounterVec::new(
            Opts::new("events_dropped_total", "Events dropped by backpressure or a fatal processor error")
                .namespace("logflow"),
            &["pipeline"],
        )
        .map_err(|e| LogFlowError::internal(format!("failed to create events_dropped_total metric: {}", e)))?;

        let processing_errors_total = IntCounterVec::new(
            Opts::new("processing_errors_total", "Processor errors, whether or not the event was dropped")
                .namespace("logflow"),
            &["pipeline"],
        )
        .map_err(|e| LogFlowError::internal(format!("failed to create processing_errors_total metric: {}", e)))?;

        let sink_write_errors_total = IntCounterVec::new(
            Opts::new("sink_write_errors_total", "Write failures per sink").namespace("logflow"),
            &["pipeline", "sink"],
        )
        .map_err(|e| LogFlowError::internal(format!("failed to create sink_write_errors_total metric: {}", e)))?;

        let active_pipelines = IntGauge::with_opts(
            Opts::new("active_pipelines", "Pipelines currently in the running state").namespace("logflow"),
        )
        .map_err(|e| LogFlowError::internal(format!("failed to create active_pipelines metric: {}", e)))?;

        registry
            .register(Box::new(events_processed_total.clone()))
            .map_err(|e| LogFlowError::internal(format!("failed to register events_processed_total: {}", e)))?;
        registry
            .register(Box::new(events_dropped_total.clone()))
            .map_err(|e| LogFlowError::internal(format!("failed to register events_dropped_total: {}", e)))?;
        registry
            .register(Box::new(processing_errors_total.clone()))
            .map_err(|e| LogFlowError::internal(format!("failed to register processing_errors_total: {}", e)))?;
        registry
            .register(Box::new(sink_write_errors_total.clone()))
            .map_err(|e| LogFlowError::internal(format!("failed to register sink_write_errors_total: {}", e)))?;
        registry
            .register(Box::new(active_pipelines.clone()))
            .map_err(|e| LogFlowError::internal(format!("failed to register active_pipelines: {}", e)))?;

        Ok(Self {
            registry: Arc::new(registry),
            events_processed_total,
            events_dropped_total,
            processing_errors_total,
            sink_write_errors_total,
            active_pipelines,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_events_processed(&self, pipeline: &str, count: u64) {
        self.events_processed_total.with_label_values(&[pipeline]).inc_by(count);
    }

    pub fn record_events_dropped(&self, pipeline: &str, count: u64) {
        self.events_dropped_total.with_label_values(&[pipeline]).inc_by(count);
    }

    pub fn record_processing_error(&self, pipeline: &str) {
        self.processing_errors_total.with_label_values(&[pipeline]).inc();
    }

    pub fn record_sink_write_error(&self, pipeline: &str, sink: &str) {
        self.sink_write_errors_total.with_label_values(&[pipeline, sink]).inc();
    }

    pub fn pipeline_started(&self) {
        self.active_pipelines.inc();
    }

    pub fn pipeline_stopped(&self) {
        self.active_pipelines.dec();
    }

    pub fn active_pipeline_count(&self) -> i64 {
        self.active_pipelines.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_labelled_per_pipeline() {
        let metrics = MetricsService::new().unwrap();
        metrics.record_events_processed("alpha", 3);
        metrics.record_events_processed("beta", 1);

        let families = metrics.registry().gather();
        let processed = families.iter().find(|f| f.get_name() == "logflow_events_processed_total").unwrap();
        assert_eq!(processed.get_metric().len(), 2);
    }

    #[test]
    fn active_pipelines_tracks_start_and_stop() {
        let metrics = MetricsService::new().unwrap();
        metrics.pipeline_started();
        metrics.pipeline_started();
        metrics.pipeline_stopped();
        assert_eq!(metrics.active_pipeline_count(), 1);
    }
}
