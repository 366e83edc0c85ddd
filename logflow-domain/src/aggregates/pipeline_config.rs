// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The declarative pipeline record named in the external configuration
//! schema: a name, its plugin records, and its tuning knobs.

use serde::{Deserialize, Serialize};

use crate::error::LogFlowError;
use crate::value_objects::{BatchSize, BatchTimeout, OverflowPolicy, PluginConfig, WorkerCount};

/// Validated at `load_pipeline` time: `name` non-empty, at least one source,
/// at least one sink, and every plugin record naming a type the registry
/// will be asked to resolve (resolution itself happens later, in
/// `logflow-runtime`, since this crate has no registry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub sources: Vec<PluginConfig>,
    #[serde(default)]
    pub processors: Vec<PluginConfig>,
    pub sinks: Vec<PluginConfig>,
    #[serde(default = "BatchSize::default")]
    pub batch_size: BatchSize,
    #[serde(default = "BatchTimeout::default")]
    pub batch_timeout: BatchTimeout,
    #[serde(default)]
    pub overflow_policy: OverflowPolicy,
    /// Fans the processor driver out to `W` workers (default 1, meaning a
    /// single-flow driver with no fan-out). Not part of the external schema
    /// table verbatim, but an explicit extension of it: per-worker ordering
    /// is preserved, cross-worker ordering is not (see the runtime's
    /// concurrency model).
    #[serde(default = "WorkerCount::default")]
    pub worker_count: WorkerCount,
}

impl PipelineConfig {
    pub fn new(name: impl Into<String>, sources: Vec<PluginConfig>, sinks: Vec<PluginConfig>) -> Self {
        Self {
            name: name.into(),
            sources,
            processors: Vec::new(),
            sinks,
            batch_size: BatchSize::default(),
            batch_timeout: BatchTimeout::default(),
            overflow_policy: OverflowPolicy::default(),
            worker_count: WorkerCount::default(),
        }
    }

    /// Enforces the external-interface schema's structural rules: a
    /// non-empty pipeline name, at least one source, at least one sink.
    /// Unknown plugin `type`s are a load-time failure too, but that check
    /// needs the registry and happens where the registry lives.
    pub fn validate(&self) -> Result<(), LogFlowError> {
        if self.name.trim().is_empty() {
            return Err(LogFlowError::invalid_config("pipeline name must not be empty"));
        }
        if self.sources.is_empty() {
            return Err(LogFlowError::invalid_config(format!("pipeline '{}' needs at least one source", self.name)));
        }
        if self.sinks.is_empty() {
            return Err(LogFlowError::invalid_config(format!("pipeline '{}' needs at least one sink", self.name)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plugin(type_tag: &str) -> PluginConfig {
        PluginConfig::new(type_tag, json!({}))
    }

    #[test]
    fn rejects_empty_name() {
        let config = PipelineConfig::new("", vec![plugin("file")], vec![plugin("stdout")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn requires_at_least_one_source_and_sink() {
        assert!(PipelineConfig::new("p", vec![], vec![plugin("stdout")]).validate().is_err());
        assert!(PipelineConfig::new("p", vec![plugin("file")], vec![]).validate().is_err());
    }

    #[test]
    fn accepts_a_minimal_valid_config() {
        let config = PipelineConfig::new("p", vec![plugin("file")], vec![plugin("stdout")]);
        assert!(config.validate().is_ok());
    }
}
