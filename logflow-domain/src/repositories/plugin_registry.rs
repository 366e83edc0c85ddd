// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Maps a plugin's type-tag (`"file"`, `"kafka"`, `"filter"`,
//! `"elasticsearch"`, ...) to the factory function that builds a configured
//! instance from a [`PluginConfig`].
//!
//! Plugin polymorphism is deliberately a static table of function pointers
//! rather than a trait-object-returning-trait-object indirection: the set of
//! built-in plugins is closed at compile time, and a flat `HashMap` lookup
//! is the simplest thing that satisfies "discovered by a short type-tag".
//! The table itself is built once, at process init, and never mutated after
//! that — it is safe to share across every pipeline the `Engine` runs.

use std::collections::HashMap;

use crate::error::LogFlowError;
use crate::services::{Processor, Sink, Source};
use crate::value_objects::PluginConfig;

pub type SourceFactory = fn(&PluginConfig) -> Result<Box<dyn Source>, LogFlowError>;
pub type ProcessorFactory = fn(&PluginConfig) -> Result<Box<dyn Processor>, LogFlowError>;
pub type SinkFactory = fn(&PluginConfig) -> Result<Box<dyn Sink>, LogFlowError>;

#[derive(Default)]
pub struct PluginRegistry {
    sources: HashMap<String, SourceFactory>,
    processors: HashMap<String, ProcessorFactory>,
    sinks: HashMap<String, SinkFactory>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_source(&mut self, type_tag: impl Into<String>, factory: SourceFactory) {
        self.sources.insert(type_tag.into(), factory);
    }

    pub fn register_processor(&mut self, type_tag: impl Into<String>, factory: ProcessorFactory) {
        self.processors.insert(type_tag.into(), factory);
    }

    pub fn register_sink(&mut self, type_tag: impl Into<String>, factory: SinkFactory) {
        self.sinks.insert(type_tag.into(), factory);
    }

    pub fn build_source(&self, config: &PluginConfig) -> Result<Box<dyn Source>, LogFlowError> {
        let factory = self
            .sources
            .get(config.type_tag.as_str())
            .ok_or_else(|| LogFlowError::UnknownPluginType(config.type_tag.clone()))?;
        factory(config)
    }

    pub fn build_processor(&self, config: &PluginConfig) -> Result<Box<dyn Processor>, LogFlowError> {
        let factory = self
            .processors
            .get(config.type_tag.as_str())
            .ok_or_else(|| LogFlowError::UnknownPluginType(config.type_tag.clone()))?;
        factory(config)
    }

    pub fn build_sink(&self, config: &PluginConfig) -> Result<Box<dyn Sink>, LogFlowError> {
        let factory = self
            .sinks
            .get(config.type_tag.as_str())
            .ok_or_else(|| LogFlowError::UnknownPluginType(config.type_tag.clone()))?;
        factory(config)
    }

    pub fn known_source_types(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn known_processor_types(&self) -> impl Iterator<Item = &str> {
        self.processors.keys().map(String::as_str)
    }

    pub fn known_sink_types(&self) -> impl Iterator<Item = &str> {
        self.sinks.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fail_processor(_config: &PluginConfig) -> Result<Box<dyn Processor>, LogFlowError> {
        Err(LogFlowError::invalid_config("not real"))
    }

    #[test]
    fn unknown_type_tag_is_rejected() {
        let registry = PluginRegistry::new();
        let config = PluginConfig::new("nonexistent", serde_json::json!({}));
        assert!(matches!(registry.build_processor(&config), Err(LogFlowError::UnknownPluginType(_))));
    }

    #[test]
    fn registered_factory_is_dispatched_by_tag() {
        let mut registry = PluginRegistry::new();
        registry.register_processor("broken", fail_processor);
        let config = PluginConfig::new("broken", serde_json::json!({}));
        assert!(registry.build_processor(&config).is_err());
    }
}
