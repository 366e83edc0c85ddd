// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Wires every built-in source, processor, and sink into a
//! [`PluginRegistry`]. Factories only construct a fresh, unopened plugin
//! instance; `open(config)` is invoked separately by the pipeline runtime
//! once the registry has handed the instance over, so a factory never
//! needs to look at the config it's passed.

use logflow_domain::repositories::PluginRegistry;
use logflow_domain::{Processor, Sink, Source};

use super::processors::{EnrichProcessor, FilterProcessor, GrokProcessor, JsonProcessor, MutateProcessor, RegexProcessor};
use super::sinks::{FileSink, StdoutSink};
use super::sources::{FileSource, StdinSource};

/// Builds the registry every [`Engine`](crate::application::engine::Engine)
/// is constructed with unless the caller supplies its own (e.g. for tests
/// that register fakes alongside the built-ins).
pub fn build_default_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();

    registry.register_source("file", |_config| Ok(Box::new(FileSource::new()) as Box<dyn Source>));
    registry.register_source("stdin", |_config| Ok(Box::new(StdinSource::new()) as Box<dyn Source>));

    registry.register_processor("json", |_config| Ok(Box::new(JsonProcessor::new()) as Box<dyn Processor>));
    registry.register_processor("filter", |_config| Ok(Box::new(FilterProcessor::new()) as Box<dyn Processor>));
    registry.register_processor("regex", |_config| Ok(Box::new(RegexProcessor::new()) as Box<dyn Processor>));
    registry.register_processor("grok", |_config| Ok(Box::new(GrokProcessor::new()) as Box<dyn Processor>));
    registry.register_processor("mutate", |_config| Ok(Box::new(MutateProcessor::new()) as Box<dyn Processor>));
    registry.register_processor("enrich", |_config| Ok(Box::new(EnrichProcessor::new()) as Box<dyn Processor>));

    registry.register_sink("stdout", |_config| Ok(Box::new(StdoutSink::new()) as Box<dyn Sink>));
    registry.register_sink("file", |_config| Ok(Box::new(FileSink::new()) as Box<dyn Sink>));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_built_in_type_tag_is_registered() {
        let registry = build_default_registry();
        assert!(registry.known_source_types().any(|t| t == "file"));
        assert!(registry.known_source_types().any(|t| t == "stdin"));
        assert!(registry.known_processor_types().any(|t| t == "json"));
        assert!(registry.known_processor_types().any(|t| t == "filter"));
        assert!(registry.known_processor_types().any(|t| t == "regex"));
        assert!(registry.known_processor_types().any(|t| t == "grok"));
        assert!(registry.known_processor_types().any(|t| t == "mutate"));
        assert!(registry.known_processor_types().any(|t| t == "enrich"));
        assert!(registry.known_sink_types().any(|t| t == "stdout"));
        assert!(registry.known_sink_types().any(|t| t == "file"));
    }
}
