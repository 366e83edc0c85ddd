// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Built-in [`Processor`](logflow_domain::Processor) implementations that
//! ship with the runtime. Each is registered with the default
//! [`PluginRegistry`](logflow_domain::repositories::PluginRegistry) under
//! its type-tag by [`super::registry::build_default_registry`](crate::infrastructure::registry::build_default_registry).

mod enrich;
mod filter;
mod grok;
mod json_processor;
mod mutate;
mod regex_processor;

pub use enrich::EnrichProcessor;
pub use filter::FilterProcessor;
pub use grok::GrokProcessor;
pub use json_processor::JsonProcessor;
pub use mutate::MutateProcessor;
pub use regex_processor::RegexProcessor;
