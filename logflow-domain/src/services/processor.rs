// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A processor is a pure-ish transformation from one event to zero, one, or
//! many events.

use crate::error::LogFlowError;
use crate::value_objects::{LogEvent, PluginConfig};

/// `process` is synchronous: processors are expected to be CPU-bound and
/// non-suspending (the one built-in exception, `enrich/dns`, documents its
/// suspension explicitly rather than hiding it behind this trait).
///
/// `open` compiles inner state (regex patterns, grok templates, lookup
/// tables, filter expressions); a config that fails to compile is rejected
/// here, before the pipeline starts. A processor that is stateful keeps that
/// state per-instance, never global.
pub trait Processor: Send + Sync {
    fn open(&mut self, config: &PluginConfig) -> Result<(), LogFlowError>;

    /// Returns the events this call produces: the same event (possibly
    /// mutated), a transformed event, a split into several events, or an
    /// empty list to drop. An `Err` is surfaced to the caller, which honors
    /// the `ignore_errors` config knob (default: surface).
    fn process(&self, event: LogEvent) -> Result<Vec<LogEvent>, LogFlowError>;

    fn close(&mut self) -> Result<(), LogFlowError>;
}
