// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A source produces a lazy, potentially infinite sequence of `LogEvent`s.

use std::sync::Arc;

use async_trait::async_trait;

use super::emitter::EventEmitter;
use crate::error::LogFlowError;
use crate::value_objects::PluginConfig;

/// Sources must not share mutable state across pipelines: the registry's
/// factory produces one instance per pipeline stage that uses it.
#[async_trait]
pub trait Source: Send + Sync {
    /// Validates `config` and acquires external resources. Must not start
    /// producing events yet.
    async fn open(&mut self, config: &PluginConfig) -> Result<(), LogFlowError>;

    /// Begins producing, handing every event to `emit`. Must respect
    /// backpressure: when `emit` reports the queue is full, the source
    /// follows its own configured policy (block, counted drop, or bounded
    /// internal buffering).
    async fn start(&mut self, emit: Arc<dyn EventEmitter>) -> Result<(), LogFlowError>;

    /// Ceases emission, flushes anything still deliverable, releases
    /// resources. Must return within a bounded grace period; callers that
    /// exceed it consider the source lost and force release.
    async fn stop(&mut self) -> Result<(), LogFlowError>;

    fn is_running(&self) -> bool;
    fn events_emitted(&self) -> u64;
    fn errors(&self) -> u64;
}
