// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A sink consumes batches, delivering them atomically from its own
//! perspective (best effort; see the error taxonomy for how partial
//! failures are surfaced).

use async_trait::async_trait;

use crate::error::LogFlowError;
use crate::value_objects::{Batch, PluginConfig};

#[async_trait]
pub trait Sink: Send + Sync {
    /// Connects and validates the target.
    async fn open(&mut self, config: &PluginConfig) -> Result<(), LogFlowError>;

    /// A batch may be shared read-only with other sinks; implementations
    /// must not mutate it. Callers distinguish retryable from fatal
    /// failures by the returned error's variant
    /// (`LogFlowError::SinkRetryable` vs `LogFlowError::SinkFatal`).
    async fn write(&mut self, batch: Batch) -> Result<(), LogFlowError>;

    /// Blocks until all in-flight writes are durable or have failed.
    async fn flush(&mut self) -> Result<(), LogFlowError>;

    /// Flushes, then releases resources.
    async fn close(&mut self) -> Result<(), LogFlowError>;
}
