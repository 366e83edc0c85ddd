// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `emit` callback a [`Source`](super::Source) uses to hand events to
//! the ingest queue. Kept as a trait, rather than a bare channel `Sender`,
//! so the domain layer never depends on `tokio`; `logflow-runtime` supplies
//! the concrete bounded-channel implementation.

use async_trait::async_trait;

use crate::value_objects::LogEvent;

/// Result of one `emit` call, telling the source whether the ingest queue
/// had room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// The event was handed off to the ingest queue.
    Accepted,
    /// The ingest queue was full; the source's configured policy (block,
    /// drop, or internal buffering) decides what happens next.
    QueueFull,
}

#[async_trait]
pub trait EventEmitter: Send + Sync {
    async fn emit(&self, event: LogEvent) -> EmitOutcome;
}
