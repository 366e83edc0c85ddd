// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LogFlow Domain
//!
//! The domain layer of LogFlow: the `LogEvent`/`Batch` data model, the
//! `Source`/`Processor`/`Sink` plugin contracts, the `PipelineConfig`
//! aggregate, and the domain error type. Nothing here depends on `tokio`,
//! `tracing`, or any form of I/O — the concurrent runtime that drives these
//! contracts lives one layer up, in `logflow-runtime`.
//!
//! ## Module Structure
//!
//! ### Value Objects
//! Immutable, self-validating types with no identity of their own:
//! `EventId`/`PipelineId` (ULID-backed), `LogEvent`, `Batch`, `FieldValue`,
//! and the small tuning knobs (`BatchSize`, `BatchTimeout`, `QueueCapacity`,
//! `WorkerCount`, `OverflowPolicy`).
//!
//! ### Entities
//! Mutable, identity-bearing records owned by a running pipeline:
//! `PipelineState` (the lifecycle state machine) and `PipelineMetrics`.
//!
//! ### Aggregates
//! `PipelineConfig`, the declarative record an `Engine` loads and validates.
//!
//! ### Services
//! The plugin capability contracts: `Source`, `Processor`, `Sink`, and the
//! `EventEmitter` seam a source hands events through.
//!
//! ### Repositories
//! `PluginRegistry`, the type-tag → factory table.
//!
//! ### Events
//! `PipelineEvent`, raised on every lifecycle transition.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use aggregates::PipelineConfig;
pub use entities::{PipelineMetrics, PipelineMetricsSnapshot, PipelineState};
pub use error::LogFlowError;
pub use events::PipelineEvent;
pub use repositories::{PluginRegistry, ProcessorFactory, SinkFactory, SourceFactory};
pub use services::{EmitOutcome, EventEmitter, Processor, Sink, Source};
pub use value_objects::{
    Batch, BatchSize, BatchTimeout, EventId, FieldValue, LogEvent, OverflowPolicy, PipelineId, PluginConfig,
    QueueCapacity, WorkerCount,
};
