// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # LogFlow Runtime
//!
//! The concurrent runtime that drives `logflow-domain`'s plugin contracts: a
//! configurable ETL engine for log streams. A pipeline connects one or more
//! sources to a chain of processors to one or more sinks through bounded,
//! backpressured queues, batching events for delivery and exposing its
//! lifecycle and counters through an `Engine` registry.
//!
//! ## Architecture Overview
//!
//! This crate follows the same layering as `logflow-domain`, one level up:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer                          │
//! │  (BoundedQueue, ChannelEventEmitter, PipelineRuntime, Engine)│
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Infrastructure Layer                         │
//! │  (config loading, structured logging, metrics, built-in     │
//! │   source/processor/sink plugins)                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! `logflow-domain` defines what a pipeline *is* — the plugin contracts, the
//! event and batch data model, the configuration schema. This crate supplies
//! the concurrency: `tokio::spawn` per task, `BoundedQueue` for backpressure
//! and overflow policy, and the `Engine` that loads, starts, stops, and
//! reports on named pipelines.
//!
//! ## Core Concepts
//!
//! ### Pipeline
//! A named, validated [`logflow_domain::PipelineConfig`] paired with a
//! running task graph: one task per source, a processor driver (optionally
//! fanned out to several workers), a batcher, and one task per sink.
//!
//! ### Queues
//! The `ingest` queue (sources → processor driver) and `out` queue
//! (processor driver → batcher) always block a full producer. Only the
//! per-sink queue the batcher offers batches to honors the pipeline's
//! configured [`logflow_domain::OverflowPolicy`].
//!
//! ### Engine
//! The registry of loaded pipelines and the operations (`load_pipeline`,
//! `start_pipeline`, `stop_pipeline`, `restart_pipeline`, `remove_pipeline`,
//! `list_pipelines`, `get_metrics`, `shutdown`) that manage them.

pub mod application;
pub mod infrastructure;

pub use application::cancellation::CancellationToken;
pub use application::emitter::ChannelEventEmitter;
pub use application::engine::Engine;
pub use application::pipeline_runtime::PipelineRuntime;
pub use application::queue::{BoundedQueue, Offer};

pub use infrastructure::config::{load_pipeline_config, parse_pipeline_config};
pub use infrastructure::logging;
pub use infrastructure::metrics::MetricsService;
pub use infrastructure::registry::build_default_registry;
