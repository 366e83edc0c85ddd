// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Metrics Module
//!
//! Part of the Infrastructure layer: Prometheus-backed observability for
//! the pipeline runtime.

pub mod service;

pub use service::MetricsService;
