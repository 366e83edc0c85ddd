// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Infrastructure layer: everything that talks to the outside world on
//! behalf of the domain — config file loading, structured logging, metrics
//! collection, and the built-in source/processor/sink plugins.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod processors;
pub mod registry;
pub mod sinks;
pub mod sources;
