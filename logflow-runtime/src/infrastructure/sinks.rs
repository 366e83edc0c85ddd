// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Built-in [`Sink`](logflow_domain::Sink) implementations.

mod file_sink;
mod stdout_sink;

pub use file_sink::FileSink;
pub use stdout_sink::StdoutSink;
