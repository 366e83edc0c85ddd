// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Process-wide, immutable collaborators looked up by type-tag.

mod plugin_registry;

pub use plugin_registry::{ProcessorFactory, PluginRegistry, SinkFactory, SourceFactory};
