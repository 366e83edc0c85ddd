// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Logging
//!
//! Structured logging for the pipeline runtime, built on `tracing`. Every
//! pipeline task logs with a `pipeline` field so a single process running
//! many pipelines can be filtered per instance; lifecycle transitions,
//! dropped events, and plugin errors all go through here rather than
//! `eprintln!`.

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. Call once, from the
/// composition root. `RUST_LOG` controls verbosity; defaults to `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_does_not_panic_when_called_once() {
        // tracing_subscriber::fmt().init() panics on a second global install
        // within the same process, so this just exercises construction.
        let _ = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    }
}
