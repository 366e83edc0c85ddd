// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Bootstrap Module
//!
//! The bootstrap module sits **outside** the enterprise application layers
//! (`logflow-domain`, `logflow-runtime`) and provides:
//!
//! - **Entry point** - CLI-driven application lifecycle
//! - **Platform abstraction** - OS-specific operations (POSIX vs Windows)
//! - **Signal handling** - Graceful shutdown (SIGTERM, SIGINT, SIGHUP)
//! - **Argument parsing** - Secure CLI argument validation
//! - **Error handling** - `LogFlowError` → Unix exit code mapping
//! - **Async coordination** - Shutdown coordination and cancellation
//!
//! ## Architecture Position
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          BOOTSTRAP (This Module)            │
//! │  - CLI parsing and security validation      │
//! │  - Platform abstraction                     │
//! │  - Signal handling                          │
//! │  - Composition root (main.rs)               │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │              logflow-runtime                │
//! │  - Engine, PipelineRuntime, BoundedQueue     │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │              logflow-domain                  │
//! │  - Plugin contracts, PipelineConfig          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Separation from the enterprise layers** — bootstrap can see
//!    `logflow-runtime` and `logflow-domain`; neither sees bootstrap.
//! 2. **Platform abstraction** behind a trait, compile-time selected.
//! 3. **Graceful shutdown** via a shared cancellation token, grace period,
//!    and signal handlers for SIGTERM/SIGINT/SIGHUP.
//! 4. **Security first** — path validation, dangerous-pattern detection,
//!    protected-directory checks on every user-supplied path.
//!
//! ## Module Structure
//!
//! - `platform` - OS abstraction (Unix/Windows)
//! - `signals` - Signal handling (SIGTERM, SIGINT, SIGHUP)
//! - `cli` - Secure argument parsing
//! - `config` - Application configuration
//! - `exit_code` - Unix exit code enumeration
//! - `logger` - Bootstrap-specific logging
//! - `shutdown` - Shutdown coordination

pub mod cli;
pub mod config;
pub mod exit_code;
pub mod logger;
pub mod platform;
pub mod shutdown;
pub mod signals;

pub use cli::{parse_and_validate, ValidatedCli, ValidatedCommand};
pub use exit_code::{map_error_to_exit_code, result_to_exit_code, ExitCode};

/// Bootstrap and parse CLI arguments
///
/// The main entry point for the bootstrap layer: parses with clap, applies
/// `SecureArgParser` validation, and returns a `ValidatedCli`. The caller is
/// responsible for dispatching on `ValidatedCli::command` and mapping the
/// result to an exit code with `result_to_exit_code`.
///
/// # Errors
///
/// Returns `cli::ParseError` if CLI parsing or validation fails. Clap
/// handles `--help`/`--version` itself and exits the process.
pub fn bootstrap_cli() -> Result<ValidatedCli, cli::ParseError> {
    cli::parse_and_validate()
}
