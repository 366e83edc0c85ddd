// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line interface parsing using clap.
//!
//! This module defines the CLI structure and handles argument parsing.
//! Security validation happens in the `validator` module after parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser, Debug, Clone)]
#[command(name = "logflow")]
#[command(about = concat!("LogFlow — a configurable ETL engine for log streams, v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load a pipeline configuration and run it until shutdown
    ///
    /// Blocks until a SIGTERM, SIGINT, or SIGHUP is received (or, on
    /// Windows, Ctrl+C), then drains the pipeline gracefully before exiting.
    Run {
        /// Pipeline configuration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Override the configuration's `worker_count`
        #[arg(long)]
        worker_threads: Option<usize>,
    },

    /// Load and validate a pipeline configuration without running it
    ///
    /// Exits `0` if the configuration is well-formed and passes
    /// `PipelineConfig::validate()`; otherwise reports the failure and
    /// exits with a non-zero, `sysexits.h`-style code.
    Validate {
        /// Pipeline configuration file (YAML or JSON)
        config: PathBuf,
    },
}

/// Parse CLI arguments
///
/// # Panics
///
/// Clap exits the process with a usage message if parsing fails.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::parse_from(["logflow", "run", "--config", "pipeline.yaml"]);
        match cli.command {
            Commands::Run { config, worker_threads } => {
                assert_eq!(config, PathBuf::from("pipeline.yaml"));
                assert_eq!(worker_threads, None);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn test_parse_validate_command() {
        let cli = Cli::parse_from(["logflow", "validate", "pipeline.yaml"]);
        match cli.command {
            Commands::Validate { config } => assert_eq!(config, PathBuf::from("pipeline.yaml")),
            _ => panic!("expected Validate command"),
        }
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::parse_from(["logflow", "--verbose", "validate", "pipeline.yaml"]);
        assert!(cli.verbose);
    }
}
