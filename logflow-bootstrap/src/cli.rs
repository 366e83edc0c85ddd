// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface Module
//!
//! Bootstrap-layer CLI handling with security-first design.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  1. parser::parse_cli()             │  Parse CLI with clap
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  2. validate_cli()                  │  Security validation
//! └─────────────────┬───────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────┐
//! │  3. ValidatedCli                    │  Safe, validated config
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `parser` - CLI structure and clap parsing
//! - `validator` - Security validation layer

pub mod parser;
pub mod validator;

pub use parser::{parse_cli, Cli, Commands};
pub use validator::{ParseError, SecureArgParser};

use std::path::PathBuf;

/// Validated CLI configuration
///
/// Holds CLI arguments after security validation: the config path has been
/// canonicalized and the worker-thread override, if any, is range-checked
/// against `logflow_domain::WorkerCount`'s bounds.
#[derive(Debug, Clone)]
pub struct ValidatedCli {
    pub command: ValidatedCommand,
    pub verbose: bool,
}

/// Validated command variants
#[derive(Debug, Clone)]
pub enum ValidatedCommand {
    Run {
        config: PathBuf,
        worker_threads: Option<usize>,
    },
    Validate {
        config: PathBuf,
    },
}

/// Parse and validate CLI arguments
///
/// 1. Parse CLI with clap
/// 2. Validate the config path with `SecureArgParser`
/// 3. Range-check `worker_threads`
///
/// # Errors
///
/// Returns `ParseError` if any validation fails.
pub fn parse_and_validate() -> Result<ValidatedCli, ParseError> {
    let cli = parse_cli();
    validate_cli(cli)
}

/// Validate parsed CLI arguments
fn validate_cli(cli: Cli) -> Result<ValidatedCli, ParseError> {
    let command = match cli.command {
        Commands::Run { config, worker_threads } => {
            let validated_config = SecureArgParser::validate_path(&config.to_string_lossy())?;

            if let Some(threads) = worker_threads {
                if threads == 0 || threads > 64 {
                    return Err(ParseError::InvalidValue {
                        arg: "worker-threads".to_string(),
                        reason: "must be between 1 and 64".to_string(),
                    });
                }
            }

            ValidatedCommand::Run {
                config: validated_config,
                worker_threads,
            }
        }
        Commands::Validate { config } => {
            let validated_config = SecureArgParser::validate_path(&config.to_string_lossy())?;
            ValidatedCommand::Validate { config: validated_config }
        }
    };

    Ok(ValidatedCli {
        command,
        verbose: cli.verbose,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_a_worker_thread_override_of_zero() {
        let cli = Cli {
            command: Commands::Run {
                config: PathBuf::from("Cargo.toml"),
                worker_threads: Some(0),
            },
            verbose: false,
        };
        assert!(matches!(validate_cli(cli), Err(ParseError::InvalidValue { .. })));
    }

    #[test]
    fn rejects_a_worker_thread_override_above_sixty_four() {
        let cli = Cli {
            command: Commands::Run {
                config: PathBuf::from("Cargo.toml"),
                worker_threads: Some(65),
            },
            verbose: false,
        };
        assert!(matches!(validate_cli(cli), Err(ParseError::InvalidValue { .. })));
    }

    #[test]
    fn rejects_a_dangerous_config_path() {
        let cli = Cli {
            command: Commands::Validate {
                config: PathBuf::from("../../etc/passwd"),
            },
            verbose: false,
        };
        assert!(validate_cli(cli).is_err());
    }
}
