// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Standardized Unix exit codes following BSD `sysexits.h` conventions.
//!
//! ## Exit Code Conventions
//!
//! - **0**: Success
//! - **1**: General error
//! - **64-78**: Specific error conditions (BSD sysexits.h)
//! - **130/143**: Interrupted/terminated by signal
//!
//! ## Usage
//!
//! ```rust,no_run
//! use logflow_bootstrap::exit_code::{result_to_exit_code, ExitCode};
//!
//! fn run_application() -> Result<(), logflow_domain::LogFlowError> {
//!     Ok(())
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     result_to_exit_code(run_application())
//! }
//! ```

use logflow_domain::LogFlowError;
use std::fmt;

/// Exit codes following Unix conventions (BSD sysexits.h)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination (0)
    #[default]
    Success = 0,

    /// General error (1)
    Error = 1,

    /// Command line usage error (64)
    UsageError = 64,

    /// Data format error (65) — malformed pipeline configuration
    DataError = 65,

    /// Cannot open input (66) — config file not found or unreadable
    NoInput = 66,

    /// User does not exist (67)
    NoUser = 67,

    /// Host name unknown (68)
    NoHost = 68,

    /// Service unavailable (69) — a sink or source could not be opened
    Unavailable = 69,

    /// Internal software error (70) — an unrecoverable pipeline panic
    Software = 70,

    /// System error (71)
    OsError = 71,

    /// Critical OS file missing (72)
    OsFile = 72,

    /// Cannot create output file (73)
    CantCreate = 73,

    /// I/O error (74)
    IoError = 74,

    /// Temporary failure, retry (75)
    TempFail = 75,

    /// Remote error in protocol (76)
    Protocol = 76,

    /// Permission denied (77)
    NoPerm = 77,

    /// Configuration error (78) — `PipelineConfig::validate()` rejected the config
    Config = 78,

    /// Interrupted by signal (SIGINT - Ctrl+C) (130)
    Interrupted = 130,

    /// Terminated by signal (SIGTERM) (143)
    Terminated = 143,
}

impl ExitCode {
    /// Convert to i32 for use with `std::process::exit`
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a `LogFlowError` to the exit code that best describes its cause.
    pub fn from_logflow_error(error: &LogFlowError) -> Self {
        match error {
            LogFlowError::InvalidConfiguration(_) | LogFlowError::UnknownPluginType(_) => ExitCode::Config,
            LogFlowError::PipelineNotFound(_) => ExitCode::NoInput,
            LogFlowError::PipelineAlreadyExists(_) => ExitCode::UsageError,
            LogFlowError::OpenError(_) | LogFlowError::SinkFatal(_) => ExitCode::Unavailable,
            LogFlowError::TransientSourceError(_) | LogFlowError::SinkRetryable(_) | LogFlowError::TimeoutError(_) => ExitCode::TempFail,
            LogFlowError::ProcessorError(_) => ExitCode::Software,
            LogFlowError::InternalPanic(_) => ExitCode::Software,
            LogFlowError::IoError(_) => ExitCode::IoError,
            LogFlowError::SerializationError(_) => ExitCode::DataError,
            LogFlowError::Cancelled(_) => ExitCode::Terminated,
            LogFlowError::MetricsError(_) => ExitCode::Error,
            LogFlowError::InternalError(_) => ExitCode::Software,
        }
    }

    /// Best-effort mapping for errors that aren't a `LogFlowError` — e.g. a
    /// `clap`/`SecureArgParser` failure during CLI validation.
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        let error_string = error.to_string().to_lowercase();

        if error_string.contains("permission") || error_string.contains("access denied") {
            ExitCode::NoPerm
        } else if error_string.contains("not found") || error_string.contains("no such") {
            ExitCode::NoInput
        } else if error_string.contains("invalid") || error_string.contains("argument") {
            ExitCode::UsageError
        } else if error_string.contains("parse") || error_string.contains("format") {
            ExitCode::DataError
        } else if error_string.contains("io") || error_string.contains("read") || error_string.contains("write") {
            ExitCode::IoError
        } else if error_string.contains("config") {
            ExitCode::Config
        } else if error_string.contains("unavailable") || error_string.contains("not available") {
            ExitCode::Unavailable
        } else {
            ExitCode::Error
        }
    }

    /// Human-readable description of the exit code
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NoInput => "Cannot open input",
            ExitCode::NoUser => "User does not exist",
            ExitCode::NoHost => "Host name unknown",
            ExitCode::Unavailable => "Service unavailable",
            ExitCode::Software => "Internal software error",
            ExitCode::OsError => "System error",
            ExitCode::OsFile => "Critical OS file missing",
            ExitCode::CantCreate => "Cannot create output file",
            ExitCode::IoError => "I/O error",
            ExitCode::TempFail => "Temporary failure, retry",
            ExitCode::Protocol => "Remote error in protocol",
            ExitCode::NoPerm => "Permission denied",
            ExitCode::Config => "Configuration error",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
            ExitCode::Terminated => "Terminated by signal (SIGTERM)",
        }
    }

    /// Check if this is a success exit code
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Check if this is an error exit code
    pub fn is_error(self) -> bool {
        !self.is_success()
    }

    /// Check if this represents a signal interruption
    pub fn is_signal(self) -> bool {
        matches!(self, ExitCode::Interrupted | ExitCode::Terminated)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

/// Map a `LogFlowError` to the process exit code it should produce.
pub fn map_error_to_exit_code(error: &LogFlowError) -> ExitCode {
    ExitCode::from_logflow_error(error)
}

/// Convert a top-level `Result` into a `std::process::ExitCode`, logging the
/// error (if any) before mapping it.
pub fn result_to_exit_code(result: Result<(), LogFlowError>) -> std::process::ExitCode {
    match result {
        Ok(()) => ExitCode::Success.into(),
        Err(err) => {
            tracing::error!(error = %err, "logflow exiting with error");
            map_error_to_exit_code(&err).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Error.as_i32(), 1);
        assert_eq!(ExitCode::UsageError.as_i32(), 64);
        assert_eq!(ExitCode::Config.as_i32(), 78);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
        assert_eq!(ExitCode::Terminated.as_i32(), 143);
    }

    #[test]
    fn test_is_success() {
        assert!(ExitCode::Success.is_success());
        assert!(!ExitCode::Error.is_success());
    }

    #[test]
    fn test_is_signal() {
        assert!(ExitCode::Interrupted.is_signal());
        assert!(ExitCode::Terminated.is_signal());
        assert!(!ExitCode::Success.is_signal());
    }

    #[test]
    fn test_default() {
        assert_eq!(ExitCode::default(), ExitCode::Success);
    }

    #[test]
    fn test_display() {
        let display = format!("{}", ExitCode::UsageError);
        assert!(display.contains("Command line usage error"));
        assert!(display.contains("64"));
    }

    #[test]
    fn test_from_logflow_error_config() {
        let err = LogFlowError::invalid_config("missing sources");
        assert_eq!(ExitCode::from_logflow_error(&err), ExitCode::Config);
    }

    #[test]
    fn test_from_logflow_error_pipeline_not_found() {
        let err = LogFlowError::PipelineNotFound("p".to_string());
        assert_eq!(ExitCode::from_logflow_error(&err), ExitCode::NoInput);
    }

    #[test]
    fn test_result_to_exit_code_success() {
        let code: i32 = result_to_exit_code(Ok(())).into();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_result_to_exit_code_failure() {
        let code: i32 = result_to_exit_code(Err(LogFlowError::invalid_config("bad"))).into();
        assert_eq!(code, 78);
    }
}
