// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

use thiserror::Error;

/// Domain-specific errors for the LogFlow pipeline system.
///
/// Each variant corresponds to one row of the error taxonomy: configuration
/// failures abort `load_pipeline`, open failures abort `start_pipeline`,
/// per-event/per-batch failures are counted without stopping the pipeline,
/// and `InternalPanic` marks a pipeline `failed` without touching its
/// siblings.
#[derive(Error, Debug, Clone)]
pub enum LogFlowError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown plugin type: {0}")]
    UnknownPluginType(String),

    #[error("failed to open resource: {0}")]
    OpenError(String),

    #[error("transient source error: {0}")]
    TransientSourceError(String),

    #[error("processor error: {0}")]
    ProcessorError(String),

    #[error("sink write failed, retryable: {0}")]
    SinkRetryable(String),

    #[error("sink write failed, fatal: {0}")]
    SinkFatal(String),

    #[error("internal panic: {0}")]
    InternalPanic(String),

    #[error("io error: {0}")]
    IoError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("timeout: {0}")]
    TimeoutError(String),

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("pipeline not found: {0}")]
    PipelineNotFound(String),

    #[error("pipeline already exists: {0}")]
    PipelineAlreadyExists(String),

    #[error("metrics error: {0}")]
    MetricsError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl LogFlowError {
    /// Creates a new configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates a new processor error.
    pub fn processor_failed(msg: impl Into<String>) -> Self {
        Self::ProcessorError(msg.into())
    }

    /// Creates a new open error.
    pub fn open_failed(msg: impl Into<String>) -> Self {
        Self::OpenError(msg.into())
    }

    /// Creates a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Whether the error indicates a transient condition a caller may retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LogFlowError::SinkRetryable(_)
                | LogFlowError::TransientSourceError(_)
                | LogFlowError::TimeoutError(_)
                | LogFlowError::IoError(_)
        )
    }

    /// Whether this error should mark the owning pipeline `Failed`.
    pub fn is_fatal_to_pipeline(&self) -> bool {
        matches!(
            self,
            LogFlowError::OpenError(_) | LogFlowError::SinkFatal(_) | LogFlowError::InternalPanic(_)
        )
    }

    /// Coarse category, used for metrics labelling and log fields.
    pub fn category(&self) -> &'static str {
        match self {
            LogFlowError::InvalidConfiguration(_) => "configuration",
            LogFlowError::UnknownPluginType(_) => "configuration",
            LogFlowError::OpenError(_) => "open",
            LogFlowError::TransientSourceError(_) => "source",
            LogFlowError::ProcessorError(_) => "processor",
            LogFlowError::SinkRetryable(_) => "sink",
            LogFlowError::SinkFatal(_) => "sink",
            LogFlowError::InternalPanic(_) => "panic",
            LogFlowError::IoError(_) => "io",
            LogFlowError::SerializationError(_) => "serialization",
            LogFlowError::TimeoutError(_) => "timeout",
            LogFlowError::Cancelled(_) => "cancellation",
            LogFlowError::PipelineNotFound(_) => "pipeline",
            LogFlowError::PipelineAlreadyExists(_) => "pipeline",
            LogFlowError::MetricsError(_) => "metrics",
            LogFlowError::InternalError(_) => "internal",
        }
    }
}

impl From<std::io::Error> for LogFlowError {
    fn from(err: std::io::Error) -> Self {
        LogFlowError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for LogFlowError {
    fn from(err: serde_json::Error) -> Self {
        LogFlowError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_errors_are_flagged() {
        assert!(LogFlowError::SinkRetryable("timeout".into()).is_recoverable());
        assert!(!LogFlowError::SinkFatal("auth".into()).is_recoverable());
    }

    #[test]
    fn fatal_errors_mark_pipeline_failed() {
        assert!(LogFlowError::OpenError("no such file".into()).is_fatal_to_pipeline());
        assert!(!LogFlowError::ProcessorError("bad event".into()).is_fatal_to_pipeline());
    }

    #[test]
    fn category_is_stable() {
        assert_eq!(LogFlowError::UnknownPluginType("kafkaaa".into()).category(), "configuration");
    }
}
