// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Configuration Loading
//!
//! Deserializes a pipeline file (YAML or JSON, chosen by extension) directly
//! into [`PipelineConfig`]. This loader is deliberately thin: it is the
//! contract boundary between a file on disk and the aggregate, not a
//! schema-validation subsystem — structural validation lives in
//! [`PipelineConfig::validate`].

use std::path::Path;

use logflow_domain::{LogFlowError, PipelineConfig};

/// Loads and parses, but does not validate, a pipeline config file.
pub fn load_pipeline_config(path: impl AsRef<Path>) -> Result<PipelineConfig, LogFlowError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    parse_pipeline_config(&contents, path.extension().and_then(|ext| ext.to_str()).unwrap_or("yaml"))
}

/// Parses pipeline config from an in-memory string, given a format hint
/// (`"yaml"`, `"yml"`, or `"json"`).
pub fn parse_pipeline_config(contents: &str, format_hint: &str) -> Result<PipelineConfig, LogFlowError> {
    match format_hint {
        "json" => serde_json::from_str(contents).map_err(LogFlowError::from),
        _ => serde_yaml::from_str(contents)
            .map_err(|e| LogFlowError::invalid_config(format!("failed to parse pipeline config: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_yaml_config() {
        let yaml = r#"
name: errors-to-stdout
sources:
  - name: in
    type: file
    config:
      path: /var/log/app.log
sinks:
  - name: out
    type: stdout
    config: {}
"#;
        let config = parse_pipeline_config(yaml, "yaml").unwrap();
        assert_eq!(config.name, "errors-to-stdout");
        assert_eq!(config.sources.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_json_config() {
        let json = r#"{"name":"p","sources":[{"name":"in","type":"file","config":{}}],"sinks":[{"name":"out","type":"stdout","config":{}}]}"#;
        let config = parse_pipeline_config(json, "json").unwrap();
        assert_eq!(config.name, "p");
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        assert!(parse_pipeline_config("not: [valid", "yaml").is_err());
    }
}
