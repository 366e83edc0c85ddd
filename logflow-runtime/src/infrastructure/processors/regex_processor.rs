// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `regex` — applies named-capture patterns to a field, writing the first
//! matching pattern's captures as event fields.

use logflow_domain::{FieldValue, LogEvent, LogFlowError, PluginConfig, Processor};
use regex::Regex;

#[derive(Debug)]
pub struct RegexProcessor {
    field: String,
    target_field: String,
    patterns: Vec<Regex>,
    ignore_errors: bool,
}

impl RegexProcessor {
    pub fn new() -> Self {
        Self { field: "raw_data".to_string(), target_field: String::new(), patterns: Vec::new(), ignore_errors: false }
    }

    /// Applies `self.patterns` in order, writing captures from the first
    /// match. Shared with [`super::grok::GrokProcessor`], which compiles its
    /// catalogue-expanded pattern through the same matching logic.
    pub(super) fn apply(patterns: &[Regex], target_field: &str, mut event: LogEvent, text: &str) -> Option<LogEvent> {
        for pattern in patterns {
            if let Some(captures) = pattern.captures(text) {
                for name in pattern.capture_names().flatten() {
                    if let Some(value) = captures.name(name) {
                        let field_name = if target_field.is_empty() {
                            name.to_string()
                        } else {
                            format!("{}.{}", target_field, name)
                        };
                        event.set_field(field_name, FieldValue::String(value.as_str().to_string()));
                    }
                }
                return Some(event);
            }
        }
        None
    }
}

impl Default for RegexProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for RegexProcessor {
    fn open(&mut self, config: &PluginConfig) -> Result<(), LogFlowError> {
        self.field = config.get_str("field", "raw_data").to_string();
        self.target_field = config.get_str("target_field", "").to_string();
        self.ignore_errors = config.get_bool("ignore_errors", false);

        let raw_patterns = config
            .settings
            .get("patterns")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        let single = config.settings.get("pattern").and_then(|v| v.as_str());

        let mut sources: Vec<String> = raw_patterns.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
        if let Some(pattern) = single {
            sources.push(pattern.to_string());
        }
        if sources.is_empty() {
            return Err(LogFlowError::invalid_config("regex: at least one of 'pattern' or 'patterns' is required"));
        }

        self.patterns = sources
            .iter()
            .map(|p| Regex::new(p).map_err(|e| LogFlowError::invalid_config(format!("regex: invalid pattern '{}': {}", p, e))))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(())
    }

    fn process(&self, event: LogEvent) -> Result<Vec<LogEvent>, LogFlowError> {
        let text = if self.field == "raw_data" {
            event.raw_data.clone()
        } else {
            match event.get_field(&self.field).and_then(FieldValue::as_str) {
                Some(s) => s.to_string(),
                None => {
                    return if self.ignore_errors {
                        Ok(vec![event])
                    } else {
                        Err(LogFlowError::processor_failed(format!("regex: field '{}' is missing or not a string", self.field)))
                    }
                }
            }
        };

        match Self::apply(&self.patterns, &self.target_field, event.clone(), &text) {
            Some(matched) => Ok(vec![matched]),
            None => {
                if self.ignore_errors {
                    Ok(vec![event])
                } else {
                    Err(LogFlowError::processor_failed(format!("regex: no pattern matched field '{}'", self.field)))
                }
            }
        }
    }

    fn close(&mut self) -> Result<(), LogFlowError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_matching_pattern_wins_and_writes_captures() {
        let mut processor = RegexProcessor::new();
        processor
            .open(&PluginConfig::new(
                "regex",
                json!({"patterns": [r"^(?P<level>\w+): (?P<message>.*)$"]}),
            ))
            .unwrap();

        let event = LogEvent::new("stdin", "ERROR: disk full");
        let result = processor.process(event).unwrap();
        assert_eq!(result[0].get_field("level").and_then(FieldValue::as_str), Some("ERROR"));
        assert_eq!(result[0].get_field("message").and_then(FieldValue::as_str), Some("disk full"));
    }

    #[test]
    fn target_field_namespaces_captures() {
        let mut processor = RegexProcessor::new();
        processor
            .open(&PluginConfig::new(
                "regex",
                json!({"pattern": r"^(?P<level>\w+)", "target_field": "parsed"}),
            ))
            .unwrap();

        let event = LogEvent::new("stdin", "WARN something");
        let result = processor.process(event).unwrap();
        assert_eq!(result[0].get_field("parsed.level").and_then(FieldValue::as_str), Some("WARN"));
    }

    #[test]
    fn no_match_with_ignore_errors_passes_through() {
        let mut processor = RegexProcessor::new();
        processor
            .open(&PluginConfig::new("regex", json!({"pattern": r"^\d+$", "ignore_errors": true})))
            .unwrap();

        let event = LogEvent::new("stdin", "not numeric");
        let result = processor.process(event).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn missing_pattern_config_is_rejected_at_open() {
        let mut processor = RegexProcessor::new();
        assert!(processor.open(&PluginConfig::new("regex", json!({}))).is_err());
    }
}
