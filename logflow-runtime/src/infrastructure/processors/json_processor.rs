// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `json` — parses JSON out of a source field, either merging it into the
//! event's top-level fields or writing it under a named target field.

use logflow_domain::{FieldValue, LogEvent, LogFlowError, PluginConfig, Processor};

#[derive(Debug, Clone)]
pub struct JsonProcessor {
    field: String,
    target_field: String,
    preserve_original: bool,
    ignore_errors: bool,
}

impl JsonProcessor {
    pub fn new() -> Self {
        Self { field: "raw_data".to_string(), target_field: String::new(), preserve_original: false, ignore_errors: false }
    }
}

impl Default for JsonProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for JsonProcessor {
    fn open(&mut self, config: &PluginConfig) -> Result<(), LogFlowError> {
        self.field = config.get_str("field", "raw_data").to_string();
        self.target_field = config.get_str("target_field", "").to_string();
        self.preserve_original = config.get_bool("preserve_original", false);
        self.ignore_errors = config.get_bool("ignore_errors", false);
        Ok(())
    }

    fn process(&self, mut event: LogEvent) -> Result<Vec<LogEvent>, LogFlowError> {
        let raw = if self.field == "raw_data" {
            event.raw_data.clone()
        } else {
            match event.get_field(&self.field).and_then(FieldValue::as_str) {
                Some(s) => s.to_string(),
                None => {
                    return if self.ignore_errors {
                        Ok(vec![event])
                    } else {
                        Err(LogFlowError::processor_failed(format!("json: field '{}' is missing or not a string", self.field)))
                    }
                }
            }
        };

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => {
                let parsed = FieldValue::from_json(value);
                if self.target_field.is_empty() {
                    if let FieldValue::Map(map) = parsed {
                        for (k, v) in map {
                            event.set_field(k, v);
                        }
                    } else if !self.ignore_errors {
                        return Err(LogFlowError::processor_failed("json: parsed value is not an object and target_field is empty"));
                    }
                } else {
                    event.set_field(self.target_field.clone(), parsed);
                }
                if !self.preserve_original && self.field != "raw_data" {
                    event.fields.shift_remove(&self.field);
                }
                Ok(vec![event])
            }
            Err(e) => {
                if self.ignore_errors {
                    Ok(vec![event])
                } else {
                    Err(LogFlowError::processor_failed(format!("json: parse error: {}", e)))
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
    fn merges_parsed_object_into_top_level_fields_by_default() {
        let mut processor = JsonProcessor::new();
        processor.open(&PluginConfig::new("json", json!({}))).unwrap();

        let event = LogEvent::new("stdin", r#"{"level":"INFO","user":"alice"}"#);
        let result = processor.process(event).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get_field("level").and_then(FieldValue::as_str), Some("INFO"));
    }

    #[test]
    fn writes_to_target_field_when_configured() {
        let mut processor = JsonProcessor::new();
        processor.open(&PluginConfig::new("json", json!({"target_field": "payload"}))).unwrap();

        let event = LogEvent::new("stdin", r#"{"a":1}"#);
        let result = processor.process(event).unwrap();
        assert!(matches!(result[0].get_field("payload"), Some(FieldValue::Map(_))));
    }

    #[test]
    fn ignore_errors_passes_through_on_parse_failure() {
        let mut processor = JsonProcessor::new();
        processor.open(&PluginConfig::new("json", json!({"ignore_errors": true}))).unwrap();

        let event = LogEvent::new("stdin", "not json");
        let result = processor.process(event).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn surfaces_parse_error_by_default() {
        let mut processor = JsonProcessor::new();
        processor.open(&PluginConfig::new("json", json!({}))).unwrap();

        let event = LogEvent::new("stdin", "not json");
        assert!(processor.process(event).is_err());
    }
}
