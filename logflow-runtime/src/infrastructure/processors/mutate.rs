// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `mutate` — a fixed pipeline of field transformations, applied in a
//! deliberate order so that a single config block reads the same way every
//! time it's authored: rename, convert, case-fold, strip, add, remove.

use logflow_domain::{FieldValue, LogEvent, LogFlowError, PluginConfig, Processor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConvertTo {
    String,
    Int,
    Float,
    Bool,
}

impl ConvertTo {
    fn parse(s: &str) -> Result<Self, LogFlowError> {
        match s {
            "string" => Ok(Self::String),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "bool" => Ok(Self::Bool),
            other => Err(LogFlowError::invalid_config(format!("mutate: unknown convert type '{}'", other))),
        }
    }
}

#[derive(Debug)]
pub struct MutateProcessor {
    rename_fields: Vec<(String, String)>,
    convert_fields: Vec<(String, ConvertTo)>,
    uppercase_fields: Vec<String>,
    lowercase_fields: Vec<String>,
    strip_fields: Vec<String>,
    add_fields: Vec<(String, FieldValue)>,
    remove_fields: Vec<String>,
}

impl MutateProcessor {
    pub fn new() -> Self {
        Self {
            rename_fields: Vec::new(),
            convert_fields: Vec::new(),
            uppercase_fields: Vec::new(),
            lowercase_fields: Vec::new(),
            strip_fields: Vec::new(),
            add_fields: Vec::new(),
            remove_fields: Vec::new(),
        }
    }
}

impl Default for MutateProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn convert_value(value: &FieldValue, to: ConvertTo) -> Option<FieldValue> {
    match to {
        ConvertTo::String => Some(FieldValue::String(match value {
            FieldValue::String(s) => s.clone(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            _ => return None,
        })),
        ConvertTo::Int => Some(FieldValue::Int(match value {
            FieldValue::Int(i) => *i,
            FieldValue::Float(f) => *f as i64,
            FieldValue::String(s) => s.trim().parse().ok()?,
            FieldValue::Bool(b) => *b as i64,
            _ => return None,
        })),
        ConvertTo::Float => Some(FieldValue::Float(match value {
            FieldValue::Float(f) => *f,
            FieldValue::Int(i) => *i as f64,
            FieldValue::String(s) => s.trim().parse().ok()?,
            _ => return None,
        })),
        ConvertTo::Bool => Some(FieldValue::Bool(match value {
            FieldValue::Bool(b) => *b,
            FieldValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => return None,
            },
            FieldValue::Int(i) => *i != 0,
            _ => return None,
        })),
    }
}

impl Processor for MutateProcessor {
    fn open(&mut self, config: &PluginConfig) -> Result<(), LogFlowError> {
        let obj = |key: &str| config.settings.get(key).and_then(|v| v.as_object()).cloned().unwrap_or_default();
        let list = |key: &str| -> Vec<String> {
            config
                .settings
                .get(key)
                .and_then(|v| v.as_array())
                .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
                .unwrap_or_default()
        };

        self.rename_fields = obj("rename_fields")
            .into_iter()
            .filter_map(|(k, v)| v.as_str().map(|to| (k, to.to_string())))
            .collect();

        self.convert_fields = obj("convert_fields")
            .into_iter()
            .map(|(k, v)| {
                let ty = v.as_str().ok_or_else(|| LogFlowError::invalid_config("mutate: convert_fields values must be strings"))?;
                Ok((k, ConvertTo::parse(ty)?))
            })
            .collect::<Result<Vec<_>, LogFlowError>>()?;

        self.uppercase_fields = list("uppercase_fields");
        self.lowercase_fields = list("lowercase_fields");
        self.strip_fields = list("strip_fields");
        self.remove_fields = list("remove_fields");

        self.add_fields = obj("add_fields")
            .into_iter()
            .map(|(k, v)| (k, FieldValue::from_json(v)))
            .collect();

        Ok(())
    }

    fn process(&self, mut event: LogEvent) -> Result<Vec<LogEvent>, LogFlowError> {
        for (from, to) in &self.rename_fields {
            if let Some(value) = event.fields.shift_remove(from) {
                event.set_field(to.clone(), value);
            }
        }

        for (field, to) in &self.convert_fields {
            if let Some(value) = event.get_field(field) {
                if let Some(converted) = convert_value(value, *to) {
                    event.set_field(field.clone(), converted);
                }
            }
        }

        for field in &self.uppercase_fields {
            if let Some(FieldValue::String(s)) = event.get_field(field) {
                let upper = s.to_uppercase();
                event.set_field(field.clone(), FieldValue::String(upper));
            }
        }

        for field in &self.lowercase_fields {
            if let Some(FieldValue::String(s)) = event.get_field(field) {
                let lower = s.to_lowercase();
                event.set_field(field.clone(), FieldValue::String(lower));
            }
        }

        for field in &self.strip_fields {
            if let Some(FieldValue::String(s)) = event.get_field(field) {
                let trimmed = s.trim().to_string();
                event.set_field(field.clone(), FieldValue::String(trimmed));
            }
        }

        for (field, value) in &self.add_fields {
            event.set_field(field.clone(), value.clone());
        }

        for field in &self.remove_fields {
            event.fields.shift_remove(field);
        }

        Ok(vec![event])
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
    fn rename_runs_before_convert_so_convert_sees_the_new_name() {
        let mut processor = MutateProcessor::new();
        processor
            .open(&PluginConfig::new(
                "mutate",
                json!({"rename_fields": {"lvl": "level_code"}, "convert_fields": {"level_code": "int"}}),
            ))
            .unwrap();

        let mut event = LogEvent::new("app", "");
        event.set_field("lvl", FieldValue::String("3".to_string()));
        let result = processor.process(event).unwrap();
        assert_eq!(result[0].get_field("level_code"), Some(&FieldValue::Int(3)));
        assert!(result[0].get_field("lvl").is_none());
    }

    #[test]
    fn case_folding_and_strip_apply_only_to_strings() {
        let mut processor = MutateProcessor::new();
        processor
            .open(&PluginConfig::new(
                "mutate",
                json!({"uppercase_fields": ["level"], "strip_fields": ["message"]}),
            ))
            .unwrap();

        let mut event = LogEvent::new("app", "");
        event.set_field("level", FieldValue::String("error".to_string()));
        event.set_field("message", FieldValue::String("  hi  ".to_string()));
        let result = processor.process(event).unwrap();
        assert_eq!(result[0].get_field("level"), Some(&FieldValue::String("ERROR".to_string())));
        assert_eq!(result[0].get_field("message"), Some(&FieldValue::String("hi".to_string())));
    }

    #[test]
    fn add_then_remove_means_remove_wins_on_overlap() {
        let mut processor = MutateProcessor::new();
        processor
            .open(&PluginConfig::new(
                "mutate",
                json!({"add_fields": {"env": "prod"}, "remove_fields": ["env"]}),
            ))
            .unwrap();

        let event = LogEvent::new("app", "");
        let result = processor.process(event).unwrap();
        assert!(result[0].get_field("env").is_none());
    }

    #[test]
    fn unknown_convert_type_is_rejected_at_open() {
        let mut processor = MutateProcessor::new();
        assert!(processor
            .open(&PluginConfig::new("mutate", json!({"convert_fields": {"x": "uuid"}})))
            .is_err());
    }
}
