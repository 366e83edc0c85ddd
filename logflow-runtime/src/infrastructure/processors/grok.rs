// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `grok` — a thin catalogue-expanding wrapper over [`regex`](super::regex_processor):
//! `%{PATTERN:name}` references expand against a bundled pattern table before
//! the expression is handed to the regex engine.

use std::collections::HashMap;

use logflow_domain::{FieldValue, LogEvent, LogFlowError, PluginConfig, Processor};
use once_cell::sync::Lazy;
use regex::Regex;

use super::regex_processor::RegexProcessor;

/// `%{NAME:field[:type]}` — type is accepted but only used to document
/// intent; all captures arrive as strings, matching `regex`'s behavior.
static GROK_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%\{(?P<pattern>[A-Z0-9_]+)(?::(?P<name>[A-Za-z0-9_.]+))?(?::[a-z]+)?\}").unwrap());

static CATALOGUE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("INT", r"-?\d+");
    m.insert("NUMBER", r"-?\d+(?:\.\d+)?");
    m.insert("WORD", r"\w+");
    m.insert("NOTSPACE", r"\S+");
    m.insert("SPACE", r"\s*");
    m.insert("GREEDYDATA", r".*");
    m.insert("DATA", r".*?");
    m.insert("LOGLEVEL", r"(?:TRACE|DEBUG|INFO|WARN|WARNING|ERROR|CRITICAL|FATAL)");
    m.insert("IP", r"(?:[0-9]{1,3}\.){3}[0-9]{1,3}");
    m.insert("HOSTNAME", r"[a-zA-Z0-9][a-zA-Z0-9.-]*");
    m.insert("TIMESTAMP_ISO8601", r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})?");
    m.insert("UUID", r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}");
    m
});

/// Expands `%{PATTERN:name}` references into a plain regex with named
/// capture groups, recursively resolving pattern-to-pattern references up
/// to a fixed depth to guard against catalogue cycles.
fn expand(pattern: &str) -> Result<String, LogFlowError> {
    let mut expanded = pattern.to_string();
    for _ in 0..16 {
        if !GROK_REF.is_match(&expanded) {
            return Ok(expanded);
        }
        let mut had_unknown = None;
        expanded = GROK_REF
            .replace_all(&expanded, |caps: &regex::Captures| {
                let tag = &caps["pattern"];
                let Some(body) = CATALOGUE.get(tag) else {
                    had_unknown = Some(tag.to_string());
                    return String::new();
                };
                match caps.name("name") {
                    Some(name) => format!("(?P<{}>{})", name.as_str(), body),
                    None => format!("(?:{})", body),
                }
            })
            .into_owned();
        if let Some(tag) = had_unknown {
            return Err(LogFlowError::invalid_config(format!("grok: unknown pattern '{}'", tag)));
        }
    }
    Err(LogFlowError::invalid_config("grok: pattern expansion did not terminate (cyclic reference?)"))
}

#[derive(Debug)]
pub struct GrokProcessor {
    field: String,
    target_field: String,
    patterns: Vec<Regex>,
    ignore_errors: bool,
}

impl GrokProcessor {
    pub fn new() -> Self {
        Self { field: "raw_data".to_string(), target_field: String::new(), patterns: Vec::new(), ignore_errors: false }
    }
}

impl Default for GrokProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for GrokProcessor {
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
            return Err(LogFlowError::invalid_config("grok: at least one of 'pattern' or 'patterns' is required"));
        }

        self.patterns = sources
            .iter()
            .map(|p| expand(p).and_then(|full| {
                Regex::new(&full).map_err(|e| LogFlowError::invalid_config(format!("grok: invalid pattern '{}': {}", p, e)))
            }))
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
                        Err(LogFlowError::processor_failed(format!("grok: field '{}' is missing or not a string", self.field)))
                    }
                }
            }
        };

        match RegexProcessor::apply(&self.patterns, &self.target_field, event.clone(), &text) {
            Some(matched) => Ok(vec![matched]),
            None => {
                if self.ignore_errors {
                    Ok(vec![event])
                } else {
                    Err(LogFlowError::processor_failed(format!("grok: no pattern matched field '{}'", self.field)))
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
    fn expands_catalogue_patterns_and_captures_named_groups() {
        let mut processor = GrokProcessor::new();
        processor
            .open(&PluginConfig::new(
                "grok",
                json!({"pattern": "%{TIMESTAMP_ISO8601:ts} %{LOGLEVEL:level} %{GREEDYDATA:message}"}),
            ))
            .unwrap();

        let event = LogEvent::new("stdin", "2026-07-26T10:00:00Z ERROR disk full on /dev/sda1");
        let result = processor.process(event).unwrap();
        assert_eq!(result[0].get_field("level").and_then(FieldValue::as_str), Some("ERROR"));
        assert_eq!(result[0].get_field("message").and_then(FieldValue::as_str), Some("disk full on /dev/sda1"));
    }

    #[test]
    fn unknown_catalogue_reference_is_rejected_at_open() {
        let mut processor = GrokProcessor::new();
        assert!(processor.open(&PluginConfig::new("grok", json!({"pattern": "%{NOPE:x}"}))).is_err());
    }

    #[test]
    fn ip_pattern_matches_dotted_quad() {
        let mut processor = GrokProcessor::new();
        processor.open(&PluginConfig::new("grok", json!({"pattern": "client=%{IP:client_ip}"}))).unwrap();

        let event = LogEvent::new("stdin", "client=10.0.0.5");
        let result = processor.process(event).unwrap();
        assert_eq!(result[0].get_field("client_ip").and_then(FieldValue::as_str), Some("10.0.0.5"));
    }
}
