// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The declarative record a pipeline config names a source, processor, or
//! sink with: a type-tag the [`PluginRegistry`](crate::repositories::PluginRegistry)
//! dispatches on, and a settings blob the plugin's `open` compiles.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// The instance name within the pipeline (e.g. `"errors-only"` for a
    /// `filter` stage); used only for logging/metrics labelling.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(rename = "config", default)]
    pub settings: Value,
}

impl PluginConfig {
    pub fn new(type_tag: impl Into<String>, settings: Value) -> Self {
        Self { name: String::new(), type_tag: type_tag.into(), settings }
    }

    pub fn named(name: impl Into<String>, type_tag: impl Into<String>, settings: Value) -> Self {
        Self { name: name.into(), type_tag: type_tag.into(), settings }
    }

    /// Looks up a settings key, falling back to `default` when absent.
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.settings.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        self.settings.get(key).and_then(Value::as_u64).unwrap_or(default)
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.settings.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.settings.get(key).and_then(Value::as_bool).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_keys_fall_back_to_default() {
        let config = PluginConfig::new("regex", json!({"pattern": "^ERROR"}));
        assert_eq!(config.get_str("pattern", ""), "^ERROR");
        assert_eq!(config.get_u64("timeout_ms", 500), 500);
    }
}
