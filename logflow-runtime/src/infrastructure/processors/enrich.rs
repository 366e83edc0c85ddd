// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `enrich` — attaches derived fields to an event from four sub-modes:
//! `lookup` (a static table loaded at `open`, `source_field` through the
//! table into `target_field`, falling back to `default_value` on a miss),
//! `geoip` and `useragent` (config-validated stubs that always miss,
//! pending a bundled database), and `dns` (a real reverse-lookup, cached,
//! and the one built-in permitted to block briefly on I/O since a DNS
//! round trip is unavoidably a wait).

use std::num::NonZeroUsize;
use std::time::Duration;

use indexmap::IndexMap;
use logflow_domain::{FieldValue, LogEvent, LogFlowError, PluginConfig, Processor};
use lru::LruCache;
use parking_lot::Mutex;

const DEFAULT_DNS_TIMEOUT_MS: u64 = 500;
const DEFAULT_DNS_CACHE_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Lookup,
    GeoIp,
    UserAgent,
    Dns,
}

impl Mode {
    fn parse(s: &str) -> Result<Self, LogFlowError> {
        match s {
            "lookup" => Ok(Self::Lookup),
            "geoip" => Ok(Self::GeoIp),
            "useragent" => Ok(Self::UserAgent),
            "dns" => Ok(Self::Dns),
            other => Err(LogFlowError::invalid_config(format!("enrich: unknown mode '{}'", other))),
        }
    }
}

pub struct EnrichProcessor {
    mode: Mode,
    field: String,
    target_field: String,
    lookup_table: IndexMap<String, FieldValue>,
    default_value: Option<FieldValue>,
    dns_timeout: Duration,
    dns_cache: Mutex<LruCache<String, Option<String>>>,
    misses: std::sync::atomic::AtomicU64,
}

impl std::fmt::Debug for EnrichProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichProcessor").field("mode", &self.mode).field("field", &self.field).finish()
    }
}

impl EnrichProcessor {
    pub fn new() -> Self {
        Self {
            mode: Mode::Lookup,
            field: String::new(),
            target_field: String::new(),
            lookup_table: IndexMap::new(),
            default_value: None,
            dns_timeout: Duration::from_millis(DEFAULT_DNS_TIMEOUT_MS),
            dns_cache: Mutex::new(LruCache::new(NonZeroUsize::new(DEFAULT_DNS_CACHE_CAPACITY).unwrap())),
            misses: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Number of lookups that found nothing (cache misses resolved to a
    /// miss, or a mode that has no data source yet). Exposed for metrics
    /// wiring in the runtime layer.
    pub fn misses(&self) -> u64 {
        self.misses.load(std::sync::atomic::Ordering::Relaxed)
    }

    fn resolve_dns(&self, host: &str) -> Option<String> {
        if let Some(cached) = self.dns_cache.lock().get(host).cloned() {
            return cached;
        }

        let target = format!("{}:0", host);
        let timeout = self.dns_timeout;
        let resolved = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                tokio::time::timeout(timeout, tokio::net::lookup_host(target)).await
            })
        });

        let result = match resolved {
            Ok(Ok(mut addrs)) => addrs.next().map(|addr| addr.ip().to_string()),
            _ => None,
        };

        self.dns_cache.lock().put(host.to_string(), result.clone());
        result
    }
}

impl Default for EnrichProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for EnrichProcessor {
    fn open(&mut self, config: &PluginConfig) -> Result<(), LogFlowError> {
        self.mode = Mode::parse(config.get_str("mode", "lookup"))?;
        self.field = config.get_str("source_field", "").to_string();
        self.target_field = config.get_str("target_field", "enrichment").to_string();

        if self.field.is_empty() {
            return Err(LogFlowError::invalid_config("enrich: 'source_field' is required"));
        }

        match self.mode {
            Mode::Lookup => {
                let table = config
                    .settings
                    .get("table")
                    .and_then(|v| v.as_object())
                    .ok_or_else(|| LogFlowError::invalid_config("enrich: lookup mode requires a 'table' object"))?;
                self.lookup_table = table.iter().map(|(k, v)| (k.clone(), FieldValue::from_json(v.clone()))).collect();
                self.default_value = config.settings.get("default_value").map(|v| FieldValue::from_json(v.clone()));
            }
            Mode::GeoIp | Mode::UserAgent => {
                // Config-validated stub: accepts the plugin record, has no
                // bundled database yet, and always reports a miss.
            }
            Mode::Dns => {
                let timeout_ms = config.get_u64("timeout_ms", DEFAULT_DNS_TIMEOUT_MS);
                self.dns_timeout = Duration::from_millis(timeout_ms);
                let capacity = config.get_u64("cache_capacity", DEFAULT_DNS_CACHE_CAPACITY as u64) as usize;
                self.dns_cache = Mutex::new(LruCache::new(
                    NonZeroUsize::new(capacity.max(1)).unwrap(),
                ));
            }
        }
        Ok(())
    }

    fn process(&self, mut event: LogEvent) -> Result<Vec<LogEvent>, LogFlowError> {
        let key = match event.get_field(&self.field).and_then(FieldValue::as_str) {
            Some(s) => s.to_string(),
            None => return Ok(vec![event]),
        };

        match self.mode {
            Mode::Lookup => match self.lookup_table.get(&key) {
                Some(value) => event.set_field(self.target_field.clone(), value.clone()),
                None => {
                    self.misses.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    if let Some(default) = &self.default_value {
                        event.set_field(self.target_field.clone(), default.clone());
                    }
                }
            },
            Mode::GeoIp | Mode::UserAgent => {
                self.misses.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            }
            Mode::Dns => match self.resolve_dns(&key) {
                Some(ip) => event.set_field(self.target_field.clone(), FieldValue::String(ip)),
                None => {
                    self.misses.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                }
            },
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
    fn lookup_mode_writes_table_hit_under_target_field() {
        let mut processor = EnrichProcessor::new();
        processor
            .open(&PluginConfig::new(
                "enrich",
                json!({"mode": "lookup", "source_field": "service", "table": {"api": {"team": "platform"}}}),
            ))
            .unwrap();

        let mut event = LogEvent::new("app", "");
        event.set_field("service", FieldValue::String("api".to_string()));
        let result = processor.process(event).unwrap();
        assert!(result[0].get_field("enrichment.team").is_some() || result[0].get_field("enrichment").is_some());
    }

    #[test]
    fn lookup_miss_counts_but_does_not_error() {
        let mut processor = EnrichProcessor::new();
        processor
            .open(&PluginConfig::new("enrich", json!({"mode": "lookup", "source_field": "service", "table": {}})))
            .unwrap();

        let mut event = LogEvent::new("app", "");
        event.set_field("service", FieldValue::String("unknown".to_string()));
        processor.process(event).unwrap();
        assert_eq!(processor.misses(), 1);
    }

    #[test]
    fn lookup_miss_falls_back_to_default_value() {
        let mut processor = EnrichProcessor::new();
        processor
            .open(&PluginConfig::new(
                "enrich",
                json!({"mode": "lookup", "source_field": "event_id", "target_field": "event_description", "table": {"1234": "Login succeeded"}, "default_value": "Unknown"}),
            ))
            .unwrap();

        let mut event = LogEvent::new("app", "");
        event.set_field("event_id", FieldValue::String("4625".to_string()));
        let result = processor.process(event).unwrap();
        assert_eq!(result[0].get_field("event_description").and_then(FieldValue::as_str), Some("Unknown"));
        assert_eq!(processor.misses(), 1);
    }

    #[test]
    fn geoip_stub_always_misses() {
        let mut processor = EnrichProcessor::new();
        processor.open(&PluginConfig::new("enrich", json!({"mode": "geoip", "source_field": "client_ip"}))).unwrap();

        let mut event = LogEvent::new("app", "");
        event.set_field("client_ip", FieldValue::String("10.0.0.1".to_string()));
        processor.process(event).unwrap();
        assert_eq!(processor.misses(), 1);
    }

    #[test]
    fn missing_source_field_passes_through_untouched() {
        let mut processor = EnrichProcessor::new();
        processor.open(&PluginConfig::new("enrich", json!({"mode": "lookup", "source_field": "service", "table": {}}))).unwrap();

        let event = LogEvent::new("app", "");
        let result = processor.process(event).unwrap();
        assert!(result[0].get_field("enrichment").is_none());
        assert_eq!(processor.misses(), 0);
    }

    #[test]
    fn unknown_mode_is_rejected_at_open() {
        let mut processor = EnrichProcessor::new();
        assert!(processor.open(&PluginConfig::new("enrich", json!({"mode": "weather", "source_field": "x"}))).is_err());
    }
}
