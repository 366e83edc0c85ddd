// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `file` — reads newline-delimited events from a file. In `follow` mode it
//! behaves like `tail -f`: it keeps polling for new lines appended after
//! EOF instead of stopping, which is the common shape for tailing an
//! application's log file.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use logflow_domain::{EmitOutcome, EventEmitter, LogEvent, LogFlowError, PluginConfig, Source};
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    follow: bool,
    poll_interval: Duration,
    running: Arc<AtomicBool>,
    emitted: Arc<AtomicU64>,
    errors: Arc<AtomicU64>,
}

impl FileSource {
    pub fn new() -> Self {
        Self {
            path: PathBuf::new(),
            follow: false,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            running: Arc::new(AtomicBool::new(false)),
            emitted: Arc::new(AtomicU64::new(0)),
            errors: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for FileSource {
    async fn open(&mut self, config: &PluginConfig) -> Result<(), LogFlowError> {
        let path = config.get_str("path", "");
        if path.is_empty() {
            return Err(LogFlowError::invalid_config("file source: 'path' is required"));
        }
        self.path = PathBuf::from(path);
        self.follow = config.get_bool("follow", false);
        self.poll_interval = Duration::from_millis(config.get_u64("poll_interval_ms", DEFAULT_POLL_INTERVAL_MS));

        if !self.follow && !self.path.exists() {
            return Err(LogFlowError::open_failed(format!("file source: '{}' does not exist", self.path.display())));
        }
        Ok(())
    }

    async fn start(&mut self, emit: Arc<dyn EventEmitter>) -> Result<(), LogFlowError> {
        self.running.store(true, Ordering::SeqCst);
        let name = self.path.to_string_lossy().to_string();

        loop {
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            let file = match tokio::fs::File::open(&self.path).await {
                Ok(f) => f,
                Err(e) => {
                    self.errors.fetch_add(1, Ordering::Relaxed);
                    if self.follow {
                        tokio::time::sleep(self.poll_interval).await;
                        continue;
                    }
                    return Err(LogFlowError::open_failed(format!("file source: {}", e)));
                }
            };

            let mut lines = BufReader::new(file).lines();
            loop {
                if !self.running.load(Ordering::SeqCst) {
                    return Ok(());
                }
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let event = LogEvent::new(&name, line);
                        match emit.emit(event).await {
                            EmitOutcome::Accepted => {
                                self.emitted.fetch_add(1, Ordering::Relaxed);
                            }
                            EmitOutcome::QueueFull => {
                                self.errors.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                    }
                    Ok(None) => {
                        if !self.follow {
                            return Ok(());
                        }
                        tokio::time::sleep(self.poll_interval).await;
                        break;
                    }
                    Err(e) => {
                        self.errors.fetch_add(1, Ordering::Relaxed);
                        if !self.follow {
                            return Err(LogFlowError::internal(format!("file source: read error: {}", e)));
                        }
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    async fn stop(&mut self) -> Result<(), LogFlowError> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn events_emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn open_rejects_missing_file_when_not_following() {
        let mut source = FileSource::new();
        let result = source.open(&PluginConfig::new("file", json!({"path": "/nonexistent/path/app.log"}))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn open_requires_a_path() {
        let mut source = FileSource::new();
        assert!(source.open(&PluginConfig::new("file", json!({}))).await.is_err());
    }

    #[tokio::test]
    async fn reads_every_line_from_a_real_file() {
        use std::io::Write;
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "first").unwrap();
        writeln!(tmp, "second").unwrap();

        let mut source = FileSource::new();
        source
            .open(&PluginConfig::new("file", json!({"path": tmp.path().to_string_lossy()})))
            .await
            .unwrap();

        struct CountingEmitter(std::sync::atomic::AtomicU64);
        #[async_trait]
        impl EventEmitter for CountingEmitter {
            async fn emit(&self, _event: LogEvent) -> EmitOutcome {
                self.0.fetch_add(1, Ordering::Relaxed);
                EmitOutcome::Accepted
            }
        }

        let emitter = Arc::new(CountingEmitter(std::sync::atomic::AtomicU64::new(0)));
        source.start(emitter.clone()).await.unwrap();
        assert_eq!(emitter.0.load(Ordering::Relaxed), 2);
        assert_eq!(source.events_emitted(), 2);
    }
}
