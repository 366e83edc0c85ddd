// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `stdin` — reads newline-delimited events from the process's standard
//! input until EOF. Useful for piping another program's output straight
//! into a pipeline without a named file.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use logflow_domain::{EmitOutcome, EventEmitter, LogEvent, LogFlowError, PluginConfig, Source};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug)]
pub struct StdinSource {
    running: Arc<AtomicBool>,
    emitted: Arc<AtomicU64>,
    errors: Arc<AtomicU64>,
}

impl StdinSource {
    pub fn new() -> Self {
        Self { running: Arc::new(AtomicBool::new(false)), emitted: Arc::new(AtomicU64::new(0)), errors: Arc::new(AtomicU64::new(0)) }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for StdinSource {
    async fn open(&mut self, _config: &PluginConfig) -> Result<(), LogFlowError> {
        Ok(())
    }

    async fn start(&mut self, emit: Arc<dyn EventEmitter>) -> Result<(), LogFlowError> {
        self.running.store(true, Ordering::SeqCst);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while self.running.load(Ordering::SeqCst) {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let event = LogEvent::new("stdin", line);
                    match emit.emit(event).await {
                        EmitOutcome::Accepted => {
                            self.emitted.fetch_add(1, Ordering::Relaxed);
                        }
                        EmitOutcome::QueueFull => {
                            self.errors.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    self.errors.fetch_add(1, Ordering::Relaxed);
                    return Err(LogFlowError::internal(format!("stdin source: read error: {}", e)));
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
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

    #[test]
    fn starts_out_not_running() {
        let source = StdinSource::new();
        assert!(!source.is_running());
        assert_eq!(source.events_emitted(), 0);
    }
}
