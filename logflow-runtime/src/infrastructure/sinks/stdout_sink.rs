// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `stdout` — writes each event in a batch as a JSON line to the process's
//! standard output. Mainly useful for development and the examples in this
//! repository; production deployments typically forward to a real sink.

use async_trait::async_trait;
use logflow_domain::{Batch, LogFlowError, PluginConfig, Sink};
use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Debug)]
pub struct StdoutSink {
    raw: bool,
    stdout: Option<tokio::io::Stdout>,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self { raw: false, stdout: None }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sink for StdoutSink {
    async fn open(&mut self, config: &PluginConfig) -> Result<(), LogFlowError> {
        self.raw = config.get_str("format", "json") == "raw";
        self.stdout = Some(tokio::io::stdout());
        Ok(())
    }

    async fn write(&mut self, batch: Batch) -> Result<(), LogFlowError> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Err(LogFlowError::internal("stdout sink: write before open"));
        };
        for event in batch.events().iter() {
            let line = if self.raw {
                event.raw_data.clone()
            } else {
                serde_json::to_string(event).map_err(LogFlowError::from)?
            };
            write_line(stdout, &line).await?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), LogFlowError> {
        if let Some(stdout) = self.stdout.as_mut() {
            stdout.flush().await.map_err(LogFlowError::from)?;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), LogFlowError> {
        self.flush().await?;
        self.stdout = None;
        Ok(())
    }
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> Result<(), LogFlowError> {
    writer.write_all(line.as_bytes()).await.map_err(LogFlowError::from)?;
    writer.write_all(b"\n").await.map_err(LogFlowError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logflow_domain::LogEvent;
    use serde_json::json;

    #[tokio::test]
    async fn open_defaults_to_json_format() {
        let mut sink = StdoutSink::new();
        sink.open(&PluginConfig::new("stdout", json!({}))).await.unwrap();
        assert!(!sink.raw);
    }

    #[tokio::test]
    async fn write_and_flush_do_not_error_on_an_empty_batch() {
        let mut sink = StdoutSink::new();
        sink.open(&PluginConfig::new("stdout", json!({}))).await.unwrap();
        sink.write(Batch::new(Vec::new())).await.unwrap();
        sink.flush().await.unwrap();
    }

    #[tokio::test]
    async fn writes_one_line_per_event() {
        let mut sink = StdoutSink::new();
        sink.open(&PluginConfig::new("stdout", json!({"format": "raw"}))).await.unwrap();
        let events = vec![LogEvent::new("app", "hello"), LogEvent::new("app", "world")];
        sink.write(Batch::new(events)).await.unwrap();
    }
}
