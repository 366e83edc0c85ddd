// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `file` — appends each event in a batch as a JSON line to a file, opening
//! (and creating, if necessary) it once at `open` and keeping the handle
//! for the sink's lifetime.

use std::path::PathBuf;

use async_trait::async_trait;
use logflow_domain::{Batch, LogFlowError, PluginConfig, Sink};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
}

impl FileSink {
    pub fn new() -> Self {
        Self { path: PathBuf::new(), file: None }
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn open(&mut self, config: &PluginConfig) -> Result<(), LogFlowError> {
        let path = config.get_str("path", "");
        if path.is_empty() {
            return Err(LogFlowError::invalid_config("file sink: 'path' is required"));
        }
        self.path = PathBuf::from(path);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| LogFlowError::open_failed(format!("file sink: {}", e)))?;
        self.file = Some(file);
        Ok(())
    }

    async fn write(&mut self, batch: Batch) -> Result<(), LogFlowError> {
        let Some(file) = self.file.as_mut() else {
            return Err(LogFlowError::internal("file sink: write before open"));
        };
        for event in batch.events().iter() {
            let line = serde_json::to_string(event).map_err(LogFlowError::from)?;
            file.write_all(line.as_bytes()).await.map_err(LogFlowError::from)?;
            file.write_all(b"\n").await.map_err(LogFlowError::from)?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), LogFlowError> {
        if let Some(file) = self.file.as_mut() {
            file.flush().await.map_err(LogFlowError::from)?;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), LogFlowError> {
        self.flush().await?;
        self.file = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logflow_domain::LogEvent;
    use serde_json::json;

    #[tokio::test]
    async fn open_requires_a_path() {
        let mut sink = FileSink::new();
        assert!(sink.open(&PluginConfig::new("file", json!({}))).await.is_err());
    }

    #[tokio::test]
    async fn writes_are_appended_and_readable_back() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let path = tmp.path().to_string_lossy().to_string();

        let mut sink = FileSink::new();
        sink.open(&PluginConfig::new("file", json!({"path": path.clone()}))).await.unwrap();
        sink.write(Batch::new(vec![LogEvent::new("app", "one")])).await.unwrap();
        sink.write(Batch::new(vec![LogEvent::new("app", "two")])).await.unwrap();
        sink.close().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
