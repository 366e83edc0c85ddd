// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The `Engine`: a registry of named pipelines and the operations that load,
//! start, stop, and tear them down.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use logflow_domain::repositories::PluginRegistry;
use logflow_domain::{LogFlowError, PipelineConfig, PipelineEvent, PipelineMetricsSnapshot, PipelineState};
use parking_lot::RwLock;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use super::pipeline_runtime::PipelineRuntime;

const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(30);

/// Holds a pipeline's runtime plus enough identity to report it back through
/// `list_pipelines`/`get_metrics` without locking the runtime itself.
struct PipelineHandle {
    runtime: Arc<tokio::sync::Mutex<PipelineRuntime>>,
}

/// Owns every loaded pipeline. Not `Clone`; callers share it behind an
/// `Arc<Engine>` the way the bootstrap crate's composition root does.
pub struct Engine {
    registry: PluginRegistry,
    pipelines: RwLock<HashMap<String, PipelineHandle>>,
    events_tx: UnboundedSender<PipelineEvent>,
}

impl Engine {
    /// Builds an `Engine` over `registry` and returns it paired with the
    /// receiving end of its lifecycle event stream. Dropping the receiver is
    /// fine; events are then simply discarded.
    pub fn new(registry: PluginRegistry) -> (Self, UnboundedReceiver<PipelineEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        (
            Self {
                registry,
                pipelines: RwLock::new(HashMap::new()),
                events_tx,
            },
            events_rx,
        )
    }

    fn emit(&self, event: PipelineEvent) {
        let _ = self.events_tx.send(event);
    }

    /// Validates `config` and registers it under `config.name`, returning
    /// that name. Does not start it. A name collision fails unless
    /// `replace` is set, in which case the old pipeline is stopped first
    /// and its runtime replaced.
    pub async fn load_pipeline(&self, config: PipelineConfig, replace: bool) -> Result<String, LogFlowError> {
        config.validate()?;
        let name = config.name.clone();

        let existing = self.pipelines.read().get(&name).map(|handle| handle.runtime.clone());
        if let Some(old_runtime) = existing {
            if !replace {
                return Err(LogFlowError::PipelineAlreadyExists(name));
            }
            old_runtime.lock().await.stop().await?;
        }

        let pipeline_id = logflow_domain::PipelineId::new();
        let runtime = PipelineRuntime::new(config);
        self.pipelines.write().insert(
            name.clone(),
            PipelineHandle {
                runtime: Arc::new(tokio::sync::Mutex::new(runtime)),
            },
        );

        self.emit(PipelineEvent::Loaded { pipeline_id, name: name.clone() });
        Ok(name)
    }

    fn handle(&self, name: &str) -> Result<Arc<tokio::sync::Mutex<PipelineRuntime>>, LogFlowError> {
        self.pipelines
            .read()
            .get(name)
            .map(|handle| handle.runtime.clone())
            .ok_or_else(|| LogFlowError::PipelineNotFound(name.to_string()))
    }

    /// Idempotent: starting an already-`running` pipeline is a no-op.
    pub async fn start_pipeline(&self, name: &str) -> Result<(), LogFlowError> {
        let runtime = self.handle(name)?;
        let mut runtime = runtime.lock().await;
        let pipeline_id = logflow_domain::PipelineId::new();
        match runtime.start(&self.registry).await {
            Ok(()) => {
                self.emit(PipelineEvent::Started { pipeline_id });
                Ok(())
            }
            Err(err) => {
                self.emit(PipelineEvent::Failed { pipeline_id, reason: err.to_string() });
                Err(err)
            }
        }
    }

    /// Idempotent: stopping an already-terminal pipeline is a no-op.
    pub async fn stop_pipeline(&self, name: &str) -> Result<(), LogFlowError> {
        let runtime = self.handle(name)?;
        let mut runtime = runtime.lock().await;
        let pipeline_id = logflow_domain::PipelineId::new();
        runtime.stop().await?;
        self.emit(PipelineEvent::Stopped { pipeline_id });
        Ok(())
    }

    /// Stops then starts the named pipeline, resetting its metrics.
    pub async fn restart_pipeline(&self, name: &str) -> Result<(), LogFlowError> {
        let runtime = self.handle(name)?;
        let config = {
            let mut runtime = runtime.lock().await;
            runtime.stop().await?;
            runtime.config.clone()
        };

        let mut fresh = PipelineRuntime::new(config);
        fresh.start(&self.registry).await?;
        *runtime.lock().await = fresh;

        let pipeline_id = logflow_domain::PipelineId::new();
        self.emit(PipelineEvent::Restarted { pipeline_id });
        Ok(())
    }

    /// Stops (if running) and forgets the named pipeline.
    pub async fn remove_pipeline(&self, name: &str) -> Result<(), LogFlowError> {
        let runtime = self.handle(name)?;
        runtime.lock().await.stop().await?;
        self.pipelines.write().remove(name);
        let pipeline_id = logflow_domain::PipelineId::new();
        self.emit(PipelineEvent::Removed { pipeline_id });
        Ok(())
    }

    pub fn list_pipelines(&self) -> Vec<(String, PipelineState)> {
        // Locking each runtime's async mutex from a sync context would
        // require `blocking_lock`, which panics inside an async task; this
        // list is a best-effort snapshot and skips a pipeline that happens
        // to be mid-transition rather than blocking on it.
        self.pipelines
            .read()
            .iter()
            .filter_map(|(name, handle)| handle.runtime.try_lock().ok().map(|r| (name.clone(), r.state())))
            .collect()
    }

    pub async fn get_metrics(&self, name: &str) -> Result<PipelineMetricsSnapshot, LogFlowError> {
        let runtime = self.handle(name)?;
        Ok(runtime.lock().await.metrics_snapshot())
    }

    /// Stops every pipeline in parallel, bounded by `SHUTDOWN_DEADLINE`.
    /// A pipeline that doesn't stop in time is left `failed` rather than
    /// blocking the others.
    pub async fn shutdown(&self) {
        let handles: Vec<_> = self.pipelines.read().values().map(|h| h.runtime.clone()).collect();
        let stops = handles.into_iter().map(|runtime| async move {
            let mut runtime = runtime.lock().await;
            if tokio::time::timeout(SHUTDOWN_DEADLINE, runtime.stop()).await.is_err() {
                error!("pipeline did not stop within the shutdown deadline");
            }
        });
        futures_lite_join_all(stops).await;
        info!("engine shutdown complete");
    }
}

/// A minimal stand-in for `futures::future::join_all` so this crate does not
/// need to add the `futures` crate just for one call site.
async fn futures_lite_join_all<I>(iter: I)
where
    I: IntoIterator,
    I::Item: std::future::Future<Output = ()>,
{
    let handles: Vec<_> = iter.into_iter().map(tokio::spawn).collect();
    for handle in handles {
        let _ = handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logflow_domain::PluginConfig;
    use serde_json::json;

    fn config(name: &str) -> PipelineConfig {
        PipelineConfig::new(name, vec![PluginConfig::new("stdin", json!({}))], vec![PluginConfig::new("stdout", json!({}))])
    }

    #[tokio::test]
    async fn loading_the_same_name_twice_is_rejected() {
        let (engine, _rx) = Engine::new(PluginRegistry::new());
        engine.load_pipeline(config("p"), false).await.unwrap();
        assert!(matches!(engine.load_pipeline(config("p"), false).await, Err(LogFlowError::PipelineAlreadyExists(_))));
    }

    #[tokio::test]
    async fn loading_the_same_name_twice_with_replace_stops_the_old_one_and_succeeds() {
        let (engine, _rx) = Engine::new(PluginRegistry::new());
        engine.load_pipeline(config("p"), false).await.unwrap();
        let name = engine.load_pipeline(config("p"), true).await.unwrap();
        assert_eq!(name, "p");
        assert_eq!(engine.list_pipelines(), vec![("p".to_string(), PipelineState::Created)]);
    }

    #[tokio::test]
    async fn operating_on_an_unknown_pipeline_is_reported_as_not_found() {
        let (engine, _rx) = Engine::new(PluginRegistry::new());
        assert!(matches!(engine.start_pipeline("ghost").await, Err(LogFlowError::PipelineNotFound(_))));
        assert!(matches!(engine.stop_pipeline("ghost").await, Err(LogFlowError::PipelineNotFound(_))));
        assert!(matches!(engine.get_metrics("ghost").await, Err(LogFlowError::PipelineNotFound(_))));
    }

    #[tokio::test]
    async fn a_loaded_but_unstarted_pipeline_is_listed_as_created() {
        let (engine, _rx) = Engine::new(PluginRegistry::new());
        engine.load_pipeline(config("p"), false).await.unwrap();
        let listed = engine.list_pipelines();
        assert_eq!(listed, vec![("p".to_string(), PipelineState::Created)]);
    }

    #[tokio::test]
    async fn removing_a_pipeline_makes_it_unreachable() {
        let (engine, _rx) = Engine::new(PluginRegistry::new());
        engine.load_pipeline(config("p"), false).await.unwrap();
        engine.remove_pipeline("p").await.unwrap();
        assert!(matches!(engine.get_metrics("p").await, Err(LogFlowError::PipelineNotFound(_))));
    }
}
