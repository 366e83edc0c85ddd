// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The concurrent data path for a single pipeline: source tasks feeding an
//! ingest queue, a processor driver (optionally fanned out to several
//! workers) feeding an out queue, a batcher building batches from `out`,
//! and one task per sink.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use logflow_domain::repositories::PluginRegistry;
use logflow_domain::{
    Batch, LogEvent, LogFlowError, OverflowPolicy, PipelineConfig, PipelineMetrics, PipelineMetricsSnapshot, PipelineState, Processor, Sink,
};
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::cancellation::CancellationToken;
use super::emitter::ChannelEventEmitter;
use super::queue::{BoundedQueue, Offer};

const STOP_GRACE: Duration = Duration::from_secs(30);
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_BASE: Duration = Duration::from_millis(500);
const RETRY_CAP: Duration = Duration::from_secs(30);
const RETRY_MAX_ATTEMPTS: u32 = 5;

/// A single pipeline's live state and the join handles for its tasks.
/// Owned by the [`Engine`](crate::application::engine::Engine)'s registry.
pub struct PipelineRuntime {
    pub config: PipelineConfig,
    pub metrics: Arc<PipelineMetrics>,
    state: Arc<RwLock<PipelineState>>,
    failure_reason: Arc<RwLock<Option<String>>>,
    sink_write_errors: Arc<RwLock<HashMap<String, u64>>>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl PipelineRuntime {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(PipelineMetrics::new()),
            state: Arc::new(RwLock::new(PipelineState::Created)),
            failure_reason: Arc::new(RwLock::new(None)),
            sink_write_errors: Arc::new(RwLock::new(HashMap::new())),
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
        }
    }

    pub fn state(&self) -> PipelineState {
        *self.state.read()
    }

    pub fn failure_reason(&self) -> Option<String> {
        self.failure_reason.read().clone()
    }

    fn transition(&self, next: PipelineState) -> Result<(), LogFlowError> {
        let mut state = self.state.write();
        if !state.can_transition_to(next) {
            return Err(LogFlowError::internal(format!("illegal pipeline transition {} -> {}", *state, next)));
        }
        *state = next;
        Ok(())
    }

    fn fail(&self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(pipeline = %self.config.name, reason = %reason, "pipeline failed");
        *self.failure_reason.write() = Some(reason);
        *self.state.write() = PipelineState::Failed;
    }

    pub fn metrics_snapshot(&self) -> PipelineMetricsSnapshot {
        self.metrics.snapshot(
            self.state(),
            self.config.sources.len(),
            self.config.processors.len(),
            self.config.sinks.len(),
            self.sink_write_errors.read().clone(),
            self.failure_reason(),
        )
    }

    /// Runs the documented start sequence: open sinks, open processors,
    /// open sources, start sink tasks, start the batcher, start the
    /// processor driver, start the sources. On any open failure the
    /// pipeline transitions to `failed` and the error is returned.
    pub async fn start(&mut self, registry: &PluginRegistry) -> Result<(), LogFlowError> {
        if self.state() == PipelineState::Running {
            return Ok(());
        }
        self.transition(PipelineState::Starting)?;

        let result = self.start_inner(registry).await;
        match result {
            Ok(()) => {
                self.transition(PipelineState::Running)?;
                info!(pipeline = %self.config.name, "pipeline running");
                Ok(())
            }
            Err(err) => {
                self.fail(err.to_string());
                Err(err)
            }
        }
    }

    async fn start_inner(&mut self, registry: &PluginRegistry) -> Result<(), LogFlowError> {
        let mut sinks = Vec::new();
        for plugin in &self.config.sinks {
            let mut sink = registry.build_sink(plugin)?;
            sink.open(plugin).await?;
            sinks.push((plugin.name.clone(), sink));
        }

        let mut processors = Vec::new();
        for plugin in &self.config.processors {
            let mut processor = registry.build_processor(plugin)?;
            processor.open(plugin)?;
            processors.push(Arc::from(processor));
        }
        let processors: Arc<Vec<Arc<dyn Processor>>> = Arc::new(processors);

        let mut sources = Vec::new();
        for plugin in &self.config.sources {
            let mut source = registry.build_source(plugin)?;
            source.open(plugin).await?;
            sources.push(source);
        }

        let batch_size = self.config.batch_size.value();
        let ingest_queue = Arc::new(BoundedQueue::<LogEvent>::new(
            logflow_domain::QueueCapacity::ingest_default(self.config.batch_size).value(),
        ));
        let out_queue = Arc::new(BoundedQueue::<LogEvent>::new(
            logflow_domain::QueueCapacity::out_default(self.config.batch_size).value(),
        ));

        let mut sink_queues = Vec::with_capacity(sinks.len());
        for (name, _) in &sinks {
            sink_queues.push((name.clone(), Arc::new(BoundedQueue::<Batch>::new(logflow_domain::QueueCapacity::sink_default().value()))));
        }

        // Sink tasks.
        for ((sink_name, sink), (_, queue)) in sinks.into_iter().zip(sink_queues.iter()) {
            let queue = queue.clone();
            let metrics = self.metrics.clone();
            let sink_write_errors = self.sink_write_errors.clone();
            let cancel = self.cancel.clone();
            let name = self.config.name.clone();
            self.tasks.push(tokio::spawn(run_sink_task(sink_name, sink, queue, metrics, sink_write_errors, cancel, name)));
        }

        // Batcher task.
        {
            let out_queue = out_queue.clone();
            let sink_queues: Vec<_> = sink_queues.iter().map(|(_, q)| q.clone()).collect();
            let batch_timeout = self.config.batch_timeout.as_duration();
            let overflow_policy = self.config.overflow_policy;
            let metrics = self.metrics.clone();
            self.tasks.push(tokio::spawn(run_batcher_task(out_queue, sink_queues, batch_size, batch_timeout, overflow_policy, metrics)));
        }

        // Processor driver (optionally fanned out to W workers). Each worker
        // races `ingest_queue.pop()` against cancellation so a `stop()` call
        // doesn't have to wait for the queue to drain or close on its own.
        let worker_count = self.config.worker_count.value();
        for _ in 0..worker_count {
            let ingest_queue = ingest_queue.clone();
            let out_queue = out_queue.clone();
            let processors = processors.clone();
            let metrics = self.metrics.clone();
            let cancel = self.cancel.clone();
            self.tasks.push(tokio::spawn(run_processor_task(ingest_queue, out_queue, processors, metrics, cancel)));
        }

        // Source tasks. The ingest queue policy is always `Block`: per-source
        // overflow policies are not modeled separately in this
        // implementation, only the sink-facing policy is configurable.
        //
        // Each task races `source.start()` against cancellation rather than
        // just awaiting it to completion: `start()` only returns on its own
        // once the source reaches EOF (or, for `follow`-mode/stdin sources,
        // potentially never), so without the race a `stop()` call would
        // never see these tasks finish. Losing the race drops the `start()`
        // future — ending its in-flight read at the current await point —
        // and then calls `Source::stop()` for a clean release. Once every
        // source task has exited, the last one closes `ingest_queue` so the
        // processor workers and any concurrent drain-to-EOF both converge.
        let ingest_policy = OverflowPolicy::Block;
        let remaining_sources = Arc::new(std::sync::atomic::AtomicUsize::new(sources.len()));
        for mut source in sources {
            let emitter = Arc::new(ChannelEventEmitter::new(ingest_queue.clone(), ingest_policy, self.metrics.clone()));
            let name = self.config.name.clone();
            let cancel = self.cancel.clone();
            let ingest_queue = ingest_queue.clone();
            let remaining_sources = remaining_sources.clone();
            self.tasks.push(tokio::spawn(async move {
                tokio::select! {
                    result = source.start(emitter) => {
                        if let Err(err) = result {
                            warn!(pipeline = %name, error = %err, "source task ended with an error");
                        }
                    }
                    _ = cancel.cancelled() => {
                        if let Err(err) = source.stop().await {
                            warn!(pipeline = %name, error = %err, "source stop failed");
                        }
                    }
                }
                if remaining_sources.fetch_sub(1, std::sync::atomic::Ordering::SeqCst) == 1 {
                    ingest_queue.close();
                }
            }));
        }

        Ok(())
    }

    /// Runs the reversed stop sequence with a `stop_grace` deadline per
    /// stage; a stage that doesn't return in time is force-released and the
    /// pipeline transitions to `failed` instead of `stopped`.
    pub async fn stop(&mut self) -> Result<(), LogFlowError> {
        if matches!(self.state(), PipelineState::Stopped | PipelineState::Created | PipelineState::Failed) {
            return Ok(());
        }
        self.transition(PipelineState::Stopping)?;
        self.cancel.cancel();

        for task in self.tasks.drain(..) {
            if tokio::time::timeout(STOP_GRACE, task).await.is_err() {
                self.fail("stop_grace exceeded waiting for a pipeline task");
                return Err(LogFlowError::internal("stop_grace exceeded"));
            }
        }

        self.transition(PipelineState::Stopped)?;
        info!(pipeline = %self.config.name, "pipeline stopped");
        Ok(())
    }
}

async fn run_processor_task(
    ingest_queue: Arc<BoundedQueue<LogEvent>>,
    out_queue: Arc<BoundedQueue<LogEvent>>,
    processors: Arc<Vec<Arc<dyn Processor>>>,
    metrics: Arc<PipelineMetrics>,
    cancel: CancellationToken,
) {
    loop {
        let popped = tokio::select! {
            popped = ingest_queue.pop() => popped,
            _ = cancel.cancelled() => None,
        };
        let Some(event) = popped else { break };

        let mut pending = vec![event];
        for processor in processors.iter() {
            let mut next = Vec::with_capacity(pending.len());
            for event in pending {
                match processor.process(event) {
                    Ok(events) => next.extend(events),
                    Err(err) => {
                        metrics.record_error();
                        warn!(error = %err, "processor error, event dropped");
                    }
                }
            }
            pending = next;
        }
        for event in pending {
            out_queue.push_block(event).await;
        }
    }
    out_queue.close();
}

async fn run_batcher_task(
    out_queue: Arc<BoundedQueue<LogEvent>>,
    sink_queues: Vec<Arc<BoundedQueue<Batch>>>,
    batch_size: usize,
    batch_timeout: Duration,
    overflow_policy: OverflowPolicy,
    metrics: Arc<PipelineMetrics>,
) {
    let mut current: Vec<LogEvent> = Vec::with_capacity(batch_size);
    loop {
        let deadline = tokio::time::sleep(batch_timeout);
        tokio::pin!(deadline);

        tokio::select! {
            popped = out_queue.pop() => {
                match popped {
                    Some(event) => {
                        current.push(event);
                        if current.len() >= batch_size {
                            flush_batch(&mut current, &sink_queues, overflow_policy, &metrics).await;
                        }
                    }
                    None => {
                        flush_batch(&mut current, &sink_queues, overflow_policy, &metrics).await;
                        for queue in &sink_queues {
                            queue.close();
                        }
                        return;
                    }
                }
            }
            _ = &mut deadline => {
                flush_batch(&mut current, &sink_queues, overflow_policy, &metrics).await;
            }
        }
    }
}

async fn flush_batch(
    current: &mut Vec<LogEvent>,
    sink_queues: &[Arc<BoundedQueue<Batch>>],
    overflow_policy: OverflowPolicy,
    metrics: &Arc<PipelineMetrics>,
) {
    if current.is_empty() {
        return;
    }
    let batch = Batch::new(std::mem::take(current));
    for queue in sink_queues {
        match overflow_policy {
            OverflowPolicy::Block => queue.push_block(batch.clone()).await,
            OverflowPolicy::DropOldest => match queue.push_drop_oldest(batch.clone()) {
                Offer::AcceptedEvicting(evicted) => metrics.record_dropped(evicted.len() as u64),
                Offer::Accepted => {}
                Offer::Rejected(_) => unreachable!(),
            },
            OverflowPolicy::DropNew => match queue.push_drop_new(batch.clone()) {
                Offer::Rejected(rejected) => metrics.record_dropped(rejected.len() as u64),
                Offer::Accepted => {}
                Offer::AcceptedEvicting(_) => unreachable!(),
            },
        }
    }
}

async fn run_sink_task(
    sink_name: String,
    mut sink: Box<dyn Sink>,
    queue: Arc<BoundedQueue<Batch>>,
    metrics: Arc<PipelineMetrics>,
    sink_write_errors: Arc<RwLock<HashMap<String, u64>>>,
    cancel: CancellationToken,
    pipeline_name: String,
) {
    while let Some(batch) = queue.pop().await {
        let batch_len = batch.len() as u64;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let outcome = tokio::time::timeout(WRITE_TIMEOUT, sink.write(batch.clone())).await;
            let result = match outcome {
                Ok(inner) => inner,
                Err(_) => Err(LogFlowError::TimeoutError(format!("sink '{}' write timed out", sink_name))),
            };

            match result {
                Ok(()) => {
                    metrics.record_processed(batch_len);
                    break;
                }
                Err(err) if err.is_fatal_to_pipeline() => {
                    *sink_write_errors.write().entry(sink_name.clone()).or_insert(0) += 1;
                    warn!(pipeline = %pipeline_name, sink = %sink_name, error = %err, "sink failed fatally");
                    metrics.record_dropped(batch_len);
                    cancel.cancel();
                    return;
                }
                Err(err) if err.is_recoverable() && attempt < RETRY_MAX_ATTEMPTS => {
                    *sink_write_errors.write().entry(sink_name.clone()).or_insert(0) += 1;
                    let backoff = (RETRY_BASE * 2u32.pow(attempt - 1)).min(RETRY_CAP);
                    warn!(pipeline = %pipeline_name, sink = %sink_name, attempt, error = %err, "sink write retrying");
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => {
                    *sink_write_errors.write().entry(sink_name.clone()).or_insert(0) += 1;
                    warn!(pipeline = %pipeline_name, sink = %sink_name, error = %err, "sink write exhausted retries, batch dropped");
                    metrics.record_dropped(batch_len);
                    break;
                }
            }
        }
    }

    let _ = sink.flush().await;
    let _ = sink.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use logflow_domain::PluginConfig;
    use serde_json::json;

    fn config() -> PipelineConfig {
        PipelineConfig::new(
            "test",
            vec![PluginConfig::new("stdin", json!({}))],
            vec![PluginConfig::new("stdout", json!({}))],
        )
    }

    #[test]
    fn new_pipeline_starts_in_created_state() {
        let runtime = PipelineRuntime::new(config());
        assert_eq!(runtime.state(), PipelineState::Created);
        assert!(runtime.failure_reason().is_none());
    }

    #[tokio::test]
    async fn stop_before_start_is_a_no_op() {
        let mut runtime = PipelineRuntime::new(config());
        runtime.stop().await.unwrap();
        assert_eq!(runtime.state(), PipelineState::Created);
    }

    #[tokio::test]
    async fn stop_after_start_reaches_stopped_well_within_the_grace_period() {
        let mut runtime = PipelineRuntime::new(config());
        let registry = crate::infrastructure::registry::build_default_registry();
        runtime.start(&registry).await.unwrap();
        assert_eq!(runtime.state(), PipelineState::Running);

        // The stdin source never returns from `start()` on its own in a
        // test process; if `stop()` doesn't actively cancel it, this would
        // hang until `STOP_GRACE` and then fail the pipeline instead of
        // stopping it.
        let stopped = tokio::time::timeout(Duration::from_secs(5), runtime.stop()).await;
        assert!(stopped.is_ok(), "stop() did not return well within the grace period");
        stopped.unwrap().unwrap();
        assert_eq!(runtime.state(), PipelineState::Stopped);
    }

    #[tokio::test]
    async fn stop_after_stop_is_a_no_op() {
        let mut runtime = PipelineRuntime::new(config());
        let registry = crate::infrastructure::registry::build_default_registry();
        runtime.start(&registry).await.unwrap();
        runtime.stop().await.unwrap();
        assert_eq!(runtime.state(), PipelineState::Stopped);
        runtime.stop().await.unwrap();
        assert_eq!(runtime.state(), PipelineState::Stopped);
    }

    #[tokio::test]
    async fn unknown_plugin_type_fails_start_and_marks_the_pipeline_failed() {
        let mut runtime = PipelineRuntime::new(PipelineConfig::new(
            "bad",
            vec![PluginConfig::new("nonexistent", json!({}))],
            vec![PluginConfig::new("stdout", json!({}))],
        ));
        let registry = PluginRegistry::new();
        assert!(runtime.start(&registry).await.is_err());
        assert_eq!(runtime.state(), PipelineState::Failed);
        assert!(runtime.failure_reason().is_some());
    }
}
