// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The concrete [`EventEmitter`] a running pipeline hands to each source
//! task: a [`BoundedQueue`] plus the pipeline's configured overflow policy.
//! This is the seam that keeps `logflow-domain` free of any `tokio`
//! dependency — sources only ever see the trait.

use std::sync::Arc;

use async_trait::async_trait;
use logflow_domain::entities::PipelineMetrics;
use logflow_domain::{EmitOutcome, EventEmitter, LogEvent, OverflowPolicy};

use super::queue::{BoundedQueue, Offer};

pub struct ChannelEventEmitter {
    queue: Arc<BoundedQueue<LogEvent>>,
    policy: OverflowPolicy,
    metrics: Arc<PipelineMetrics>,
}

impl ChannelEventEmitter {
    pub fn new(queue: Arc<BoundedQueue<LogEvent>>, policy: OverflowPolicy, metrics: Arc<PipelineMetrics>) -> Self {
        Self { queue, policy, metrics }
    }
}

#[async_trait]
impl EventEmitter for ChannelEventEmitter {
    async fn emit(&self, event: LogEvent) -> EmitOutcome {
        match self.policy {
            OverflowPolicy::Block => {
                self.queue.push_block(event).await;
                EmitOutcome::Accepted
            }
            OverflowPolicy::DropOldest => match self.queue.push_drop_oldest(event) {
                Offer::Accepted => EmitOutcome::Accepted,
                Offer::AcceptedEvicting(_evicted) => {
                    self.metrics.record_dropped(1);
                    EmitOutcome::Accepted
                }
                Offer::Rejected(_) => unreachable!("drop_oldest never rejects"),
            },
            OverflowPolicy::DropNew => match self.queue.push_drop_new(event) {
                Offer::Accepted => EmitOutcome::Accepted,
                Offer::Rejected(_rejected) => {
                    self.metrics.record_dropped(1);
                    EmitOutcome::QueueFull
                }
                Offer::AcceptedEvicting(_) => unreachable!("drop_new never evicts"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> Arc<PipelineMetrics> {
        Arc::new(PipelineMetrics::new())
    }

    #[tokio::test]
    async fn drop_new_reports_queue_full_and_counts_a_drop() {
        let queue = Arc::new(BoundedQueue::new(1));
        let metrics = metrics();
        let emitter = ChannelEventEmitter::new(queue, OverflowPolicy::DropNew, metrics.clone());

        assert!(matches!(emitter.emit(LogEvent::new("s", "a")).await, EmitOutcome::Accepted));
        assert!(matches!(emitter.emit(LogEvent::new("s", "b")).await, EmitOutcome::QueueFull));
        assert_eq!(metrics.events_dropped(), 1);
    }

    #[tokio::test]
    async fn drop_oldest_is_reported_as_accepted_but_still_counts_a_drop() {
        let queue = Arc::new(BoundedQueue::new(1));
        let metrics = metrics();
        let emitter = ChannelEventEmitter::new(queue, OverflowPolicy::DropOldest, metrics.clone());

        assert!(matches!(emitter.emit(LogEvent::new("s", "a")).await, EmitOutcome::Accepted));
        assert!(matches!(emitter.emit(LogEvent::new("s", "b")).await, EmitOutcome::Accepted));
        assert_eq!(metrics.events_dropped(), 1);
    }

    #[tokio::test]
    async fn block_always_reports_accepted() {
        let queue = Arc::new(BoundedQueue::new(1));
        let metrics = metrics();
        let emitter = ChannelEventEmitter::new(queue.clone(), OverflowPolicy::Block, metrics);

        assert!(matches!(emitter.emit(LogEvent::new("s", "a")).await, EmitOutcome::Accepted));
        assert_eq!(queue.pop().await.map(|e| e.raw_data), Some("a".to_string()));
    }
}
