// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! A bounded, async-aware queue that can express every overflow policy a
//! pipeline stage hand-off needs: block the producer, drop the oldest
//! queued item to make room, or drop the incoming item outright. `tokio`'s
//! own `mpsc` channel only gives us the first of these, so the ingest,
//! inter-stage, and per-sink queues are built on this instead.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use logflow_domain::OverflowPolicy;
use parking_lot::Mutex;
use tokio::sync::Notify;

pub struct BoundedQueue<T> {
    inner: Mutex<VecDeque<T>>,
    capacity: usize,
    closed: AtomicBool,
    not_empty: Notify,
    not_full: Notify,
}

/// Outcome of a single offer to a [`BoundedQueue`], reported back to the
/// caller so it can update its own drop counters.
pub enum Offer<T> {
    Accepted,
    /// The item was accepted, but the queue was full and this item was
    /// evicted to make room (`drop_oldest` policy).
    AcceptedEvicting(T),
    /// The queue was full and the item was rejected (`drop_new` policy).
    Rejected(T),
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
            closed: AtomicBool::new(false),
            not_empty: Notify::new(),
            not_full: Notify::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Marks the queue closed: pending items are still drained by `pop`,
    /// but once empty, `pop` returns `None` instead of waiting forever.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.not_empty.notify_waiters();
    }

    fn try_push(&self, item: T) -> Result<(), T> {
        let mut guard = self.inner.lock();
        if guard.len() >= self.capacity {
            return Err(item);
        }
        guard.push_back(item);
        Ok(())
    }

    /// Offers `item` under `Block`: waits for room rather than dropping.
    pub async fn push_block(&self, item: T) {
        let mut item = item;
        loop {
            match self.try_push(item) {
                Ok(()) => {
                    self.not_empty.notify_one();
                    return;
                }
                Err(rejected) => {
                    item = rejected;
                    self.not_full.notified().await;
                }
            }
        }
    }

    /// Offers `item` under `DropOldest`: evicts the front of the queue to
    /// make room rather than waiting or rejecting the new item.
    pub fn push_drop_oldest(&self, item: T) -> Offer<T> {
        let mut guard = self.inner.lock();
        if guard.len() >= self.capacity {
            let evicted = guard.pop_front();
            guard.push_back(item);
            drop(guard);
            self.not_empty.notify_one();
            match evicted {
                Some(evicted) => Offer::AcceptedEvicting(evicted),
                None => Offer::Accepted,
            }
        } else {
            guard.push_back(item);
            drop(guard);
            self.not_empty.notify_one();
            Offer::Accepted
        }
    }

    /// Offers `item` under `DropNew`: rejects it outright if the queue is
    /// already full.
    pub fn push_drop_new(&self, item: T) -> Offer<T> {
        match self.try_push(item) {
            Ok(()) => {
                self.not_empty.notify_one();
                Offer::Accepted
            }
            Err(rejected) => Offer::Rejected(rejected),
        }
    }

    pub fn push_with_policy(&self, item: T, policy: OverflowPolicy) -> Offer<T>
    where
        T: Send,
    {
        match policy {
            OverflowPolicy::DropOldest => self.push_drop_oldest(item),
            OverflowPolicy::DropNew => self.push_drop_new(item),
            OverflowPolicy::Block => unreachable!("Block must go through push_block, which needs to await"),
        }
    }

    /// Waits for and removes the front item. Returns `None` only once the
    /// queue has been closed and fully drained.
    pub async fn pop(&self) -> Option<T> {
        loop {
            {
                let mut guard = self.inner.lock();
                if let Some(item) = guard.pop_front() {
                    drop(guard);
                    self.not_full.notify_one();
                    return Some(item);
                }
                if self.closed.load(Ordering::SeqCst) {
                    return None;
                }
            }
            self.not_empty.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn push_block_waits_until_a_slot_frees_up() {
        let queue = std::sync::Arc::new(BoundedQueue::new(1));
        queue.push_block(1).await;

        let q2 = queue.clone();
        let waiter = tokio::spawn(async move {
            q2.push_block(2).await;
        });

        tokio::task::yield_now().await;
        assert_eq!(queue.pop().await, Some(1));
        waiter.await.unwrap();
        assert_eq!(queue.pop().await, Some(2));
    }

    #[test]
    fn drop_oldest_evicts_the_front_item_when_full() {
        let queue = BoundedQueue::new(2);
        assert!(matches!(queue.push_drop_oldest(1), Offer::Accepted));
        assert!(matches!(queue.push_drop_oldest(2), Offer::Accepted));
        match queue.push_drop_oldest(3) {
            Offer::AcceptedEvicting(evicted) => assert_eq!(evicted, 1),
            _ => panic!("expected an eviction"),
        }
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn drop_new_rejects_when_full() {
        let queue = BoundedQueue::new(1);
        assert!(matches!(queue.push_drop_new(1), Offer::Accepted));
        match queue.push_drop_new(2) {
            Offer::Rejected(rejected) => assert_eq!(rejected, 2),
            _ => panic!("expected a rejection"),
        }
    }

    #[tokio::test]
    async fn closed_and_drained_queue_reports_none() {
        let queue = BoundedQueue::new(1);
        queue.push_block(1).await;
        queue.close();
        assert_eq!(queue.pop().await, Some(1));
        assert_eq!(queue.pop().await, None);
    }
}
