// /////////////////////////////////////////////////////////////////////////////
// LogFlow
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! An ordered group of [`LogEvent`]s handed to every sink together.

use std::sync::Arc;

use super::log_event::LogEvent;

/// A batch carries only events from one pipeline; ordering within a batch
/// reflects processor emission order. Every completed batch is offered to
/// every sink; sinks share it read-only (`Arc`) and must clone if they need
/// to mutate.
#[derive(Debug, Clone)]
pub struct Batch {
    events: Arc<Vec<LogEvent>>,
}

impl Batch {
    /// Panics in debug builds via the invariant check below would be too
    /// strict for a constructor; `new` accepts any non-empty vec and leaves
    /// the `1 <= len <= batch_size` bound to the batcher that builds it.
    pub fn new(events: Vec<LogEvent>) -> Self {
        Self { events: Arc::new(events) }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }
}

impl IntoIterator for Batch {
    type Item = LogEvent;
    type IntoIter = std::vec::IntoIter<LogEvent>;

    fn into_iter(self) -> Self::IntoIter {
        match Arc::try_unwrap(self.events) {
            Ok(events) => events.into_iter(),
            Err(shared) => shared.as_ref().clone().into_iter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_preserves_emission_order() {
        let events = vec![LogEvent::new("a", "1"), LogEvent::new("a", "2")];
        let batch = Batch::new(events);
        assert_eq!(batch.events()[0].raw_data, "1");
        assert_eq!(batch.events()[1].raw_data, "2");
    }

    #[test]
    fn clones_are_cheap_and_share_storage() {
        let batch = Batch::new(vec![LogEvent::new("a", "1")]);
        let clone = batch.clone();
        assert_eq!(batch.len(), clone.len());
    }
}
