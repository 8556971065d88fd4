//! Event reduction
//!
//! Two passes over the classified events, in order:
//!
//! 1. Drop event types that are classified but never displayed
//!    (`discardDraft`).
//! 2. Merge runs of edits. Scanning left to right with one event of
//!    lookahead, an `edited` event is absorbed into the following event when
//!    that one is also `edited`, covers the same `documentIDs`, and ends less
//!    than the merge window after it. Absorbed events are not emitted.

use chrono::Duration;

use super::event::{EventType, HistoryEvent};

/// Collapses classified events into the displayed timeline
pub struct EventReducer {
    window: Duration,
}

impl EventReducer {
    /// Create a reducer merging edits closer than `window`
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Run both passes
    pub fn reduce(&self, events: Vec<HistoryEvent>) -> Vec<HistoryEvent> {
        self.merge_edits(Self::drop_hidden(events))
    }

    /// Remove events whose type is never displayed
    pub fn drop_hidden(mut events: Vec<HistoryEvent>) -> Vec<HistoryEvent> {
        events.retain(|event| event.event_type.is_displayed());
        events
    }

    /// Merge adjacent edits within the window
    pub fn merge_edits(&self, events: Vec<HistoryEvent>) -> Vec<HistoryEvent> {
        let mut reduced = Vec::with_capacity(events.len());
        let mut iter = events.into_iter().peekable();

        while let Some(current) = iter.next() {
            if let Some(next) = iter.peek_mut() {
                if self.should_merge(&current, next) {
                    let merged = next.clone().absorb(&current);
                    *next = merged;
                    continue;
                }
            }
            reduced.push(current);
        }

        reduced
    }

    fn should_merge(&self, current: &HistoryEvent, next: &HistoryEvent) -> bool {
        current.event_type == EventType::Edited
            && next.event_type == EventType::Edited
            && next.end_time - current.end_time < self.window
            && current.document_ids == next.document_ids
    }
}
