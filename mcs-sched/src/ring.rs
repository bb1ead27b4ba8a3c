//! The executive's fixed-capacity task ring.
//!
//! Slots hold an envelope plus its progress; a slot is available iff its
//! progress is `Avail`. Insertion scans from the first-available cursor;
//! dispatch advances a separate circular cursor to the next `Queued` slot.
//! Reference numbers are not slot indices: responses are correlated to
//! slots by reference match, and at most one live slot carries a given
//! reference at a time.

use std::time::{Duration, Instant};

use mcs_proto::{Envelope, Progress};

/// A live (non-available) ring slot.
#[derive(Debug, Clone)]
pub struct TaskSlot {
    pub envelope: Envelope,
    pub progress: Progress,
    pub sent_at: Option<Instant>,
}

#[derive(Debug)]
pub struct TaskRing {
    slots: Vec<Option<TaskSlot>>,
    insert_cursor: usize,
    dispatch_cursor: usize,
}

impl TaskRing {
    pub fn new(capacity: usize) -> TaskRing {
        TaskRing {
            slots: (0..capacity).map(|_| None).collect(),
            insert_cursor: 0,
            dispatch_cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of non-available slots.
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True when every slot is available; gates the shutdown transition.
    pub fn is_idle(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    pub fn contains_reference(&self, reference: u32) -> bool {
        reference != 0
            && self
                .slots
                .iter()
                .flatten()
                .any(|s| s.envelope.reference == reference)
    }

    /// Queues an envelope into the first available slot, scanning from the
    /// insertion cursor. `None` when the ring is full.
    pub fn insert(&mut self, envelope: Envelope) -> Option<usize> {
        let cap = self.slots.len();
        for step in 0..cap {
            let idx = (self.insert_cursor + step) % cap;
            if self.slots[idx].is_none() {
                self.slots[idx] = Some(TaskSlot {
                    envelope,
                    progress: Progress::Queued,
                    sent_at: None,
                });
                self.insert_cursor = (idx + 1) % cap;
                return Some(idx);
            }
        }
        None
    }

    /// Advances the circular dispatch cursor until it lands on a `Queued`
    /// slot, stopping when back at its starting point.
    pub fn dispatch_next(&mut self) -> Option<usize> {
        let cap = self.slots.len();
        let stop = self.dispatch_cursor;
        loop {
            self.dispatch_cursor = (self.dispatch_cursor + 1) % cap;
            if let Some(slot) = &self.slots[self.dispatch_cursor] {
                if slot.progress == Progress::Queued {
                    return Some(self.dispatch_cursor);
                }
            }
            if self.dispatch_cursor == stop {
                return None;
            }
        }
    }

    pub fn get(&self, idx: usize) -> Option<&TaskSlot> {
        self.slots.get(idx).and_then(|s| s.as_ref())
    }

    pub fn mark_sent(&mut self, idx: usize, now: Instant) {
        if let Some(slot) = self.slots.get_mut(idx).and_then(|s| s.as_mut()) {
            slot.progress = Progress::Sent;
            slot.sent_at = Some(now);
        }
    }

    /// Frees a slot, returning it to `Avail`.
    pub fn release(&mut self, idx: usize) -> Option<TaskSlot> {
        self.slots.get_mut(idx).and_then(|s| s.take())
    }

    /// Correlates a response to its slot by reference and frees the slot.
    /// Reference 0 never matches.
    pub fn complete_by_reference(&mut self, reference: u32) -> Option<TaskSlot> {
        if reference == 0 {
            return None;
        }
        let idx = self
            .slots
            .iter()
            .position(|s| matches!(s, Some(slot) if slot.envelope.reference == reference))?;
        self.slots[idx].take()
    }

    /// Frees every `Sent` slot older than `timeout`, returning the aged
    /// envelopes so the caller can log them.
    pub fn age_out(&mut self, now: Instant, timeout: Duration) -> Vec<Envelope> {
        let mut aged = Vec::new();
        for slot in self.slots.iter_mut() {
            let stale = matches!(
                slot,
                Some(TaskSlot {
                    progress: Progress::Sent,
                    sent_at: Some(at),
                    ..
                }) if now.saturating_duration_since(*at) >= timeout
            );
            if stale {
                if let Some(taken) = slot.take() {
                    aged.push(taken.envelope);
                }
            }
        }
        aged
    }
}
