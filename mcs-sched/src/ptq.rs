//! A client's pending-task queue.
//!
//! Remembers the outbound DATA field and send time of every command shipped
//! to the subsystem, keyed by reference, so responses can be matched back to
//! what was asked and silent subsystems can be timed out. A slot is free iff
//! its reference is 0.

use std::time::{Duration, Instant};

use mcs_proto::{CommandId, DATA_FIELD_LEN};

/// The remembered outbound DATA of a pending command.
#[derive(Debug, Clone)]
pub struct PendingData {
    pub data: [u8; DATA_FIELD_LEN],
    pub data_len: i16,
}

impl PendingData {
    /// The stored DATA as a string; for RPT commands this is the MIB label
    /// that was asked for.
    pub fn as_str(&self) -> String {
        let end = if self.data_len < 0 {
            self.data
                .iter()
                .position(|&b| b == 0)
                .unwrap_or(DATA_FIELD_LEN)
        } else {
            (self.data_len as usize).min(DATA_FIELD_LEN)
        };
        String::from_utf8_lossy(&self.data[..end]).into_owned()
    }
}

#[derive(Debug, Clone)]
struct PendingSlot {
    reference: u32,
    command: CommandId,
    sent_at: Instant,
    data: PendingData,
}

#[derive(Debug)]
pub struct PendingTaskQueue {
    slots: Vec<Option<PendingSlot>>,
    cursor: usize,
}

impl PendingTaskQueue {
    pub fn new(capacity: usize) -> PendingTaskQueue {
        PendingTaskQueue {
            slots: (0..capacity).map(|_| None).collect(),
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Records a just-sent command. Returns false when every slot is taken;
    /// the command was still sent, it just cannot be tracked.
    pub fn claim(
        &mut self,
        reference: u32,
        command: CommandId,
        sent_at: Instant,
        data: [u8; DATA_FIELD_LEN],
        data_len: i16,
    ) -> bool {
        let cap = self.slots.len();
        for step in 0..cap {
            let idx = (self.cursor + step) % cap;
            if self.slots[idx].is_none() {
                self.slots[idx] = Some(PendingSlot {
                    reference,
                    command,
                    sent_at,
                    data: PendingData { data, data_len },
                });
                self.cursor = (idx + 1) % cap;
                return true;
            }
        }
        false
    }

    /// Matches a response reference, freeing the slot and recovering the
    /// stored outbound data. Reference 0 never matches.
    pub fn take(&mut self, reference: u32) -> Option<PendingData> {
        if reference == 0 {
            return None;
        }
        let idx = self
            .slots
            .iter()
            .position(|s| matches!(s, Some(slot) if slot.reference == reference))?;
        self.slots[idx].take().map(|s| s.data)
    }

    /// Frees every slot older than `timeout`, returning the timed-out
    /// references with the command type each one carried.
    pub fn age_out(&mut self, now: Instant, timeout: Duration) -> Vec<(u32, CommandId)> {
        let mut timed_out = Vec::new();
        for slot in self.slots.iter_mut() {
            let stale = matches!(
                slot,
                Some(s) if now.saturating_duration_since(s.sent_at) >= timeout
            );
            if stale {
                if let Some(taken) = slot.take() {
                    timed_out.push((taken.reference, taken.command));
                }
            }
        }
        timed_out
    }
}
