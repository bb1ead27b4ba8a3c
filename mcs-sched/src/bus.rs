//! Typed bounded message bus between the executive and its clients.
//!
//! One central bus collects progress envelopes from every client; each
//! client has its own inbox. Every bus has exactly one reader and any number
//! of writers; sends never block, a full bus is a typed error.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError, TrySendError};
use std::time::Duration;

use mcs_proto::{Envelope, SubsystemId};

use crate::error::{SchedError, SchedResult};

/// Write end of a bus. Cloneable; `owner` names the reader for diagnostics.
#[derive(Debug, Clone)]
pub struct BusTx {
    owner: SubsystemId,
    tx: SyncSender<Envelope>,
}

/// Read end of a bus, held by exactly one loop.
#[derive(Debug)]
pub struct BusRx {
    owner: SubsystemId,
    rx: Receiver<Envelope>,
}

/// Creates a bounded bus owned (read) by `owner`.
pub fn bounded(owner: SubsystemId, depth: usize) -> (BusTx, BusRx) {
    let (tx, rx) = mpsc::sync_channel(depth);
    (BusTx { owner, tx }, BusRx { owner, rx })
}

impl BusTx {
    /// Posts an envelope without blocking.
    pub fn send(&self, env: Envelope) -> SchedResult<()> {
        match self.tx.try_send(env) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SchedError::BusFull(self.owner)),
            Err(TrySendError::Disconnected(_)) => Err(SchedError::BusClosed(self.owner)),
        }
    }

    pub fn owner(&self) -> SubsystemId {
        self.owner
    }
}

impl BusRx {
    /// Non-blocking receive. `Ok(None)` when the bus is empty; an error only
    /// when every writer is gone.
    pub fn try_recv(&self) -> SchedResult<Option<Envelope>> {
        match self.rx.try_recv() {
            Ok(env) => Ok(Some(env)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SchedError::BusClosed(self.owner)),
        }
    }

    /// Blocking receive with a deadline, used only during the startup
    /// handshake.
    pub fn recv_timeout(&self, timeout: Duration) -> SchedResult<Envelope> {
        self.rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => SchedError::HandshakeTimeout(self.owner),
            RecvTimeoutError::Disconnected => SchedError::BusClosed(self.owner),
        })
    }

    pub fn owner(&self) -> SubsystemId {
        self.owner
    }
}
