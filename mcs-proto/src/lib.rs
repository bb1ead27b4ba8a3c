//! # MCS Protocol
//!
//! Shared protocol types for the Monitor & Control Scheduler: subsystem and
//! command registries, the command envelope carried end-to-end, the packed
//! ASCII frame exchanged with subsystems over UDP, and the MJD/MPM time
//! representation used on the wire.
//!
//! Everything in this crate is sans-IO and deterministic: codecs work on
//! fixed-size buffers and the only clock access goes through the [`Clock`]
//! trait, so protocol behavior can be tested without sockets or wall time.

pub mod command;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod state;
pub mod subsystem;
pub mod time;

pub use command::CommandId;
pub use envelope::{Envelope, DATA_FIELD_LEN, ENVELOPE_WIRE_LEN, MAX_REFERENCE};
pub use error::ProtoError;
pub use frame::{CommandFrame, ResponseFrame, ResponseKind, FRAME_HEADER_LEN, MAX_FRAME_LEN};
pub use state::{MibErrorMask, Progress, Summary};
pub use subsystem::SubsystemId;
pub use time::{Clock, ManualClock, SystemClock, Timestamp};
