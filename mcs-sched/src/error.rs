use mcs_proto::SubsystemId;
use thiserror::Error;

/// Errors from the scheduler fabric.
#[derive(Debug, Error)]
pub enum SchedError {
    #[error("Protocol error: {0}")]
    Proto(#[from] mcs_proto::ProtoError),
    #[error("MIB error: {0}")]
    Mib(#[from] mcs_mib::MibError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Bus for {0} is full")]
    BusFull(SubsystemId),
    #[error("Bus for {0} is closed")]
    BusClosed(SubsystemId),
    #[error("Task ring is full")]
    RingFull,
    #[error("MIB for {sid} has no usable {label} entry")]
    MissingEndpoint {
        sid: SubsystemId,
        label: &'static str,
    },
    #[error("Init script line {line}: {reason}")]
    BadScript { line: usize, reason: String },
    #[error("No liveness reply from {0} during startup")]
    HandshakeTimeout(SubsystemId),
    #[error("Config invalid: {0}")]
    BadConfig(&'static str),
}

pub type SchedResult<T> = Result<T, SchedError>;
