use mcs_proto::MibErrorMask;
use thiserror::Error;

/// Errors from the keyed store and its value codecs.
#[derive(Debug, Error)]
pub enum MibError {
    #[error("Cannot open MIB store {path}: {source}")]
    CantOpen {
        path: String,
        source: rusqlite::Error,
    },
    #[error("Cannot store MIB entry {label}: {source}")]
    CantStore {
        label: String,
        source: rusqlite::Error,
    },
    #[error("Cannot fetch MIB entry {0}")]
    CantFetch(String),
    #[error("Store query failed: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("Bad type code: {0:?}")]
    BadTypeCode(String),
    #[error("Cannot parse {text:?} as {code}")]
    BadValue { code: String, text: String },
    #[error("Bad init line {line}: {reason}")]
    BadInitLine { line: usize, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MibError {
    /// The diagnostic bit a client reports upstream for this failure.
    pub fn mask_bit(&self) -> MibErrorMask {
        match self {
            MibError::CantOpen { .. } => MibErrorMask::CANT_OPEN,
            MibError::CantStore { .. } => MibErrorMask::CANT_STORE,
            MibError::CantFetch(_) => MibErrorMask::CANT_FETCH,
            _ => MibErrorMask::OTHER,
        }
    }
}

pub type MibResult<T> = Result<T, MibError>;
