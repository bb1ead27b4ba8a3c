//! # MCS Management Information Base
//!
//! The per-subsystem keyed store of operational state: one SQLite file per
//! subsystem mapping ASCII labels to typed, timestamped records. Each store
//! has exactly one writer (the subsystem's client process) and any number of
//! read-only viewers.
//!
//! The typed value codecs (`NUL`, `a####`, `r####`, `i1u`, `i2u`, `i4u`,
//! `f4`) and the text-file initializer live here as well.

pub mod error;
pub mod init;
pub mod record;
pub mod schema;
pub mod store;
pub mod typecode;

pub use error::MibError;
pub use init::{dump, init_from_text};
pub use record::{MibKind, MibRecord, INDEX_FIELD_LEN, LABEL_FIELD_LEN, VALUE_FIELD_LEN};
pub use store::MibStore;
pub use typecode::TypeCode;

/// True for labels the scheduler reserves for its own bookkeeping; their
/// RPT responses are always printable text, never subsystem-raw payloads.
pub fn is_reserved_label(label: &str) -> bool {
    matches!(
        label,
        "SUMMARY" | "INFO" | "LASTLOG" | "SUBSYSTEM" | "SERIALNO" | "VERSION"
    )
}
