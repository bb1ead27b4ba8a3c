//! MIB update policy for subsystem responses.
//!
//! `SUMMARY` is written for every parseable response; it reflects the
//! subsystem's current operational state regardless of whether the specific
//! command was accepted. Beyond that, updates happen only for accepted (or
//! unclassifiable-but-done) responses: RPT writes the reported value under
//! the label the command asked for, and everything else goes through the
//! handler table keyed by `(subsystem, command)`.

mod asp;
mod dp;
mod shl;

use mcs_mib::{MibError, MibStore};
use mcs_proto::{CommandId, MibErrorMask, Progress, Summary, SubsystemId};
use tracing::debug;

/// A subsystem's MIB-update handler for commands with subsystem-specific
/// effects (anything other than PNG, RPT, SHT).
pub type Handler = fn(&MibStore, CommandId, &str) -> MibErrorMask;

/// The handler table. Unknown pairs fall through to the default handler,
/// which flags the command as unsupported for that subsystem.
pub fn handler_for(sid: SubsystemId) -> Handler {
    match sid {
        SubsystemId::Shl => shl::update,
        SubsystemId::Asp => asp::update,
        SubsystemId::Dp => dp::update,
        _ => unsupported,
    }
}

fn unsupported(_store: &MibStore, _command: CommandId, _cmdata: &str) -> MibErrorMask {
    // Mock subsystems support only PNG, RPT, and SHT, and the scheduler
    // itself never appears as a response source.
    MibErrorMask::SID_CID_MISMATCH
}

/// Applies one response to the subsystem's MIB. Returns the accumulated
/// error mask; nothing here is fatal.
pub fn apply_response(
    store: &MibStore,
    sid: SubsystemId,
    command: CommandId,
    progress: Progress,
    summary: Summary,
    comment: &[u8],
    comment_len: i16,
    cmdata: &str,
) -> MibErrorMask {
    let mut mask = write_summary(store, summary);

    if !matches!(progress, Progress::Success | Progress::DoneUnknown) {
        return mask;
    }

    match command {
        CommandId::Png | CommandId::Sht => {}
        CommandId::Rpt => {
            mask |= write_value(store, cmdata, comment, comment_len);
        }
        _ => {
            debug!(%sid, %command, "dispatching subsystem MIB handler");
            mask |= handler_for(sid)(store, command, cmdata);
        }
    }
    mask
}

/// Writes the response summary token into the `SUMMARY` entry.
fn write_summary(store: &MibStore, summary: Summary) -> MibErrorMask {
    let mut mask = MibErrorMask::empty();
    match store.fetch("SUMMARY") {
        Ok(mut record) => {
            record.set_text(summary.token());
            if let Err(e) = store.store("SUMMARY", &mut record) {
                mask |= e.mask_bit();
            }
        }
        Err(e) => mask |= e.mask_bit(),
    }
    mask
}

/// Writes a reported value under an existing label; the handler every RPT
/// response uses, and the primitive the subsystem handlers build on.
pub(crate) fn write_value(
    store: &MibStore,
    label: &str,
    value: &[u8],
    value_len: i16,
) -> MibErrorMask {
    let mut mask = MibErrorMask::empty();
    match store.fetch(label) {
        Ok(mut record) => {
            let n = if value_len < 0 {
                value.iter().position(|&b| b == 0).unwrap_or(value.len())
            } else {
                (value_len as usize).min(value.len())
            };
            record.set_bytes(&value[..n]);
            if let Err(e) = store.store(label, &mut record) {
                mask |= e.mask_bit();
            }
        }
        Err(e @ MibError::CantFetch(_)) => {
            debug!(label, "MIB label not found; leaving store untouched");
            mask |= e.mask_bit();
        }
        Err(e) => mask |= e.mask_bit(),
    }
    mask
}

pub(crate) fn write_text(store: &MibStore, label: &str, text: &str) -> MibErrorMask {
    write_value(store, label, text.as_bytes(), text.len() as i16)
}
