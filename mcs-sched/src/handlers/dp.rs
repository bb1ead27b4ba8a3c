//! Digital processor MIB handler.
//!
//! DP commands configure live hardware only; their outbound DATA fields have
//! no counterpart in the MIB, so accepted responses update nothing here.
//! (RPT responses are handled generically upstream, with DP's raw binary
//! payloads preserved via the significant-byte count.)

use mcs_mib::MibStore;
use mcs_proto::{CommandId, MibErrorMask};

pub(super) fn update(_store: &MibStore, command: CommandId, _cmdata: &str) -> MibErrorMask {
    match command {
        CommandId::Tbw
        | CommandId::Tbn
        | CommandId::Drx
        | CommandId::Bam
        | CommandId::Fst
        | CommandId::Clk
        | CommandId::Ini => MibErrorMask::empty(),
        _ => MibErrorMask::SID_CID_MISMATCH,
    }
}
