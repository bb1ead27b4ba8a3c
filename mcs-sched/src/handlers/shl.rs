//! Shelter controller MIB handler.
//!
//! For INI, SET-POINT and DIFFERENTIAL are updated but there is no local
//! record of which racks came up: only the shelter knows how many ports
//! each rack has, so the rack flags have no MIB counterpart.

use mcs_mib::MibStore;
use mcs_proto::{CommandId, MibErrorMask};

use super::write_text;

pub(super) fn update(store: &MibStore, command: CommandId, cmdata: &str) -> MibErrorMask {
    match command {
        CommandId::Ini => {
            // DATA is SET-POINT&DIFFERENTIAL&rack-flags.
            let mut parts = cmdata.split('&');
            let set_point = parts.next().unwrap_or("");
            let differential = parts.next().unwrap_or("");
            if set_point.is_empty() || differential.is_empty() {
                return MibErrorMask::OTHER;
            }
            let mut mask = write_text(store, "SET-POINT", trunc(set_point, 5));
            mask |= write_text(store, "DIFFERENTIAL", trunc(differential, 3));
            mask
        }
        CommandId::Tmp => write_text(store, "SET-POINT", trunc(cmdata, 5)),
        CommandId::Dif => write_text(store, "DIFFERENTIAL", trunc(cmdata, 3)),
        CommandId::Pwr => {
            // DATA is rack(1) port(2) state(3), e.g. "612OFF".
            let (Some(rack), Some(port), Some(state)) = (
                field(cmdata, 0..1).and_then(|s| s.parse::<u8>().ok()),
                field(cmdata, 1..3).and_then(|s| s.trim().parse::<u8>().ok()),
                field(cmdata, 3..6),
            ) else {
                return MibErrorMask::OTHER;
            };
            write_text(store, &format!("PWR-R{rack}-{port}"), state.trim_end())
        }
        _ => MibErrorMask::SID_CID_MISMATCH,
    }
}

fn trunc(s: &str, max: usize) -> &str {
    s.get(..max).unwrap_or(s)
}

fn field(s: &str, range: std::ops::Range<usize>) -> Option<&str> {
    s.get(range)
}
