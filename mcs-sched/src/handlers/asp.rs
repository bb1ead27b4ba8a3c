//! Analog signal processor MIB handler.

use mcs_mib::MibStore;
use mcs_proto::{CommandId, MibErrorMask};

use super::write_text;

/// Number of antenna stands; a stand field of 0 means "apply to all".
const NUM_STANDS: u16 = 260;

pub(super) fn update(store: &MibStore, command: CommandId, cmdata: &str) -> MibErrorMask {
    match command {
        CommandId::Ini => {
            let Ok(boards) = cmdata.trim().parse::<u8>() else {
                return MibErrorMask::OTHER;
            };
            write_text(store, "N-BOARDS", &format!("{boards:02}"))
        }
        CommandId::Fil => per_stand(store, cmdata, "FILTER"),
        CommandId::At1 => per_stand(store, cmdata, "AT1"),
        CommandId::At2 => per_stand(store, cmdata, "AT2"),
        CommandId::Ats => per_stand(store, cmdata, "ATSPLIT"),
        CommandId::Fpw => {
            // DATA is stand(3) pol(1) setting(2).
            let (Some(stand), Some(pol), Some(setting)) = (
                parse_num(cmdata, 0..3),
                parse_num(cmdata, 3..4),
                parse_num(cmdata, 4..6),
            ) else {
                return MibErrorMask::OTHER;
            };
            let state = on_off(setting);
            apply_stands(store, stand, |s| format!("FEEPOL{pol}PWR_{s}"), state)
        }
        CommandId::Rxp => supply(store, cmdata, "ARXSUPPLY"),
        CommandId::Fep => supply(store, cmdata, "FEESUPPLY"),
        _ => MibErrorMask::SID_CID_MISMATCH,
    }
}

/// FIL/AT1/AT2/ATS share the stand(3) setting(2) layout and two-digit
/// stored form.
fn per_stand(store: &MibStore, cmdata: &str, prefix: &str) -> MibErrorMask {
    let (Some(stand), Some(setting)) = (parse_num(cmdata, 0..3), parse_num(cmdata, 3..5)) else {
        return MibErrorMask::OTHER;
    };
    let value = format!("{setting:02}");
    apply_stands(store, stand, |s| format!("{prefix}_{s}"), &value)
}

fn supply(store: &MibStore, cmdata: &str, label: &str) -> MibErrorMask {
    let Some(setting) = parse_num(cmdata, 0..2) else {
        return MibErrorMask::OTHER;
    };
    write_text(store, label, on_off(setting))
}

fn apply_stands(
    store: &MibStore,
    stand: u16,
    label: impl Fn(u16) -> String,
    value: &str,
) -> MibErrorMask {
    let mut mask = MibErrorMask::empty();
    if stand == 0 {
        for s in 1..=NUM_STANDS {
            mask |= write_text(store, &label(s), value);
        }
    } else {
        mask |= write_text(store, &label(stand), value);
    }
    mask
}

fn on_off(setting: u16) -> &'static str {
    if setting == 0 {
        "OFF"
    } else {
        "ON "
    }
}

fn parse_num(s: &str, range: std::ops::Range<usize>) -> Option<u16> {
    s.get(range)?.trim().parse().ok()
}
