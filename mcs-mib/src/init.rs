use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{MibError, MibResult};
use crate::record::{MibKind, MibRecord};
use crate::store::MibStore;
use crate::typecode::TypeCode;

/// Builds a subsystem MIB store from its text initialization file.
///
/// Each non-empty row is `KIND INDEX LABEL VALUE TYPE_STORE TYPE_WIRE`,
/// whitespace-separated; `KIND` is `B` (branch) or `V` (value) and VALUE is
/// parsed according to TYPE_STORE. The three reserved endpoint entries
/// (`MCH_IP_ADDRESS`, `MCH_TX_PORT`, `MCH_RX_PORT`) are appended from the
/// arguments. Returns the number of entries written, reserved included.
pub fn init_from_text(
    dat_path: &Path,
    store_path: &Path,
    ip_address: &str,
    tx_port: u16,
    rx_port: u16,
) -> MibResult<usize> {
    let text = fs::read_to_string(dat_path)?;
    let store = MibStore::create(store_path)?;
    let mut count = 0;

    for (line_no, line) in text.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() != 6 {
            return Err(MibError::BadInitLine {
                line: line_no + 1,
                reason: format!("expected 6 fields, got {}", tokens.len()),
            });
        }
        let [kind, index, label, value, type_store, type_wire] =
            [tokens[0], tokens[1], tokens[2], tokens[3], tokens[4], tokens[5]];
        let kind = if kind == "B" {
            MibKind::Branch
        } else {
            MibKind::Value
        };
        let code = TypeCode::parse(type_store).map_err(|e| MibError::BadInitLine {
            line: line_no + 1,
            reason: e.to_string(),
        })?;
        let mut record = MibRecord::new(kind, index, type_store, type_wire);
        record.value = code.encode_value(value).map_err(|e| MibError::BadInitLine {
            line: line_no + 1,
            reason: e.to_string(),
        })?;
        store.store(label, &mut record)?;
        count += 1;
    }

    let mut reserved = |label: &str, index: &str, type_store: &str, text: &str| -> MibResult<()> {
        let mut record = MibRecord::new(MibKind::Value, index, type_store, "NUL");
        record.set_text(text);
        store.store(label, &mut record)
    };
    reserved("MCH_IP_ADDRESS", "0.1", "a15", ip_address)?;
    reserved("MCH_TX_PORT", "0.2", "a5", &tx_port.to_string())?;
    reserved("MCH_RX_PORT", "0.3", "a5", &rx_port.to_string())?;

    Ok(count + 3)
}

/// Renders every entry of a store, one line per label, decoding values per
/// their local type code. Used by the report viewer.
pub fn dump(store: &MibStore, out: &mut dyn Write) -> MibResult<()> {
    for (label, record) in store.iterate()? {
        let shown = match TypeCode::parse(&record.type_store) {
            Ok(code) => code.decode_value(&record.value),
            Err(_) => "?".to_owned(),
        };
        let when = record
            .last_change
            .to_utc()
            .map(|dt| dt.format("%y%m%d %H:%M:%S").to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "{:<32} {} {:<12} {:<32} {:<6} {:<6} |{}",
            label,
            record.kind as u8,
            record.index,
            shown,
            record.type_store,
            record.type_wire,
            when,
        )?;
    }
    Ok(())
}
