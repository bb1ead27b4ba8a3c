use std::path::Path;

use chrono::Utc;
use mcs_proto::Timestamp;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use crate::error::{MibError, MibResult};
use crate::record::{MibKind, MibRecord, LABEL_FIELD_LEN, VALUE_FIELD_LEN};
use crate::schema;

/// A subsystem's keyed store: `label -> MibRecord`, one SQLite file per
/// subsystem.
///
/// Exactly one process opens a store read-write (the subsystem's client);
/// viewers use [`MibStore::open_ro`]. The handle closes on drop.
pub struct MibStore {
    conn: Connection,
}

impl MibStore {
    /// Creates the store, clobbering any existing contents.
    pub fn create(path: &Path) -> MibResult<MibStore> {
        let conn = Connection::open(path).map_err(|source| MibError::CantOpen {
            path: path.display().to_string(),
            source,
        })?;
        conn.execute_batch(schema::CREATE_TABLES)?;
        conn.execute("DELETE FROM mib", [])?;
        Ok(MibStore { conn })
    }

    /// Opens an existing store for reading and writing. Missing files are an
    /// error; stores are created only by the initializer.
    pub fn open_rw(path: &Path) -> MibResult<MibStore> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE;
        Self::open_with(path, flags)
    }

    /// Opens an existing store read-only, for external viewers.
    pub fn open_ro(path: &Path) -> MibResult<MibStore> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY;
        Self::open_with(path, flags)
    }

    fn open_with(path: &Path, flags: OpenFlags) -> MibResult<MibStore> {
        let conn = Connection::open_with_flags(path, flags).map_err(|source| {
            MibError::CantOpen {
                path: path.display().to_string(),
                source,
            }
        })?;
        conn.busy_timeout(std::time::Duration::from_millis(1_000))?;
        Ok(MibStore { conn })
    }

    /// An in-memory store for tests.
    pub fn open_in_memory() -> MibResult<MibStore> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::CREATE_TABLES)?;
        Ok(MibStore { conn })
    }

    pub fn fetch(&self, label: &str) -> MibResult<MibRecord> {
        let label = clamp_label(label);
        let row = self
            .conn
            .query_row(
                "SELECT kind, idx, value, type_store, type_wire, last_change_us
                 FROM mib WHERE label = ?1",
                params![label],
                |row| {
                    let kind: u8 = row.get(0)?;
                    let index: String = row.get(1)?;
                    let blob: Vec<u8> = row.get(2)?;
                    let type_store: String = row.get(3)?;
                    let type_wire: String = row.get(4)?;
                    let last_us: i64 = row.get(5)?;
                    Ok((kind, index, blob, type_store, type_wire, last_us))
                },
            )
            .optional()?;
        let (kind, index, blob, type_store, type_wire, last_us) =
            row.ok_or_else(|| MibError::CantFetch(label.to_owned()))?;
        let mut value = [0u8; VALUE_FIELD_LEN];
        let n = blob.len().min(VALUE_FIELD_LEN);
        value[..n].copy_from_slice(&blob[..n]);
        Ok(MibRecord {
            kind: MibKind::from_u8(kind),
            index,
            value,
            type_store,
            type_wire,
            last_change: Timestamp {
                secs: last_us.div_euclid(1_000_000),
                micros: last_us.rem_euclid(1_000_000) as u32,
            },
        })
    }

    /// Stores a record under `label`, stamping `last_change` with the
    /// current wall clock (both in the record and on disk).
    pub fn store(&self, label: &str, record: &mut MibRecord) -> MibResult<()> {
        let label = clamp_label(label);
        record.last_change = Timestamp::from_utc(Utc::now());
        let last_us = record.last_change.secs * 1_000_000 + record.last_change.micros as i64;
        self.conn
            .execute(
                "INSERT INTO mib (label, kind, idx, value, type_store, type_wire, last_change_us)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(label) DO UPDATE SET
                     kind = excluded.kind,
                     idx = excluded.idx,
                     value = excluded.value,
                     type_store = excluded.type_store,
                     type_wire = excluded.type_wire,
                     last_change_us = excluded.last_change_us",
                params![
                    label,
                    record.kind as u8,
                    record.index,
                    record.value.as_slice(),
                    record.type_store,
                    record.type_wire,
                    last_us,
                ],
            )
            .map_err(|source| MibError::CantStore {
                label: label.to_owned(),
                source,
            })?;
        Ok(())
    }

    /// Yields every `(label, record)` pair, in unspecified order.
    pub fn iterate(&self) -> MibResult<Vec<(String, MibRecord)>> {
        let mut stmt = self.conn.prepare(
            "SELECT label, kind, idx, value, type_store, type_wire, last_change_us FROM mib",
        )?;
        let rows = stmt.query_map([], |row| {
            let label: String = row.get(0)?;
            let kind: u8 = row.get(1)?;
            let index: String = row.get(2)?;
            let blob: Vec<u8> = row.get(3)?;
            let type_store: String = row.get(4)?;
            let type_wire: String = row.get(5)?;
            let last_us: i64 = row.get(6)?;
            Ok((label, kind, index, blob, type_store, type_wire, last_us))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (label, kind, index, blob, type_store, type_wire, last_us) = row?;
            let mut value = [0u8; VALUE_FIELD_LEN];
            let n = blob.len().min(VALUE_FIELD_LEN);
            value[..n].copy_from_slice(&blob[..n]);
            out.push((
                label,
                MibRecord {
                    kind: MibKind::from_u8(kind),
                    index,
                    value,
                    type_store,
                    type_wire,
                    last_change: Timestamp {
                        secs: last_us.div_euclid(1_000_000),
                        micros: last_us.rem_euclid(1_000_000) as u32,
                    },
                },
            ));
        }
        Ok(out)
    }
}

fn clamp_label(label: &str) -> &str {
    label.get(..LABEL_FIELD_LEN).unwrap_or(label)
}
