/// Schema for a subsystem MIB store. One row per label.
pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS mib (
    label TEXT PRIMARY KEY NOT NULL,
    kind INTEGER NOT NULL,
    idx TEXT NOT NULL,
    value BLOB NOT NULL,
    type_store TEXT NOT NULL,
    type_wire TEXT NOT NULL,
    last_change_us INTEGER NOT NULL
) WITHOUT ROWID;
";
