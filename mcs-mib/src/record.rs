use mcs_proto::Timestamp;

pub const INDEX_FIELD_LEN: usize = 12;
pub const LABEL_FIELD_LEN: usize = 32;
pub const VALUE_FIELD_LEN: usize = 256;

/// Whether an entry is a branch head or a leaf value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MibKind {
    Branch = 0,
    Value = 1,
}

impl MibKind {
    pub fn from_u8(v: u8) -> MibKind {
        if v == 0 {
            MibKind::Branch
        } else {
            MibKind::Value
        }
    }
}

/// One keyed entry in a subsystem's MIB.
///
/// The value buffer is a fixed 256 bytes; `type_store` controls how it is
/// interpreted locally, while `type_wire` is advisory metadata for external
/// report readers and is preserved untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MibRecord {
    pub kind: MibKind,
    /// Dotted-numeric index string, up to 12 characters.
    pub index: String,
    pub value: [u8; VALUE_FIELD_LEN],
    pub type_store: String,
    pub type_wire: String,
    pub last_change: Timestamp,
}

impl MibRecord {
    pub fn new(kind: MibKind, index: &str, type_store: &str, type_wire: &str) -> MibRecord {
        MibRecord {
            kind,
            index: clamp(index, INDEX_FIELD_LEN),
            value: [0; VALUE_FIELD_LEN],
            type_store: clamp(type_store, 6),
            type_wire: clamp(type_wire, 6),
            last_change: Timestamp::ZERO,
        }
    }

    /// Overwrites the value buffer with a printable string.
    pub fn set_text(&mut self, text: &str) {
        self.set_bytes(text.as_bytes());
    }

    /// Overwrites the value buffer with raw bytes, zero-filling the rest.
    pub fn set_bytes(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(VALUE_FIELD_LEN);
        self.value = [0; VALUE_FIELD_LEN];
        self.value[..n].copy_from_slice(&bytes[..n]);
    }

    /// The value interpreted as a NUL-terminated string.
    pub fn text(&self) -> String {
        let end = self
            .value
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(VALUE_FIELD_LEN);
        String::from_utf8_lossy(&self.value[..end]).into_owned()
    }
}

fn clamp(s: &str, max: usize) -> String {
    s.get(..max).unwrap_or(s).to_owned()
}
