use crate::command::CommandId;
use crate::error::ProtoError;
use crate::state::{MibErrorMask, Progress, Summary};
use crate::subsystem::SubsystemId;
use crate::time::Timestamp;

/// Size of the fixed DATA field carried in every envelope.
pub const DATA_FIELD_LEN: usize = 256;

/// Largest reference number before roll-over back to 1. Reference 0 means
/// "not assigned" and is never matched against live tasks.
pub const MAX_REFERENCE: u32 = 999_999_999;

/// Serialized envelope size on the injection socket.
pub const ENVELOPE_WIRE_LEN: usize = 26 + DATA_FIELD_LEN;

/// The unit of work carried end-to-end: injector to executive, executive to
/// client, client back to executive.
///
/// `data` holds the outbound DATA field on the way out and the R_COMMENT on
/// the way back. `data_len` of -1 marks a printable NUL-terminated string;
/// otherwise it is the exact count of significant bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub dest: SubsystemId,
    pub reference: u32,
    pub command: CommandId,
    /// Carried end-to-end but not honored by the executive; see the daemon's
    /// startup warning.
    pub scheduled: bool,
    pub when: Timestamp,
    pub progress: Progress,
    pub summary: Summary,
    pub mib_error: MibErrorMask,
    pub data: [u8; DATA_FIELD_LEN],
    pub data_len: i16,
}

impl Envelope {
    pub fn new(dest: SubsystemId, command: CommandId) -> Envelope {
        Envelope {
            dest,
            reference: 0,
            command,
            scheduled: false,
            when: Timestamp::ZERO,
            progress: Progress::Avail,
            summary: Summary::Null,
            mib_error: MibErrorMask::empty(),
            data: [0; DATA_FIELD_LEN],
            data_len: -1,
        }
    }

    /// Stores a printable string, truncated to fit with a trailing NUL, and
    /// marks `data_len` as -1.
    pub fn set_str_data(&mut self, s: &str) {
        let n = s.len().min(DATA_FIELD_LEN - 1);
        self.data = [0; DATA_FIELD_LEN];
        self.data[..n].copy_from_slice(&s.as_bytes()[..n]);
        self.data_len = -1;
    }

    /// Stores raw bytes, truncated to the field size, preserving the exact
    /// significant length.
    pub fn set_raw_data(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(DATA_FIELD_LEN);
        self.data = [0; DATA_FIELD_LEN];
        self.data[..n].copy_from_slice(&bytes[..n]);
        self.data_len = n as i16;
    }

    /// The significant bytes of the data field.
    pub fn data_bytes(&self) -> &[u8] {
        if self.data_len < 0 {
            let end = self
                .data
                .iter()
                .position(|&b| b == 0)
                .unwrap_or(DATA_FIELD_LEN);
            &self.data[..end]
        } else {
            &self.data[..(self.data_len as usize).min(DATA_FIELD_LEN)]
        }
    }

    pub fn data_str(&self) -> String {
        String::from_utf8_lossy(self.data_bytes()).into_owned()
    }

    /// Serializes into the fixed-size big-endian form used on the injection
    /// socket. One envelope per connection; the length is the framing.
    pub fn to_bytes(&self) -> [u8; ENVELOPE_WIRE_LEN] {
        let mut buf = [0u8; ENVELOPE_WIRE_LEN];
        buf[0..2].copy_from_slice(&self.dest.id().to_be_bytes());
        buf[2..6].copy_from_slice(&self.reference.to_be_bytes());
        buf[6..8].copy_from_slice(&self.command.id().to_be_bytes());
        buf[8] = self.scheduled as u8;
        buf[9..17].copy_from_slice(&self.when.secs.to_be_bytes());
        buf[17..21].copy_from_slice(&self.when.micros.to_be_bytes());
        buf[21] = self.progress as u8;
        buf[22] = self.summary as u8;
        buf[23] = self.mib_error.bits();
        buf[24..26].copy_from_slice(&self.data_len.to_be_bytes());
        buf[26..].copy_from_slice(&self.data);
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Envelope, ProtoError> {
        if buf.len() != ENVELOPE_WIRE_LEN {
            return Err(ProtoError::BadEnvelopeLength(buf.len()));
        }
        let be_u16 = |r: std::ops::Range<usize>| u16::from_be_bytes(buf[r].try_into().unwrap());
        let dest = SubsystemId::from_id(be_u16(0..2))?;
        let reference = u32::from_be_bytes(buf[2..6].try_into().unwrap());
        let command = CommandId::from_id(be_u16(6..8))?;
        let when = Timestamp {
            secs: i64::from_be_bytes(buf[9..17].try_into().unwrap()),
            micros: u32::from_be_bytes(buf[17..21].try_into().unwrap()),
        };
        let mut data = [0u8; DATA_FIELD_LEN];
        data.copy_from_slice(&buf[26..]);
        Ok(Envelope {
            dest,
            reference,
            command,
            scheduled: buf[8] != 0,
            when,
            progress: Progress::from_id(buf[21]).unwrap_or(Progress::Avail),
            summary: Summary::from_id(buf[22]).unwrap_or(Summary::Null),
            mib_error: MibErrorMask::from_bits_truncate(buf[23]),
            data,
            data_len: i16::from_be_bytes(buf[24..26].try_into().unwrap()),
        })
    }
}
