//! Codec for the packed ASCII frame exchanged with subsystems over UDP.
//!
//! Both directions share a 38-byte header followed by the body:
//!
//! ```text
//! DEST(3) SRC(3) TYPE(3) REF(9) DLEN(4) MJD(6) MPM(9) ' ' BODY(DLEN bytes)
//! ```
//!
//! Numeric fields are right-justified decimal. DLEN names the number of
//! bytes after the single separator space. In responses the first 8 body
//! bytes are the preamble: an `A`/`R` accept flag and the 7-character
//! right-padded summary token; the rest is the R_COMMENT. Bodies are framed
//! into 256-byte buffers and truncated with the significant length
//! preserved; nothing here allocates.

use std::io::Write as _;

use crate::command::CommandId;
use crate::envelope::{Envelope, DATA_FIELD_LEN};
use crate::error::ProtoError;
use crate::state::{Progress, Summary};
use crate::subsystem::SubsystemId;

/// Header length; the body begins immediately after.
pub const FRAME_HEADER_LEN: usize = 38;

/// Largest frame either side will emit.
pub const MAX_FRAME_LEN: usize = FRAME_HEADER_LEN + DATA_FIELD_LEN;

/// Length of the `R_RESPONSE` + `R_SUMMARY` preamble in a response body.
pub const RESPONSE_PREAMBLE_LEN: usize = 8;

/// A command frame as sent to a subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    pub dest: SubsystemId,
    pub src: SubsystemId,
    pub command: CommandId,
    pub reference: u32,
    pub mjd: u32,
    pub mpm: u32,
    pub data: [u8; DATA_FIELD_LEN],
    pub data_len: usize,
}

impl CommandFrame {
    /// Builds the outbound frame for an envelope, stamped with the given
    /// wire time. The scheduler is always the source.
    pub fn from_envelope(env: &Envelope, mjd: u32, mpm: u32) -> CommandFrame {
        let bytes = env.data_bytes();
        let mut data = [0u8; DATA_FIELD_LEN];
        data[..bytes.len()].copy_from_slice(bytes);
        CommandFrame {
            dest: env.dest,
            src: SubsystemId::Mcs,
            command: env.command,
            reference: env.reference,
            mjd,
            mpm,
            data,
            data_len: bytes.len(),
        }
    }

    pub fn encode(&self) -> ([u8; MAX_FRAME_LEN], usize) {
        let mut buf = [0u8; MAX_FRAME_LEN];
        encode_header(
            &mut buf,
            self.dest,
            self.src,
            self.command.code(),
            self.reference,
            self.data_len,
            self.mjd,
            self.mpm,
        );
        let end = FRAME_HEADER_LEN + self.data_len;
        buf[FRAME_HEADER_LEN..end].copy_from_slice(&self.data[..self.data_len]);
        (buf, end)
    }

    pub fn parse(raw: &[u8]) -> Result<CommandFrame, ProtoError> {
        let h = Header::parse(raw)?;
        let mut data = [0u8; DATA_FIELD_LEN];
        data[..h.body.len()].copy_from_slice(h.body);
        Ok(CommandFrame {
            dest: SubsystemId::from_code(h.dest)?,
            src: SubsystemId::from_code(h.src)?,
            command: CommandId::from_code(h.kind)?,
            reference: h.reference,
            mjd: h.mjd,
            mpm: h.mpm,
            data,
            data_len: h.body.len(),
        })
    }
}

/// The subsystem's accept/reject flag from the first response body byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Accepted,
    Rejected,
    Other(u8),
}

impl ResponseKind {
    pub fn from_byte(b: u8) -> ResponseKind {
        match b {
            b'A' => ResponseKind::Accepted,
            b'R' => ResponseKind::Rejected,
            other => ResponseKind::Other(other),
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            ResponseKind::Accepted => b'A',
            ResponseKind::Rejected => b'R',
            ResponseKind::Other(b) => b,
        }
    }

    /// The task progress a response of this kind maps to.
    pub fn progress(self) -> Progress {
        match self {
            ResponseKind::Accepted => Progress::Success,
            ResponseKind::Rejected => Progress::FailRejected,
            ResponseKind::Other(_) => Progress::DoneUnknown,
        }
    }
}

/// A response frame as received from a subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFrame {
    pub dest: SubsystemId,
    pub src: SubsystemId,
    pub command: CommandId,
    pub reference: u32,
    pub mjd: u32,
    pub mpm: u32,
    pub kind: ResponseKind,
    pub summary: Summary,
    pub comment: [u8; DATA_FIELD_LEN],
    pub comment_len: usize,
}

impl ResponseFrame {
    pub fn parse(raw: &[u8]) -> Result<ResponseFrame, ProtoError> {
        let h = Header::parse(raw)?;
        if h.body.len() < RESPONSE_PREAMBLE_LEN {
            return Err(ProtoError::ShortResponseBody(h.body.len()));
        }
        let summary_token = std::str::from_utf8(&h.body[1..RESPONSE_PREAMBLE_LEN])
            .map_err(|_| ProtoError::BadHeaderField {
                field: "R_SUMMARY",
                text: String::from_utf8_lossy(&h.body[1..RESPONSE_PREAMBLE_LEN]).into_owned(),
            })?;
        let raw_comment = &h.body[RESPONSE_PREAMBLE_LEN..];
        let mut comment = [0u8; DATA_FIELD_LEN];
        comment[..raw_comment.len()].copy_from_slice(raw_comment);
        Ok(ResponseFrame {
            dest: SubsystemId::from_code(h.dest)?,
            src: SubsystemId::from_code(h.src)?,
            command: CommandId::from_code(h.kind)?,
            reference: h.reference,
            mjd: h.mjd,
            mpm: h.mpm,
            kind: ResponseKind::from_byte(h.body[0]),
            summary: Summary::from_token(summary_token),
            comment,
            comment_len: raw_comment.len(),
        })
    }

    /// Encodes a response the way a subsystem would; used by mock responders.
    pub fn encode(&self) -> ([u8; MAX_FRAME_LEN], usize) {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let comment_len = self.comment_len.min(DATA_FIELD_LEN - RESPONSE_PREAMBLE_LEN);
        let dlen = RESPONSE_PREAMBLE_LEN + comment_len;
        encode_header(
            &mut buf,
            self.dest,
            self.src,
            self.command.code(),
            self.reference,
            dlen,
            self.mjd,
            self.mpm,
        );
        buf[FRAME_HEADER_LEN] = self.kind.byte();
        let mut pad = &mut buf[FRAME_HEADER_LEN + 1..FRAME_HEADER_LEN + RESPONSE_PREAMBLE_LEN];
        // The token is at most 7 characters; the write cannot fail.
        let _ = write!(pad, "{:<7}", self.summary.token());
        let end = FRAME_HEADER_LEN + dlen;
        buf[FRAME_HEADER_LEN + RESPONSE_PREAMBLE_LEN..end]
            .copy_from_slice(&self.comment[..comment_len]);
        (buf, end)
    }

    pub fn comment_bytes(&self) -> &[u8] {
        &self.comment[..self.comment_len]
    }
}

#[allow(clippy::too_many_arguments)]
fn encode_header(
    buf: &mut [u8; MAX_FRAME_LEN],
    dest: SubsystemId,
    src: SubsystemId,
    kind: &str,
    reference: u32,
    dlen: usize,
    mjd: u32,
    mpm: u32,
) {
    let mut header = &mut buf[..FRAME_HEADER_LEN];
    // All fields have fixed maximum widths, so the 38 bytes always suffice.
    let _ = write!(
        header,
        "{}{}{}{:>9}{:>4}{:>6}{:>9} ",
        dest.code(),
        src.code(),
        kind,
        reference,
        dlen,
        mjd,
        mpm
    );
}

struct Header<'a> {
    dest: &'a str,
    src: &'a str,
    kind: &'a str,
    reference: u32,
    mjd: u32,
    mpm: u32,
    body: &'a [u8],
}

impl<'a> Header<'a> {
    fn parse(raw: &'a [u8]) -> Result<Header<'a>, ProtoError> {
        if raw.len() < FRAME_HEADER_LEN {
            return Err(ProtoError::FrameTooShort {
                got: raw.len(),
                need: FRAME_HEADER_LEN,
            });
        }
        let dest = header_str(raw, 0..3, "DEST")?;
        let src = header_str(raw, 3..6, "SRC")?;
        let kind = header_str(raw, 6..9, "TYPE")?;
        let reference = header_num(raw, 9..18, "REF")?;
        let dlen = header_num(raw, 18..22, "DLEN")? as usize;
        let mjd = header_num(raw, 22..28, "MJD")?;
        let mpm = header_num(raw, 28..37, "MPM")?;
        if dlen > DATA_FIELD_LEN {
            return Err(ProtoError::BodyTooLong(dlen));
        }
        if raw.len() < FRAME_HEADER_LEN + dlen {
            return Err(ProtoError::FrameTooShort {
                got: raw.len(),
                need: FRAME_HEADER_LEN + dlen,
            });
        }
        Ok(Header {
            dest,
            src,
            kind,
            reference,
            mjd,
            mpm,
            body: &raw[FRAME_HEADER_LEN..FRAME_HEADER_LEN + dlen],
        })
    }
}

fn header_str<'a>(
    raw: &'a [u8],
    range: std::ops::Range<usize>,
    field: &'static str,
) -> Result<&'a str, ProtoError> {
    std::str::from_utf8(&raw[range.clone()]).map_err(|_| ProtoError::BadHeaderField {
        field,
        text: String::from_utf8_lossy(&raw[range]).into_owned(),
    })
}

fn header_num(
    raw: &[u8],
    range: std::ops::Range<usize>,
    field: &'static str,
) -> Result<u32, ProtoError> {
    let text = header_str(raw, range, field)?;
    text.trim().parse().map_err(|_| ProtoError::BadHeaderField {
        field,
        text: text.to_owned(),
    })
}
