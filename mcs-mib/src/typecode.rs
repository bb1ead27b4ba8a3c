use crate::error::{MibError, MibResult};
use crate::record::VALUE_FIELD_LEN;

/// Data type/format code controlling how a 256-byte value buffer is read.
///
/// - `NUL`: no semantics (e.g. branch head entries)
/// - `a####`: `####` printable ASCII characters
/// - `r####`: `####` bytes of raw data
/// - `i1u`/`i2u`/`i4u`: unsigned big-endian integers of 1/2/4 bytes
/// - `f4`: IEEE-754 big-endian single-precision float
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCode {
    Nul,
    Ascii(usize),
    Raw(usize),
    U8,
    U16,
    U32,
    F32,
}

impl TypeCode {
    pub fn parse(code: &str) -> MibResult<TypeCode> {
        let code = code.trim();
        match code {
            "NUL" => return Ok(TypeCode::Nul),
            "i1u" => return Ok(TypeCode::U8),
            "i2u" => return Ok(TypeCode::U16),
            "i4u" => return Ok(TypeCode::U32),
            "f4" => return Ok(TypeCode::F32),
            _ => {}
        }
        // Widths may exceed the 256-byte value buffer (e.g. r1024); reads
        // and writes clamp to the buffer.
        let width = |digits: &str| {
            digits
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0 && n <= 9999)
        };
        if let Some(rest) = code.strip_prefix('a') {
            if let Some(n) = width(rest) {
                return Ok(TypeCode::Ascii(n));
            }
        }
        if let Some(rest) = code.strip_prefix('r') {
            if let Some(n) = width(rest) {
                return Ok(TypeCode::Raw(n));
            }
        }
        Err(MibError::BadTypeCode(code.to_owned()))
    }

    pub fn format(self) -> String {
        match self {
            TypeCode::Nul => "NUL".to_owned(),
            TypeCode::Ascii(n) => format!("a{n}"),
            TypeCode::Raw(n) => format!("r{n}"),
            TypeCode::U8 => "i1u".to_owned(),
            TypeCode::U16 => "i2u".to_owned(),
            TypeCode::U32 => "i4u".to_owned(),
            TypeCode::F32 => "f4".to_owned(),
        }
    }

    /// Parses the textual form of a value (as found in a MIB init file) into
    /// the 256-byte buffer. Raw values have no textual form and leave the
    /// buffer zeroed.
    pub fn encode_value(self, text: &str) -> MibResult<[u8; VALUE_FIELD_LEN]> {
        let mut buf = [0u8; VALUE_FIELD_LEN];
        let bad = || MibError::BadValue {
            code: self.format(),
            text: text.to_owned(),
        };
        match self {
            TypeCode::Nul | TypeCode::Ascii(_) => {
                let bytes = text.as_bytes();
                let n = bytes.len().min(VALUE_FIELD_LEN);
                buf[..n].copy_from_slice(&bytes[..n]);
            }
            TypeCode::Raw(_) => {}
            TypeCode::U8 => {
                buf[0] = text.parse::<u8>().map_err(|_| bad())?;
            }
            TypeCode::U16 => {
                let v = text.parse::<u16>().map_err(|_| bad())?;
                buf[..2].copy_from_slice(&v.to_be_bytes());
            }
            TypeCode::U32 => {
                let v = text.parse::<u32>().map_err(|_| bad())?;
                buf[..4].copy_from_slice(&v.to_be_bytes());
            }
            TypeCode::F32 => {
                let v = text.parse::<f32>().map_err(|_| bad())?;
                buf[..4].copy_from_slice(&v.to_be_bytes());
            }
        }
        Ok(buf)
    }

    /// Renders a value buffer for display. Raw data is elided the way the
    /// report readers do.
    pub fn decode_value(self, value: &[u8; VALUE_FIELD_LEN]) -> String {
        match self {
            TypeCode::Nul => "NUL".to_owned(),
            TypeCode::Ascii(n) => {
                let end = value[..n.min(VALUE_FIELD_LEN)]
                    .iter()
                    .position(|&b| b == 0)
                    .unwrap_or(n.min(VALUE_FIELD_LEN));
                String::from_utf8_lossy(&value[..end]).into_owned()
            }
            TypeCode::Raw(_) => "@...".to_owned(),
            TypeCode::U8 => value[0].to_string(),
            TypeCode::U16 => u16::from_be_bytes([value[0], value[1]]).to_string(),
            TypeCode::U32 => {
                u32::from_be_bytes([value[0], value[1], value[2], value[3]]).to_string()
            }
            TypeCode::F32 => {
                let v = f32::from_be_bytes([value[0], value[1], value[2], value[3]]);
                format!("{v:.6}")
            }
        }
    }
}
