use thiserror::Error;

/// Errors that can occur while encoding or decoding protocol data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtoError {
    #[error("Unknown subsystem code: {0}")]
    UnknownSubsystemCode(String),
    #[error("Unknown subsystem id: {0}")]
    UnknownSubsystemId(u16),
    #[error("Unknown command code: {0}")]
    UnknownCommandCode(String),
    #[error("Unknown command id: {0}")]
    UnknownCommandId(u16),
    #[error("Frame too short: {got} bytes, need {need}")]
    FrameTooShort { got: usize, need: usize },
    #[error("Malformed header field {field}: {text:?}")]
    BadHeaderField {
        field: &'static str,
        text: String,
    },
    #[error("Body length {0} exceeds the 256-byte data field")]
    BodyTooLong(usize),
    #[error("Response body shorter than the 8-byte preamble: {0} bytes")]
    ShortResponseBody(usize),
    #[error("Envelope buffer has wrong length: {0}")]
    BadEnvelopeLength(usize),
    #[error("Timestamp out of representable range")]
    TimeOutOfRange,
}
