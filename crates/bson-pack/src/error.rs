//! BSON codec error types.

use bson_pack_buffers::BufferError;
use thiserror::Error;

/// Decode-side format errors. All terminal; no partial document is ever
/// returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BsonError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("invalid document length {0}")]
    InvalidSize(i32),
    #[error("unsupported BSON type 0x{0:02x}")]
    UnsupportedType(u8),
    #[error("document not terminated at byte {0}")]
    BadTerminator(usize),
    #[error("declared document length {declared} does not match {actual} bytes decoded")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("old binary inner length {inner} does not match outer length {outer}")]
    BinaryLengthMismatch { outer: i32, inner: i32 },
    #[error("invalid string length")]
    InvalidStringLength,
    #[error("missing string terminator")]
    MissingTerminator,
    #[error("datetime out of range: {0} ms")]
    DateTimeOutOfRange(i64),
}

impl From<BufferError> for BsonError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => BsonError::UnexpectedEof,
            BufferError::InvalidUtf8 => BsonError::InvalidUtf8,
            BufferError::InvalidLength => BsonError::InvalidStringLength,
            BufferError::MissingTerminator => BsonError::MissingTerminator,
        }
    }
}

/// Encode-side adapter errors.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Integer exceeds the signed 64-bit range.
    #[error("integer out of signed 64-bit range")]
    IntegerOverflow,
    /// A container or custom object was reached again while still being
    /// encoded.
    #[error("cyclic reference")]
    CyclicReference,
    /// A value with no BSON mapping, optionally carrying the conversion
    /// hook's failure.
    #[error("unsupported value: {kind}")]
    Unsupported {
        kind: &'static str,
        #[source]
        source: Option<Box<EncodeError>>,
    },
    /// The top-level value did not map to a document.
    #[error("top-level value must be a document, got {0}")]
    TopLevel(&'static str),
}

impl EncodeError {
    pub(crate) fn unsupported(kind: &'static str) -> Self {
        EncodeError::Unsupported { kind, source: None }
    }
}
