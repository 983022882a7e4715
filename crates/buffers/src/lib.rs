//! Little-endian binary buffer utilities for bson-pack.
//!
//! BSON is a little-endian format framed by byte counts, so both halves of
//! this crate are byte-exact by construction:
//!
//! - [`Reader`] - reads binary data from a borrowed byte slice with cursor
//!   tracking; every read is bounds-checked and fails with
//!   [`BufferError::EndOfBuffer`] instead of panicking.
//! - [`Writer`] - writes into a buffer pre-sized to the exact output
//!   length computed before any byte is emitted.
//!
//! # Example
//!
//! ```
//! use bson_pack_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new(6);
//! writer.u8(0x01);
//! writer.i32(0x0203);
//! writer.u8(0xff);
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x01);
//! assert_eq!(reader.i32().unwrap(), 0x0203);
//! assert_eq!(reader.u8().unwrap(), 0xff);
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Error type for buffer read operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    #[error("end of buffer")]
    EndOfBuffer,
    /// Invalid UTF-8 sequence.
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    /// A length-prefixed string declared a non-positive length.
    #[error("invalid string length")]
    InvalidLength,
    /// A length-prefixed string did not end with a NUL byte.
    #[error("missing string terminator")]
    MissingTerminator,
}
