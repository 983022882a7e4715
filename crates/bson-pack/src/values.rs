//! The BSON value tree.
//!
//! One variant per implemented type tag, each carrying its payload. Values
//! are constructed by the decoder or the native adapter and are not
//! mutated afterwards.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::constants::tag;

/// An ordered BSON document: insertion-ordered key/value pairs.
pub type BsonDocument = Vec<(String, BsonValue)>;

/// A single BSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum BsonValue {
    /// 64-bit IEEE-754 float (0x01).
    Float(f64),
    /// UTF-8 string (0x02).
    Str(String),
    /// Embedded document (0x03).
    Document(BsonDocument),
    /// Array, encoded as a document keyed "0", "1", … (0x04).
    Array(Vec<BsonValue>),
    /// Binary data with a subtype byte (0x05).
    Binary(BsonBinary),
    /// Deprecated undefined value (0x06).
    Undefined,
    /// 12-byte object identifier (0x07).
    ObjectId(BsonObjectId),
    /// Boolean (0x08).
    Boolean(bool),
    /// UTC instant with millisecond precision (0x09).
    DateTime(DateTime<Utc>),
    /// Null (0x0A).
    Null,
    /// Regular expression pattern and options (0x0B).
    Regex(BsonRegex),
    /// Deprecated database pointer (0x0C).
    DbPointer(BsonDbPointer),
    /// JavaScript code (0x0D).
    JavaScriptCode(BsonJavascriptCode),
    /// Symbol (0x0E). Decodes as [`BsonValue::Str`]; the tag is not
    /// preserved across a round-trip.
    Symbol(BsonSymbol),
    /// 32-bit signed integer (0x10).
    Int32(i32),
    /// Internal MongoDB timestamp (0x11).
    Timestamp(BsonTimestamp),
    /// 64-bit signed integer (0x12).
    Int64(i64),
    /// Greater than all other values (0x7F).
    MaxKey,
    /// Less than all other values (0xFF).
    MinKey,
}

impl BsonValue {
    /// The type tag byte written before the element key.
    pub fn tag(&self) -> u8 {
        match self {
            BsonValue::Float(_) => tag::DOUBLE,
            BsonValue::Str(_) => tag::STRING,
            BsonValue::Document(_) => tag::DOCUMENT,
            BsonValue::Array(_) => tag::ARRAY,
            BsonValue::Binary(_) => tag::BINARY,
            BsonValue::Undefined => tag::UNDEFINED,
            BsonValue::ObjectId(_) => tag::OBJECT_ID,
            BsonValue::Boolean(_) => tag::BOOLEAN,
            BsonValue::DateTime(_) => tag::DATETIME,
            BsonValue::Null => tag::NULL,
            BsonValue::Regex(_) => tag::REGEX,
            BsonValue::DbPointer(_) => tag::DB_POINTER,
            BsonValue::JavaScriptCode(_) => tag::JAVASCRIPT,
            BsonValue::Symbol(_) => tag::SYMBOL,
            BsonValue::Int32(_) => tag::INT32,
            BsonValue::Timestamp(_) => tag::TIMESTAMP,
            BsonValue::Int64(_) => tag::INT64,
            BsonValue::MaxKey => tag::MAX_KEY,
            BsonValue::MinKey => tag::MIN_KEY,
        }
    }
}

/// Binary payload with a subtype discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonBinary {
    pub subtype: u8,
    pub data: Vec<u8>,
}

/// A 12-byte object identifier, treated as opaque bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BsonObjectId {
    pub bytes: [u8; 12],
}

impl BsonObjectId {
    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self { bytes }
    }

    /// Lowercase hex rendering, 24 characters.
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(24);
        for byte in self.bytes {
            s.push_str(&format!("{byte:02x}"));
        }
        s
    }

    /// Parses a 24-character hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 24 || !s.is_ascii() {
            return None;
        }
        let mut bytes = [0u8; 12];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).ok()?;
            bytes[i] = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self { bytes })
    }
}

/// Regular expression: pattern and options, both NUL-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonRegex {
    pub pattern: String,
    pub options: String,
}

/// Deprecated database pointer: namespace plus object id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonDbPointer {
    pub name: String,
    pub id: BsonObjectId,
}

/// JavaScript code without scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonJavascriptCode {
    pub code: String,
}

/// Symbol value. Encodable, but decodes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BsonSymbol {
    pub symbol: String,
}

/// Internal MongoDB timestamp: seconds plus an ordinal within the second.
///
/// The wire layout is increment first, then seconds, both little-endian
/// uint32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BsonTimestamp {
    pub seconds: u32,
    pub increment: u32,
}

static INCREMENT: OnceLock<AtomicU32> = OnceLock::new();

/// Allocates the next process-wide timestamp increment.
///
/// The counter is seeded from a CSPRNG on first use and wraps modulo 2^32.
fn next_increment() -> u32 {
    let counter = INCREMENT.get_or_init(|| AtomicU32::new(rand::thread_rng().gen()));
    counter.fetch_add(1, Ordering::Relaxed)
}

impl BsonTimestamp {
    pub fn new(seconds: u32, increment: u32) -> Self {
        Self { seconds, increment }
    }

    /// Current wall-clock second paired with a freshly allocated increment.
    pub fn now() -> Self {
        Self {
            seconds: Utc::now().timestamp() as u32,
            increment: next_increment(),
        }
    }
}
