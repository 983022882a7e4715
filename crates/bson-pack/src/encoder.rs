//! BSON document encoder.

use bson_pack_buffers::Writer;

use crate::constants::subtype;
use crate::values::{BsonDocument, BsonValue};

/// Number of decimal digits in an array index.
fn decimal_len(mut n: usize) -> usize {
    let mut len = 1;
    while n >= 10 {
        n /= 10;
        len += 1;
    }
    len
}

/// BSON document encoder.
///
/// The total byte length of a document is computed before any byte is
/// written, so the output buffer is allocated once at its exact size and
/// either fills completely or is never produced.
pub struct BsonEncoder;

impl Default for BsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BsonEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encodes a document and returns the bytes.
    pub fn encode(&self, doc: &BsonDocument) -> Vec<u8> {
        let mut writer = Writer::new(self.document_size(doc));
        self.write_document(&mut writer, doc);
        writer.flush()
    }

    /// Total on-wire size of a document, including the int32 length prefix
    /// and the trailing NUL.
    pub fn document_size(&self, doc: &BsonDocument) -> usize {
        let elements: usize = doc
            .iter()
            .map(|(key, value)| self.element_size(key, value))
            .sum();
        4 + elements + 1
    }

    /// Payload size of a single value, excluding element framing.
    pub fn value_size(&self, value: &BsonValue) -> usize {
        match value {
            BsonValue::Float(_) => 8,
            BsonValue::Str(s) => 4 + s.len() + 1,
            BsonValue::Document(doc) => self.document_size(doc),
            BsonValue::Array(arr) => self.array_size(arr),
            BsonValue::Binary(bin) => {
                let inner = if bin.subtype == subtype::OLD_BINARY { 4 } else { 0 };
                4 + 1 + inner + bin.data.len()
            }
            BsonValue::Undefined => 0,
            BsonValue::ObjectId(_) => 12,
            BsonValue::Boolean(_) => 1,
            BsonValue::DateTime(_) => 8,
            BsonValue::Null => 0,
            BsonValue::Regex(re) => re.pattern.len() + 1 + re.options.len() + 1,
            BsonValue::DbPointer(ptr) => 4 + ptr.name.len() + 1 + 12,
            BsonValue::JavaScriptCode(code) => 4 + code.code.len() + 1,
            BsonValue::Symbol(sym) => 4 + sym.symbol.len() + 1,
            BsonValue::Int32(_) => 4,
            BsonValue::Timestamp(_) => 8,
            BsonValue::Int64(_) => 8,
            BsonValue::MaxKey => 0,
            BsonValue::MinKey => 0,
        }
    }

    fn element_size(&self, key: &str, value: &BsonValue) -> usize {
        1 + key.len() + 1 + self.value_size(value)
    }

    fn array_size(&self, arr: &[BsonValue]) -> usize {
        let elements: usize = arr
            .iter()
            .enumerate()
            .map(|(index, value)| 1 + decimal_len(index) + 1 + self.value_size(value))
            .sum();
        4 + elements + 1
    }

    fn write_document(&self, writer: &mut Writer, doc: &BsonDocument) {
        writer.i32(self.document_size(doc) as i32);
        for (key, value) in doc {
            writer.u8(value.tag());
            writer.cstr(key);
            self.write_value(writer, value);
        }
        writer.u8(0);
    }

    fn write_array(&self, writer: &mut Writer, arr: &[BsonValue]) {
        writer.i32(self.array_size(arr) as i32);
        for (index, value) in arr.iter().enumerate() {
            writer.u8(value.tag());
            writer.cstr(&index.to_string());
            self.write_value(writer, value);
        }
        writer.u8(0);
    }

    fn write_value(&self, writer: &mut Writer, value: &BsonValue) {
        match value {
            BsonValue::Float(f) => writer.f64(*f),
            BsonValue::Str(s) => writer.string(s),
            BsonValue::Document(doc) => self.write_document(writer, doc),
            BsonValue::Array(arr) => self.write_array(writer, arr),
            BsonValue::Binary(bin) => {
                let mut total = bin.data.len() as i32;
                if bin.subtype == subtype::OLD_BINARY {
                    total += 4;
                }
                writer.i32(total);
                writer.u8(bin.subtype);
                if bin.subtype == subtype::OLD_BINARY {
                    writer.i32(total - 4);
                }
                writer.buf(&bin.data);
            }
            BsonValue::Undefined | BsonValue::Null | BsonValue::MaxKey | BsonValue::MinKey => {}
            BsonValue::ObjectId(id) => writer.buf(&id.bytes),
            BsonValue::Boolean(b) => writer.u8(if *b { 1 } else { 0 }),
            BsonValue::DateTime(dt) => writer.i64(dt.timestamp_millis()),
            BsonValue::Regex(re) => {
                writer.cstr(&re.pattern);
                writer.cstr(&re.options);
            }
            BsonValue::DbPointer(ptr) => {
                writer.string(&ptr.name);
                writer.buf(&ptr.id.bytes);
            }
            BsonValue::JavaScriptCode(code) => writer.string(&code.code),
            BsonValue::Symbol(sym) => writer.string(&sym.symbol),
            BsonValue::Int32(n) => writer.i32(*n),
            // Wire order is increment first, then seconds.
            BsonValue::Timestamp(ts) => {
                writer.u32(ts.increment);
                writer.u32(ts.seconds);
            }
            BsonValue::Int64(n) => writer.i64(*n),
        }
    }
}
