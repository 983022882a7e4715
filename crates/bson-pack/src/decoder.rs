//! BSON document decoder.

use bson_pack_buffers::Reader;
use chrono::{TimeZone, Utc};

use crate::constants::{subtype, tag};
use crate::error::BsonError;
use crate::values::{
    BsonBinary, BsonDbPointer, BsonDocument, BsonJavascriptCode, BsonObjectId, BsonRegex,
    BsonTimestamp, BsonValue,
};

/// BSON document decoder.
///
/// Every document's declared length is checked against the bytes actually
/// consumed, and the element list must end on the NUL terminator exactly
/// where the length says it does.
pub struct BsonDecoder;

impl Default for BsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BsonDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes a BSON document from bytes.
    pub fn decode(&self, data: &[u8]) -> Result<BsonDocument, BsonError> {
        let mut reader = Reader::new(data);
        self.read_document(&mut reader)
    }

    fn read_document(&self, reader: &mut Reader) -> Result<BsonDocument, BsonError> {
        let start = reader.offset();
        let declared = reader.i32()?;
        if declared < 5 {
            return Err(BsonError::InvalidSize(declared));
        }
        let declared = declared as usize;
        let mut fields = BsonDocument::new();
        let mut element_type = reader.u8()?;
        while element_type != 0 && reader.offset() - start < declared {
            let key = reader.cstr()?.to_owned();
            let value = self.read_value(reader, element_type)?;
            fields.push((key, value));
            element_type = reader.u8()?;
        }
        if element_type != 0 {
            return Err(BsonError::BadTerminator(reader.offset() - 1));
        }
        let actual = reader.offset() - start;
        if actual != declared {
            return Err(BsonError::LengthMismatch { declared, actual });
        }
        Ok(fields)
    }

    /// Arrays share document framing; keys are discarded and values kept
    /// in the order encountered.
    fn read_array(&self, reader: &mut Reader) -> Result<Vec<BsonValue>, BsonError> {
        let fields = self.read_document(reader)?;
        Ok(fields.into_iter().map(|(_, value)| value).collect())
    }

    fn read_value(&self, reader: &mut Reader, element_type: u8) -> Result<BsonValue, BsonError> {
        Ok(match element_type {
            tag::DOUBLE => BsonValue::Float(reader.f64()?),
            tag::STRING => BsonValue::Str(reader.string()?.to_owned()),
            tag::DOCUMENT => BsonValue::Document(self.read_document(reader)?),
            tag::ARRAY => BsonValue::Array(self.read_array(reader)?),
            tag::BINARY => self.read_binary(reader)?,
            tag::UNDEFINED => BsonValue::Undefined,
            tag::OBJECT_ID => BsonValue::ObjectId(BsonObjectId::from_bytes(reader.object_id()?)),
            tag::BOOLEAN => BsonValue::Boolean(reader.u8()? == 1),
            tag::DATETIME => {
                let millis = reader.i64()?;
                let instant = Utc
                    .timestamp_millis_opt(millis)
                    .single()
                    .ok_or(BsonError::DateTimeOutOfRange(millis))?;
                BsonValue::DateTime(instant)
            }
            tag::NULL => BsonValue::Null,
            tag::REGEX => BsonValue::Regex(BsonRegex {
                pattern: reader.cstr()?.to_owned(),
                options: reader.cstr()?.to_owned(),
            }),
            tag::DB_POINTER => BsonValue::DbPointer(BsonDbPointer {
                name: reader.string()?.to_owned(),
                id: BsonObjectId::from_bytes(reader.object_id()?),
            }),
            tag::JAVASCRIPT => BsonValue::JavaScriptCode(BsonJavascriptCode {
                code: reader.string()?.to_owned(),
            }),
            // Symbols lower to plain strings; the tag is not preserved.
            tag::SYMBOL => BsonValue::Str(reader.string()?.to_owned()),
            tag::INT32 => BsonValue::Int32(reader.i32()?),
            tag::TIMESTAMP => {
                // Wire order is increment first, then seconds.
                let increment = reader.u32()?;
                let seconds = reader.u32()?;
                BsonValue::Timestamp(BsonTimestamp { seconds, increment })
            }
            tag::INT64 => BsonValue::Int64(reader.i64()?),
            tag::MAX_KEY => BsonValue::MaxKey,
            tag::MIN_KEY => BsonValue::MinKey,
            // JAVASCRIPT_WITH_SCOPE and DECIMAL128 are reserved but not
            // implemented, so they fall through with every unknown tag.
            other => return Err(BsonError::UnsupportedType(other)),
        })
    }

    fn read_binary(&self, reader: &mut Reader) -> Result<BsonValue, BsonError> {
        let outer = reader.i32()?;
        if outer < 0 {
            return Err(BsonError::InvalidSize(outer));
        }
        let kind = reader.u8()?;
        let mut length = outer;
        if kind == subtype::OLD_BINARY {
            let inner = reader.i32()?;
            if inner != outer - 4 {
                return Err(BsonError::BinaryLengthMismatch { outer, inner });
            }
            length = inner;
        }
        Ok(BsonValue::Binary(BsonBinary {
            subtype: kind,
            data: reader.buf(length as usize)?.to_vec(),
        }))
    }
}
