//! BSON (Binary JSON) encoding and decoding.
//!
//! Converts between native Rust values and the little-endian,
//! length-prefixed BSON document format. The crate is layered:
//!
//! - [`BsonValue`] - the typed value tree, one variant per type tag.
//! - [`BsonEncoder`] / [`BsonDecoder`] - the binary codec between value
//!   trees and bytes, with strict size-prefix and terminator checking.
//! - [`NativeValue`] plus [`NativeEncoder`] / [`NativeDecoder`] - the
//!   adapter between dynamically typed native values and the typed tree,
//!   with hook dispatch, cycle detection, and reviver support.
//! - [`Bson`] - the facade tying both layers together.
//!
//! # Example
//!
//! ```
//! use bson_pack::{Bson, NativeValue};
//!
//! let codec = Bson::new();
//! let doc = NativeValue::object(vec![("hello".to_string(), "world".into())]);
//! let bytes = codec.encode(&doc).unwrap();
//! assert_eq!(
//!     bytes,
//!     b"\x16\x00\x00\x00\x02hello\x00\x06\x00\x00\x00world\x00\x00"
//! );
//! assert_eq!(codec.decode(&bytes).unwrap(), doc);
//! ```

pub mod constants;
pub mod convert;

mod codec;
mod decoder;
mod encoder;
mod error;
mod from_bson;
mod native;
mod to_bson;
mod values;

pub use codec::Bson;
pub use decoder::BsonDecoder;
pub use encoder::BsonEncoder;
pub use error::{BsonError, EncodeError};
pub use from_bson::NativeDecoder;
pub use native::{NativeValue, Reviver, ReviverKey, ToBson, ToEncodable};
pub use to_bson::NativeEncoder;
pub use values::{
    BsonBinary, BsonDbPointer, BsonDocument, BsonJavascriptCode, BsonObjectId, BsonRegex,
    BsonSymbol, BsonTimestamp, BsonValue,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_simple_document() {
        let encoder = BsonEncoder::new();
        let decoder = BsonDecoder::new();
        let fields = vec![
            ("name".to_string(), BsonValue::Str("Alice".to_string())),
            ("age".to_string(), BsonValue::Int32(30)),
            ("active".to_string(), BsonValue::Boolean(true)),
        ];
        let bytes = encoder.encode(&fields);
        let decoded = decoder.decode(&bytes).unwrap();
        assert_eq!(decoded, fields);
    }

    #[test]
    fn declared_length_covers_whole_document() {
        let encoder = BsonEncoder::new();
        let fields = vec![("x".to_string(), BsonValue::Int64(1))];
        let bytes = encoder.encode(&fields);
        let declared = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(declared as usize, bytes.len());
        assert_eq!(*bytes.last().unwrap(), 0x00);
    }

    #[test]
    fn facade_reports_format_errors() {
        let codec = Bson::new();
        assert!(matches!(
            codec.decode(&[0x1b]),
            Err(BsonError::UnexpectedEof)
        ));
    }
}
