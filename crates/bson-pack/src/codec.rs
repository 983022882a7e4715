//! Top-level BSON codec facade.

use crate::decoder::BsonDecoder;
use crate::encoder::BsonEncoder;
use crate::error::{BsonError, EncodeError};
use crate::from_bson::NativeDecoder;
use crate::native::{NativeValue, Reviver, ToEncodable};
use crate::to_bson::NativeEncoder;

/// BSON codec with pluggable conversion hooks.
///
/// Holds the default `to_encodable` and `reviver` hooks; both can be
/// overridden per call. The codec itself is stateless across calls and
/// freely shareable.
#[derive(Default)]
pub struct Bson {
    to_encodable: Option<ToEncodable>,
    reviver: Option<Reviver>,
}

impl Bson {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with default hooks installed.
    pub fn with_hooks(to_encodable: Option<ToEncodable>, reviver: Option<Reviver>) -> Self {
        Self {
            to_encodable,
            reviver,
        }
    }

    /// Encodes a native value. The top level must map to a document.
    pub fn encode(&self, value: &NativeValue) -> Result<Vec<u8>, EncodeError> {
        let doc = self.encoder().to_document(value)?;
        Ok(BsonEncoder::new().encode(&doc))
    }

    /// Encodes with a one-off `to_encodable` hook in place of the default.
    pub fn encode_with(
        &self,
        value: &NativeValue,
        to_encodable: &ToEncodable,
    ) -> Result<Vec<u8>, EncodeError> {
        let doc = NativeEncoder::new(Some(to_encodable)).to_document(value)?;
        Ok(BsonEncoder::new().encode(&doc))
    }

    /// Decodes bytes into a native value tree.
    pub fn decode(&self, data: &[u8]) -> Result<NativeValue, BsonError> {
        let doc = BsonDecoder::new().decode(data)?;
        Ok(self.decoder().from_document(doc))
    }

    /// Decodes with a one-off reviver in place of the default.
    pub fn decode_with(&self, data: &[u8], reviver: &Reviver) -> Result<NativeValue, BsonError> {
        let doc = BsonDecoder::new().decode(data)?;
        Ok(NativeDecoder::new(Some(reviver)).from_document(doc))
    }

    /// Encode-path converter bound to this codec's default hook.
    pub fn encoder(&self) -> NativeEncoder<'_> {
        NativeEncoder::new(self.to_encodable.as_ref())
    }

    /// Decode-path converter bound to this codec's default reviver.
    pub fn decoder(&self) -> NativeDecoder<'_> {
        NativeDecoder::new(self.reviver.as_ref())
    }
}
