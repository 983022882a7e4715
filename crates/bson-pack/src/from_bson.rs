//! Decode-path adapter: BSON value trees down to native values.

use crate::native::{NativeValue, Reviver, ReviverKey};
use crate::values::{BsonDocument, BsonValue};

/// Lowers decoded BSON documents to [`NativeValue`] trees.
///
/// When a reviver is installed it runs once per value, bottom-up, keyed by
/// the document key or array index, and once more for the finished root
/// with [`ReviverKey::Root`].
pub struct NativeDecoder<'h> {
    reviver: Option<&'h Reviver>,
}

impl<'h> NativeDecoder<'h> {
    pub fn new(reviver: Option<&'h Reviver>) -> Self {
        Self { reviver }
    }

    /// Lowers a decoded document, applying the reviver throughout and to
    /// the root.
    pub fn from_document(&self, doc: BsonDocument) -> NativeValue {
        let root = self.lower_document(doc);
        match self.reviver {
            Some(reviver) => reviver(ReviverKey::Root, root),
            None => root,
        }
    }

    fn lower_document(&self, doc: BsonDocument) -> NativeValue {
        let mut fields = Vec::with_capacity(doc.len());
        for (key, value) in doc {
            let mut lowered = self.lower(value);
            if let Some(reviver) = self.reviver {
                lowered = reviver(ReviverKey::Key(key.as_str()), lowered);
            }
            fields.push((key, lowered));
        }
        NativeValue::object(fields)
    }

    fn lower(&self, value: BsonValue) -> NativeValue {
        match value {
            BsonValue::Document(doc) => self.lower_document(doc),
            BsonValue::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let mut lowered = self.lower(item);
                    if let Some(reviver) = self.reviver {
                        lowered = reviver(ReviverKey::Index(index), lowered);
                    }
                    out.push(lowered);
                }
                NativeValue::array(out)
            }
            BsonValue::Float(f) => NativeValue::Float(f),
            BsonValue::Str(s) => NativeValue::Str(s),
            BsonValue::Int32(n) => NativeValue::Integer(n as i64),
            BsonValue::Int64(n) => NativeValue::Integer(n),
            BsonValue::Boolean(b) => NativeValue::Bool(b),
            BsonValue::Null => NativeValue::Null,
            BsonValue::DateTime(dt) => NativeValue::DateTime(dt),
            BsonValue::ObjectId(id) => NativeValue::ObjectId(id),
            // No natural native equivalent; passed through as typed BSON.
            other => NativeValue::Bson(other),
        }
    }
}
