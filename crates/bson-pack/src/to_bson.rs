//! Encode-path adapter: native values to the BSON value tree.

use std::rc::Rc;

use crate::error::EncodeError;
use crate::native::{NativeValue, ToEncodable};
use crate::values::{BsonDocument, BsonValue};

/// Narrowest-fitting BSON integer for a signed value.
fn int_value(n: i64) -> BsonValue {
    if n >= i32::MIN as i64 && n <= i32::MAX as i64 {
        BsonValue::Int32(n as i32)
    } else {
        BsonValue::Int64(n)
    }
}

/// Converts [`NativeValue`] trees into BSON documents.
///
/// The conversion walks the value graph in pre-order and keeps a stack of
/// the containers currently being converted, compared by allocation
/// address. Meeting one of them again means the graph is cyclic, which is
/// fatal before any output byte exists.
pub struct NativeEncoder<'h> {
    to_encodable: Option<&'h ToEncodable>,
    stack: Vec<*const ()>,
}

impl<'h> NativeEncoder<'h> {
    pub fn new(to_encodable: Option<&'h ToEncodable>) -> Self {
        Self {
            to_encodable,
            stack: Vec::new(),
        }
    }

    /// Converts a top-level value, which must map to a document.
    pub fn to_document(&mut self, value: &NativeValue) -> Result<BsonDocument, EncodeError> {
        match self.to_value(value)? {
            BsonValue::Document(doc) => Ok(doc),
            _ => Err(EncodeError::TopLevel(value.kind())),
        }
    }

    /// Converts a single value through the scalar mapping rules.
    pub fn to_value(&mut self, value: &NativeValue) -> Result<BsonValue, EncodeError> {
        match value {
            NativeValue::Bson(v) => Ok(v.clone()),
            NativeValue::Integer(n) => Ok(int_value(*n)),
            NativeValue::UInteger(n) => {
                if *n <= i32::MAX as u64 {
                    Ok(BsonValue::Int32(*n as i32))
                } else if *n <= i64::MAX as u64 {
                    Ok(BsonValue::Int64(*n as i64))
                } else {
                    Err(EncodeError::IntegerOverflow)
                }
            }
            NativeValue::Float(f) => Ok(BsonValue::Float(*f)),
            NativeValue::Bool(b) => Ok(BsonValue::Boolean(*b)),
            NativeValue::Null => Ok(BsonValue::Null),
            NativeValue::Str(s) => Ok(BsonValue::Str(s.clone())),
            NativeValue::DateTime(dt) => Ok(BsonValue::DateTime(*dt)),
            NativeValue::ObjectId(id) => Ok(BsonValue::ObjectId(*id)),
            NativeValue::Array(items) => {
                self.guarded(Rc::as_ptr(items) as *const (), |enc| {
                    let items = items.borrow();
                    let mut out = Vec::with_capacity(items.len());
                    for item in items.iter() {
                        out.push(enc.to_value(item)?);
                    }
                    Ok(BsonValue::Array(out))
                })
            }
            NativeValue::Object(fields) => {
                self.guarded(Rc::as_ptr(fields) as *const (), |enc| {
                    let fields = fields.borrow();
                    let mut out = BsonDocument::with_capacity(fields.len());
                    for (key, item) in fields.iter() {
                        out.push((key.clone(), enc.to_value(item)?));
                    }
                    Ok(BsonValue::Document(out))
                })
            }
            NativeValue::Custom(object) => {
                self.guarded(Rc::as_ptr(object) as *const (), |enc| {
                    let replacement = match enc.to_encodable {
                        Some(hook) => hook(object),
                        None => object.to_bson(),
                    };
                    match replacement {
                        Ok(replacement) => enc.to_value(&replacement),
                        Err(err) => Err(EncodeError::Unsupported {
                            kind: "custom object",
                            source: Some(Box::new(err)),
                        }),
                    }
                })
            }
        }
    }

    /// Runs `f` with `ptr` on the in-progress stack; a repeat visit of the
    /// same allocation is a cycle.
    fn guarded<T>(
        &mut self,
        ptr: *const (),
        f: impl FnOnce(&mut Self) -> Result<T, EncodeError>,
    ) -> Result<T, EncodeError> {
        if self.stack.contains(&ptr) {
            return Err(EncodeError::CyclicReference);
        }
        self.stack.push(ptr);
        let result = f(self);
        self.stack.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_width_selection() {
        assert_eq!(int_value(0), BsonValue::Int32(0));
        assert_eq!(int_value(i32::MAX as i64), BsonValue::Int32(i32::MAX));
        assert_eq!(int_value(i32::MIN as i64), BsonValue::Int32(i32::MIN));
        assert_eq!(
            int_value(i32::MAX as i64 + 1),
            BsonValue::Int64(i32::MAX as i64 + 1)
        );
        assert_eq!(
            int_value(i32::MIN as i64 - 1),
            BsonValue::Int64(i32::MIN as i64 - 1)
        );
        assert_eq!(int_value(i64::MAX), BsonValue::Int64(i64::MAX));
    }

    #[test]
    fn shared_but_acyclic_nodes_are_allowed() {
        // The same allocation appearing twice as a sibling is not a cycle.
        let shared = NativeValue::array(vec![NativeValue::Integer(1)]);
        let root = NativeValue::object(vec![
            ("a".to_string(), shared.clone()),
            ("b".to_string(), shared),
        ]);
        let mut encoder = NativeEncoder::new(None);
        let doc = encoder.to_document(&root).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc[0].1, doc[1].1);
    }

    #[test]
    fn self_referential_object_is_cyclic() {
        let root = NativeValue::object(vec![]);
        if let NativeValue::Object(fields) = &root {
            fields
                .borrow_mut()
                .push(("me".to_string(), root.clone()));
        }
        let mut encoder = NativeEncoder::new(None);
        assert!(matches!(
            encoder.to_document(&root),
            Err(EncodeError::CyclicReference)
        ));
    }
}
