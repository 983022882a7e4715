//! Dynamically typed native values bridged to and from BSON.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::error::EncodeError;
use crate::values::{BsonObjectId, BsonValue};

/// Conversion capability for user-defined objects.
///
/// The encode adapter calls [`ToBson::to_bson`] when it meets a
/// [`NativeValue::Custom`] value and no `to_encodable` hook is installed.
/// The returned value may itself be another custom object; the adapter
/// re-enters the conversion rules on it, and cycles are still caught by
/// the identity stack.
pub trait ToBson {
    fn to_bson(&self) -> Result<NativeValue, EncodeError>;
}

/// A dynamically typed native value.
///
/// Containers and custom objects are shared `Rc` allocations, so object
/// graphs (including cyclic ones) are expressible and the encode adapter
/// can compare nodes by reference identity.
#[derive(Clone)]
pub enum NativeValue {
    Null,
    Bool(bool),
    Integer(i64),
    UInteger(u64),
    Float(f64),
    Str(String),
    DateTime(DateTime<Utc>),
    ObjectId(BsonObjectId),
    Array(Rc<RefCell<Vec<NativeValue>>>),
    Object(Rc<RefCell<Vec<(String, NativeValue)>>>),
    /// An already-typed BSON value, passed through by the adapter.
    Bson(BsonValue),
    /// A user-defined object converted via [`ToBson`] or the
    /// `to_encodable` hook.
    Custom(Rc<dyn ToBson>),
}

impl NativeValue {
    /// Builds a shared array value.
    pub fn array(items: Vec<NativeValue>) -> Self {
        NativeValue::Array(Rc::new(RefCell::new(items)))
    }

    /// Builds a shared object value from insertion-ordered pairs.
    pub fn object(fields: Vec<(String, NativeValue)>) -> Self {
        NativeValue::Object(Rc::new(RefCell::new(fields)))
    }

    /// Wraps a user-defined object.
    pub fn custom(object: Rc<dyn ToBson>) -> Self {
        NativeValue::Custom(object)
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            NativeValue::Null => "null",
            NativeValue::Bool(_) => "bool",
            NativeValue::Integer(_) => "integer",
            NativeValue::UInteger(_) => "unsigned integer",
            NativeValue::Float(_) => "float",
            NativeValue::Str(_) => "string",
            NativeValue::DateTime(_) => "datetime",
            NativeValue::ObjectId(_) => "object id",
            NativeValue::Array(_) => "array",
            NativeValue::Object(_) => "object",
            NativeValue::Bson(_) => "bson value",
            NativeValue::Custom(_) => "custom object",
        }
    }
}

impl fmt::Debug for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeValue::Null => write!(f, "Null"),
            NativeValue::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            NativeValue::Integer(v) => f.debug_tuple("Integer").field(v).finish(),
            NativeValue::UInteger(v) => f.debug_tuple("UInteger").field(v).finish(),
            NativeValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            NativeValue::Str(v) => f.debug_tuple("Str").field(v).finish(),
            NativeValue::DateTime(v) => f.debug_tuple("DateTime").field(v).finish(),
            NativeValue::ObjectId(v) => f.debug_tuple("ObjectId").field(v).finish(),
            NativeValue::Array(v) => f.debug_tuple("Array").field(&v.borrow()).finish(),
            NativeValue::Object(v) => f.debug_tuple("Object").field(&v.borrow()).finish(),
            NativeValue::Bson(v) => f.debug_tuple("Bson").field(v).finish(),
            NativeValue::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl PartialEq for NativeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NativeValue::Null, NativeValue::Null) => true,
            (NativeValue::Bool(a), NativeValue::Bool(b)) => a == b,
            (NativeValue::Integer(a), NativeValue::Integer(b)) => a == b,
            (NativeValue::UInteger(a), NativeValue::UInteger(b)) => a == b,
            (NativeValue::Float(a), NativeValue::Float(b)) => a == b,
            (NativeValue::Str(a), NativeValue::Str(b)) => a == b,
            (NativeValue::DateTime(a), NativeValue::DateTime(b)) => a == b,
            (NativeValue::ObjectId(a), NativeValue::ObjectId(b)) => a == b,
            (NativeValue::Array(a), NativeValue::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (NativeValue::Object(a), NativeValue::Object(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (NativeValue::Bson(a), NativeValue::Bson(b)) => a == b,
            // Custom objects compare by identity only.
            (NativeValue::Custom(a), NativeValue::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for NativeValue {
    fn from(v: bool) -> Self {
        NativeValue::Bool(v)
    }
}

impl From<i32> for NativeValue {
    fn from(v: i32) -> Self {
        NativeValue::Integer(v as i64)
    }
}

impl From<i64> for NativeValue {
    fn from(v: i64) -> Self {
        NativeValue::Integer(v)
    }
}

impl From<u64> for NativeValue {
    fn from(v: u64) -> Self {
        NativeValue::UInteger(v)
    }
}

impl From<f64> for NativeValue {
    fn from(v: f64) -> Self {
        NativeValue::Float(v)
    }
}

impl From<&str> for NativeValue {
    fn from(v: &str) -> Self {
        NativeValue::Str(v.to_owned())
    }
}

impl From<String> for NativeValue {
    fn from(v: String) -> Self {
        NativeValue::Str(v)
    }
}

impl From<DateTime<Utc>> for NativeValue {
    fn from(v: DateTime<Utc>) -> Self {
        NativeValue::DateTime(v)
    }
}

impl From<BsonValue> for NativeValue {
    fn from(v: BsonValue) -> Self {
        NativeValue::Bson(v)
    }
}

/// Key passed to the reviver: a document key, an array index, or the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviverKey<'a> {
    Root,
    Key(&'a str),
    Index(usize),
}

/// Hook mapping an otherwise unencodable object to an encodable value.
pub type ToEncodable = Box<dyn Fn(&Rc<dyn ToBson>) -> Result<NativeValue, EncodeError>>;

/// Hook applied to every value produced by the decode adapter.
pub type Reviver = Box<dyn Fn(ReviverKey<'_>, NativeValue) -> NativeValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality_for_containers() {
        let a = NativeValue::array(vec![1i64.into(), "x".into()]);
        let b = NativeValue::array(vec![1i64.into(), "x".into()]);
        assert_eq!(a, b);

        let c = NativeValue::object(vec![("k".to_string(), NativeValue::Null)]);
        let d = NativeValue::object(vec![("k".to_string(), NativeValue::Bool(false))]);
        assert_ne!(c, d);
    }

    #[test]
    fn custom_objects_compare_by_identity() {
        struct Point;
        impl ToBson for Point {
            fn to_bson(&self) -> Result<NativeValue, EncodeError> {
                Ok(NativeValue::Null)
            }
        }
        let p: Rc<dyn ToBson> = Rc::new(Point);
        let q: Rc<dyn ToBson> = Rc::new(Point);
        assert_eq!(
            NativeValue::custom(Rc::clone(&p)),
            NativeValue::custom(Rc::clone(&p))
        );
        assert_ne!(NativeValue::custom(p), NativeValue::custom(q));
    }
}
