//! `serde_json` interop for native values.

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::EncodeError;
use crate::native::NativeValue;
use crate::values::BsonValue;

/// Converts a `serde_json::Value` into a [`NativeValue`].
pub fn json_to_native(value: &JsonValue) -> NativeValue {
    match value {
        JsonValue::Null => NativeValue::Null,
        JsonValue::Bool(b) => NativeValue::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                NativeValue::Integer(i)
            } else if let Some(u) = n.as_u64() {
                NativeValue::UInteger(u)
            } else {
                NativeValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => NativeValue::Str(s.clone()),
        JsonValue::Array(items) => NativeValue::array(items.iter().map(json_to_native).collect()),
        JsonValue::Object(map) => NativeValue::object(
            map.iter()
                .map(|(key, item)| (key.clone(), json_to_native(item)))
                .collect(),
        ),
    }
}

/// Converts a [`NativeValue`] back to a `serde_json::Value`.
///
/// ObjectIds render as hex strings and instants as RFC 3339 strings; typed
/// BSON values, custom objects, and non-finite floats have no JSON
/// counterpart and fail.
pub fn native_to_json(value: &NativeValue) -> Result<JsonValue, EncodeError> {
    Ok(match value {
        NativeValue::Null => JsonValue::Null,
        NativeValue::Bool(b) => JsonValue::Bool(*b),
        NativeValue::Integer(n) => JsonValue::Number(Number::from(*n)),
        NativeValue::UInteger(n) => JsonValue::Number(Number::from(*n)),
        NativeValue::Float(f) => match Number::from_f64(*f) {
            Some(n) => JsonValue::Number(n),
            None => return Err(EncodeError::unsupported("non-finite float")),
        },
        NativeValue::Str(s) => JsonValue::String(s.clone()),
        NativeValue::DateTime(dt) => JsonValue::String(dt.to_rfc3339()),
        NativeValue::ObjectId(id) => JsonValue::String(id.to_hex()),
        NativeValue::Array(items) => {
            let items = items.borrow();
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(native_to_json(item)?);
            }
            JsonValue::Array(out)
        }
        NativeValue::Object(fields) => {
            let fields = fields.borrow();
            let mut map = Map::with_capacity(fields.len());
            for (key, item) in fields.iter() {
                map.insert(key.clone(), native_to_json(item)?);
            }
            JsonValue::Object(map)
        }
        NativeValue::Bson(BsonValue::Null) => JsonValue::Null,
        NativeValue::Bson(_) => return Err(EncodeError::unsupported("bson value")),
        NativeValue::Custom(_) => return Err(EncodeError::unsupported("custom object")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_native_roundtrip() {
        let value = json!({
            "a": 1,
            "b": [true, null, "x", 2.5],
            "c": {"nested": -7}
        });
        let native = json_to_native(&value);
        let back = native_to_json(&native).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let native = NativeValue::Float(f64::NAN);
        assert!(native_to_json(&native).is_err());
    }
}
