//! JSON codec for typed values
//!
//! Raw values are plain JSON. Unknown has no JSON form of its own, so it
//! is written as the marker object `{"$unknown": true}`. No attribute name
//! may start with `$`, so the marker never collides with a real object.

use crate::error::{CodecError, Result};
use crate::path::AttributePath;
use crate::value::{Type, Value};
use serde_json::{Map, Number};
use std::collections::BTreeMap;

/// Key of the marker object standing in for an unknown value
pub const UNKNOWN_MARKER: &str = "$unknown";

/// The raw JSON form of an unknown value
pub fn unknown_marker() -> serde_json::Value {
    let mut map = Map::new();
    map.insert(UNKNOWN_MARKER.to_string(), serde_json::Value::Bool(true));
    serde_json::Value::Object(map)
}

/// Whether `raw` is the unknown marker object
pub fn is_unknown_marker(raw: &serde_json::Value) -> bool {
    raw.as_object().is_some_and(|map| {
        map.len() == 1 && map.get(UNKNOWN_MARKER) == Some(&serde_json::Value::Bool(true))
    })
}

/// Decode `raw` against the type node `ty`
///
/// Fails when the shape disagrees: wrong scalar kind, or an object with
/// extra or missing keys.
pub fn decode(raw: &serde_json::Value, ty: &Type) -> Result<Value> {
    decode_at(raw, ty, &AttributePath::root())
}

fn decode_at(raw: &serde_json::Value, ty: &Type, path: &AttributePath) -> Result<Value> {
    use serde_json::Value as Raw;

    if is_unknown_marker(raw) {
        return Ok(Value::Unknown);
    }

    match (raw, ty) {
        (Raw::Null, _) => Ok(Value::Null),
        (Raw::String(s), Type::String) => Ok(Value::String(s.clone())),
        (Raw::Number(n), Type::Number) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| CodecError::NonFiniteNumber { path: path.clone() }),
        (Raw::Array(items), Type::List(elem)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| decode_at(item, elem, &path.join_index(i)))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        (Raw::Object(map), Type::Object(types)) => {
            if let Some(extra) = map.keys().find(|k| !types.contains_key(*k)) {
                return Err(CodecError::UnexpectedAttribute {
                    path: path.join_attribute(extra),
                });
            }
            let mut attrs = BTreeMap::new();
            for (name, attr_ty) in types {
                let attr_path = path.join_attribute(name);
                let attr_raw = map
                    .get(name)
                    .ok_or_else(|| CodecError::MissingAttribute {
                        path: attr_path.clone(),
                    })?;
                attrs.insert(name.clone(), decode_at(attr_raw, attr_ty, &attr_path)?);
            }
            Ok(Value::Object(attrs))
        }
        _ => Err(CodecError::Mismatch {
            path: path.clone(),
            expected: ty.kind().to_string(),
            found: raw_kind(raw).to_string(),
        }),
    }
}

/// Encode `value` as raw JSON under the type node `ty`
///
/// `decode(&encode(v, ty)?, ty) == v` for every `v` that conforms to `ty`.
/// Fails when the value has drifted from the type.
pub fn encode(value: &Value, ty: &Type) -> Result<serde_json::Value> {
    encode_at(value, ty, &AttributePath::root())
}

fn encode_at(value: &Value, ty: &Type, path: &AttributePath) -> Result<serde_json::Value> {
    use serde_json::Value as Raw;

    match (value, ty) {
        (Value::Null, _) => Ok(Raw::Null),
        (Value::Unknown, _) => Ok(unknown_marker()),
        (Value::String(s), Type::String) => Ok(Raw::String(s.clone())),
        (Value::Number(n), Type::Number) => encode_number(*n)
            .map(Raw::Number)
            .ok_or_else(|| CodecError::NonFiniteNumber { path: path.clone() }),
        (Value::List(items), Type::List(elem)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| encode_at(item, elem, &path.join_index(i)))
            .collect::<Result<Vec<_>>>()
            .map(Raw::Array),
        (Value::Object(attrs), Type::Object(types)) => {
            if let Some(extra) = attrs.keys().find(|k| !types.contains_key(*k)) {
                return Err(CodecError::UnexpectedAttribute {
                    path: path.join_attribute(extra),
                });
            }
            let mut map = Map::new();
            for (name, attr_ty) in types {
                let attr_path = path.join_attribute(name);
                let attr_value = attrs
                    .get(name)
                    .ok_or_else(|| CodecError::MissingAttribute {
                        path: attr_path.clone(),
                    })?;
                map.insert(name.clone(), encode_at(attr_value, attr_ty, &attr_path)?);
            }
            Ok(Raw::Object(map))
        }
        _ => Err(CodecError::Mismatch {
            path: path.clone(),
            expected: ty.kind().to_string(),
            found: value.kind().to_string(),
        }),
    }
}

/// Whole numbers within the exact integer range are written without a fraction
fn encode_number(n: f64) -> Option<Number> {
    const EXACT: f64 = 9_007_199_254_740_992.0;
    if n.fract() == 0.0 && n.abs() <= EXACT {
        Some(Number::from(n as i64))
    } else {
        Number::from_f64(n)
    }
}

fn raw_kind(raw: &serde_json::Value) -> &'static str {
    match raw {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "object",
    }
}
