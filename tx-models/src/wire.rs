//! Conversion between model JSON (snake_case) and wire JSON (PascalCase)
//!
//! Key names convert through the capitalization rule in [`crate::case`];
//! values are untouched. Amount objects and path steps keep their lowercase
//! inner keys on the wire, so conversion consults the field registry and
//! leaves those subtrees alone — registry-driven, not shape-guessed.

use crate::case;
use binary_codec::definitions::{self, type_codes};
use serde_json::{Map, Value};

/// Whether a field's value keeps its model-form inner keys on the wire.
fn keeps_inner_shape(wire_name: &str) -> bool {
    definitions::lookup(wire_name)
        .map(|f| matches!(f.type_code, type_codes::AMOUNT | type_codes::PATH_SET))
        .unwrap_or(false)
}

/// Convert model-form JSON into wire-form JSON (keys to PascalCase).
pub fn to_wire(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, inner) in map {
                let wire_key = case::to_wire_name(key);
                let converted = if keeps_inner_shape(&wire_key) {
                    inner.clone()
                } else {
                    to_wire(inner)
                };
                out.insert(wire_key, converted);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(to_wire).collect()),
        other => other.clone(),
    }
}

/// Convert wire-form JSON back into model-form JSON (keys to snake_case).
pub fn from_wire(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, inner) in map {
                let converted = if keeps_inner_shape(key) {
                    inner.clone()
                } else {
                    from_wire(inner)
                };
                out.insert(case::to_model_name(key), converted);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(from_wire).collect()),
        other => other.clone(),
    }
}
