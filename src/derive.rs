//! Type-to-schema derivation.
//!
//! Maps a [`TypeShape`] to a JSON Schema body, recursively deriving and
//! registering sub-schemas for composite types. Composite bodies never inline
//! their children; they hold `$ref` pointers to the child's registration.

use serde_json::{Map, Value};

use crate::error::RegistryError;
use crate::pointer::Pointer;
use crate::registry::SchemaRegistry;
use crate::schema::Schema;
use crate::shape::{ScalarKind, TypeShape};

// Fixed scalar bodies. Patterns use [0-9] because \d does not survive JSON
// string escaping.
pub const INTEGER_SCHEMA: &str = r#"{ "type": "integer", "pattern": "^[0-9]*$" }"#;
pub const NUMBER_SCHEMA: &str = r#"{ "type": "number", "pattern": "^([0-9]*\\.[0-9]+)$|^([0-9]*)$" }"#;
pub const STRING_SCHEMA: &str = r#"{ "type": "string", "pattern": "(.*)" }"#;
pub const BOOLEAN_SCHEMA: &str = r#"{ "type": "boolean", "pattern": "(true|false)" }"#;
pub const ANY_SCHEMA: &str = "{}";
pub const NULL_SCHEMA: &str = r#"{ "type": "null" }"#;

fn scalar_body(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::Integer => INTEGER_SCHEMA,
        ScalarKind::Number => NUMBER_SCHEMA,
        ScalarKind::String => STRING_SCHEMA,
        ScalarKind::Boolean => BOOLEAN_SCHEMA,
    }
}

fn scalar_schema(body: &str) -> Result<Schema, RegistryError> {
    Schema::from_bytes(body.as_bytes()).map_err(|source| RegistryError::Encoding { source })
}

fn ref_value(pointer: &Pointer) -> Result<Value, RegistryError> {
    serde_json::to_value(pointer).map_err(|source| RegistryError::Encoding { source })
}

/// Derive and register a schema for `shape` under the registry's base path.
///
/// Returns the canonical pointer and name. Idempotent: a pointer already in
/// the store is returned without re-deriving, and a pointer whose derivation
/// is currently in flight (a self-referential type graph) is returned
/// immediately as a forward reference.
pub(crate) fn derive(
    registry: &mut SchemaRegistry,
    shape: &TypeShape,
    as_string: bool,
) -> Result<(Pointer, String), RegistryError> {
    let shape = shape.unwrap_refs();
    let name = shape.canonical_name();
    let pointer = registry.pointer_for(&name);

    if registry.store().contains(&pointer) || registry.is_in_flight(&pointer) {
        return Ok((pointer, name));
    }

    registry.mark_in_flight(&pointer);
    let body = derive_body(registry, shape, &name, as_string);
    registry.clear_in_flight(&pointer);

    // A failed derivation persists nothing for this pointer.
    let schema = body?;
    registry.insert_schema(&pointer, schema);
    Ok((pointer, name))
}

fn derive_body(
    registry: &mut SchemaRegistry,
    shape: &TypeShape,
    name: &str,
    as_string: bool,
) -> Result<Schema, RegistryError> {
    // Dispatch order matters: a record that is not a declared exception is
    // derived structurally even when the caller asked for string coercion.
    let is_record = matches!(shape, TypeShape::Record { .. });
    if registry.is_type_exception(name) || (as_string && !is_record) {
        return scalar_schema(STRING_SCHEMA);
    }

    match shape {
        TypeShape::Record { fields, .. } => {
            let mut properties = Map::new();
            for field in fields {
                let (field_ptr, _) = derive(registry, &field.shape, false)?;
                properties.insert(field.name.clone(), ref_value(&field_ptr)?);
            }

            let mut body = Map::new();
            body.insert("type".to_string(), Value::String("object".to_string()));
            body.insert("properties".to_string(), Value::Object(properties));
            Ok(Schema::from_value(Value::Object(body)))
        }
        TypeShape::Sequence { element, fixed_len } => {
            let (element_ptr, _) = derive(registry, element, false)?;

            let mut body = Map::new();
            body.insert("type".to_string(), Value::String("array".to_string()));
            body.insert("items".to_string(), ref_value(&element_ptr)?);
            if let Some(len) = fixed_len {
                body.insert("maxItems".to_string(), Value::from(*len));
            }
            Ok(Schema::from_value(Value::Object(body)))
        }
        TypeShape::Map { value } => {
            // Map keys are always strings; additionalProperties is left
            // absent, which is equivalent to unconstrained.
            let (value_ptr, _) = derive(registry, value, false)?;

            let mut patterns = Map::new();
            patterns.insert("^.+$".to_string(), ref_value(&value_ptr)?);

            let mut body = Map::new();
            body.insert("type".to_string(), Value::String("object".to_string()));
            body.insert("patternProperties".to_string(), Value::Object(patterns));
            Ok(Schema::from_value(Value::Object(body)))
        }
        TypeShape::Scalar(kind) => scalar_schema(scalar_body(*kind)),
        TypeShape::Dynamic => scalar_schema(ANY_SCHEMA),
        TypeShape::Unsupported { kind } => Err(RegistryError::UnsupportedType {
            kind: kind.clone(),
        }),
        // Already unwrapped by the caller; unwrap again rather than assume.
        TypeShape::Reference(inner) => derive_body(registry, inner.unwrap_refs(), name, as_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fixed_bodies_decode_to_expected_json() {
        let cases = [
            (INTEGER_SCHEMA, json!({ "type": "integer", "pattern": "^[0-9]*$" })),
            (
                NUMBER_SCHEMA,
                json!({ "type": "number", "pattern": "^([0-9]*\\.[0-9]+)$|^([0-9]*)$" }),
            ),
            (STRING_SCHEMA, json!({ "type": "string", "pattern": "(.*)" })),
            (
                BOOLEAN_SCHEMA,
                json!({ "type": "boolean", "pattern": "(true|false)" }),
            ),
            (ANY_SCHEMA, json!({})),
            (NULL_SCHEMA, json!({ "type": "null" })),
        ];

        for (body, expected) in cases {
            let schema = Schema::from_bytes(body.as_bytes()).unwrap();
            assert_eq!(serde_json::to_value(&schema).unwrap(), expected);
        }
    }

    #[test]
    fn number_pattern_contains_literal_backslash() {
        let schema: Value = serde_json::from_str(NUMBER_SCHEMA).unwrap();
        let pattern = schema["pattern"].as_str().unwrap();
        assert_eq!(pattern, r"^([0-9]*\.[0-9]+)$|^([0-9]*)$");
    }
}
