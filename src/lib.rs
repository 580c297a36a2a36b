//! OpenRPC Schema Registry
//!
//! Derives JSON Schema documents from explicit type descriptors and
//! assembles them into a deduplicated, `$ref`-linked components section.
//!
//! Types are described as [`TypeShape`] values and registered with a
//! [`SchemaRegistry`]. Each registration derives a schema body, stores it
//! under a canonical JSON Pointer, and records the pointer in a tree that
//! mirrors the nesting of the final document. Composite types reference
//! their element and field schemas by pointer instead of inlining them, so
//! repeated types resolve to a single shared definition.
//!
//! # Example
//!
//! ```
//! use openrpc_schema::{Field, Pointer, SchemaRegistry, TypeShape};
//!
//! let base = Pointer::parse("/components/schemas").unwrap();
//! let mut registry = SchemaRegistry::new(base);
//!
//! let person = TypeShape::record(
//!     "demo.Person",
//!     vec![
//!         Field::new("Name", TypeShape::string()),
//!         Field::new("Age", TypeShape::integer()),
//!     ],
//! );
//!
//! let (pointer, name) = registry.register_type(&person, false).unwrap();
//! assert_eq!(name, "demo.Person");
//! assert_eq!(pointer.to_string(), "/components/schemas/demo.Person");
//!
//! // Field schemas were registered alongside and are linked by $ref.
//! let document = registry.resolve_document().unwrap();
//! assert_eq!(
//!     document["demo.Person"]["properties"]["Age"]["$ref"],
//!     serde_json::json!("#/components/schemas/integer"),
//! );
//! assert_eq!(document["integer"]["type"], serde_json::json!("integer"));
//! ```
//!
//! # Derivation rules
//!
//! Dispatch on the (reference-unwrapped) shape, first match wins:
//!
//! | Shape | Body |
//! |-------|------|
//! | record, not an exception | `{"type":"object","properties":{field: $ref}}` |
//! | string-coerced or exception | fixed string schema |
//! | sequence | `{"type":"array","items": $ref}` + `maxItems` when fixed-length |
//! | map | `{"type":"object","patternProperties":{"^.+$": $ref}}` |
//! | scalar / dynamic | fixed body from the constant table |
//! | anything else | `RegistryError::UnsupportedType` |

mod derive;
mod document;
mod error;
mod pointer;
mod registry;
mod schema;
mod shape;
mod store;
mod tree;

pub use derive::{
    ANY_SCHEMA, BOOLEAN_SCHEMA, INTEGER_SCHEMA, NULL_SCHEMA, NUMBER_SCHEMA, STRING_SCHEMA,
};
pub use document::{
    Components, Contact, ContentDescriptor, Document, ErrorObject, Example, ExamplePairing,
    ExternalDocs, Info, License, Link, Method, Server, ServerVariable, Tag, OPENRPC_VERSION,
};
pub use error::{ParseError, RegistryError};
pub use pointer::Pointer;
pub use registry::SchemaRegistry;
pub use schema::Schema;
pub use shape::{Field, ScalarKind, TypeShape};
pub use store::PointerStore;
pub use tree::PointerTree;
