//! The schema registry: pointer store, pointer tree, and type exceptions.

use std::collections::HashSet;

use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::derive::{
    self, ANY_SCHEMA, BOOLEAN_SCHEMA, INTEGER_SCHEMA, NUMBER_SCHEMA, STRING_SCHEMA,
};
use crate::error::RegistryError;
use crate::pointer::Pointer;
use crate::schema::Schema;
use crate::shape::TypeShape;
use crate::store::PointerStore;
use crate::tree::PointerTree;

/// Builtin scalar schemas registered by [`SchemaRegistry::with_builtins`].
const BUILTIN_SCHEMAS: &[(&str, &str)] = &[
    ("integer", INTEGER_SCHEMA),
    ("number", NUMBER_SCHEMA),
    ("string", STRING_SCHEMA),
    ("boolean", BOOLEAN_SCHEMA),
    ("anything", ANY_SCHEMA),
];

/// A collection of derived schemas addressed by canonical pointers.
///
/// The registry owns one flat [`PointerStore`] and one [`PointerTree`] rooted
/// at a caller-supplied base pointer (which may be the root pointer), plus
/// the set of type-exception names that force string coercion. Create one
/// registry per document-generation pass; it is not synchronized, so a
/// concurrent owner must serialize access itself.
#[derive(Debug)]
pub struct SchemaRegistry {
    store: PointerStore,
    tree: PointerTree,
    base: Pointer,
    type_exceptions: HashSet<String>,
    in_flight: HashSet<String>,
}

impl SchemaRegistry {
    /// An empty registry whose resolved document starts at `base`.
    pub fn new(base: Pointer) -> Self {
        let mut tree = PointerTree::new(Pointer::root());
        tree.insert(&base);
        Self {
            store: PointerStore::new(),
            tree,
            base,
            type_exceptions: HashSet::new(),
            in_flight: HashSet::new(),
        }
    }

    /// A registry with the five builtin scalar schemas pre-registered under
    /// `base/integer`, `base/number`, `base/string`, `base/boolean`, and
    /// `base/anything`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Encoding` if a builtin body fails to decode.
    pub fn with_builtins(base: Pointer) -> Result<Self, RegistryError> {
        let mut registry = Self::new(base);
        for (name, body) in BUILTIN_SCHEMAS {
            let schema = Schema::from_bytes(body.as_bytes())
                .map_err(|source| RegistryError::Encoding { source })?;
            let pointer = registry.base.child(*name);
            registry.insert_schema(&pointer, schema);
        }
        Ok(registry)
    }

    /// The base pointer resolution starts from.
    pub fn base(&self) -> &Pointer {
        &self.base
    }

    /// Derive and register a schema for `shape`, returning the canonical
    /// pointer to embed as a `$ref` and the canonical type name.
    ///
    /// Registration is idempotent: a second call for an already-known type
    /// returns the same pointer, costing only name and pointer derivation.
    /// With `as_string` set the type is registered under the fixed string
    /// schema regardless of its shape, unless it is a record that is not a
    /// declared exception.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnsupportedType` for kinds no schema can
    /// represent, or `RegistryError::Encoding` if an assembled body fails to
    /// encode. A failed registration persists nothing for the failing type.
    pub fn register_type(
        &mut self,
        shape: &TypeShape,
        as_string: bool,
    ) -> Result<(Pointer, String), RegistryError> {
        let (pointer, name) = derive::derive(self, shape, as_string)?;
        debug!(pointer = %pointer, name = %name, "registered type schema");
        Ok((pointer, name))
    }

    /// Force string coercion for a type: every future derivation of it takes
    /// the string branch regardless of its structural shape.
    ///
    /// One level of reference indirection is unwrapped before the canonical
    /// name is recorded.
    pub fn add_type_exception(&mut self, shape: &TypeShape) {
        let shape = match shape {
            TypeShape::Reference(inner) => inner.as_ref(),
            other => other,
        };
        self.type_exceptions.insert(shape.canonical_name());
    }

    /// Store an externally-built schema under `pointer` and index it in the
    /// tree. First write wins, as with derived registrations.
    pub fn insert_schema(&mut self, pointer: &Pointer, schema: Schema) {
        self.store.set(pointer, schema);
        self.tree.insert(pointer);
    }

    /// Resolve the subtree at the base pointer into one JSON document,
    /// inlining every registered schema.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::MissingSchema` when no tree node exists at
    /// the base pointer.
    pub fn resolve_document(&self) -> Result<Value, RegistryError> {
        let node = self
            .tree
            .find(&self.base)
            .ok_or_else(|| RegistryError::MissingSchema {
                pointer: self.base.to_string(),
            })?;
        debug!(base = %self.base, "resolving schema document");
        Ok(node.resolve(&self.store))
    }

    pub fn store(&self) -> &PointerStore {
        &self.store
    }

    pub fn tree(&self) -> &PointerTree {
        &self.tree
    }

    pub(crate) fn pointer_for(&self, name: &str) -> Pointer {
        self.base.child(name)
    }

    pub(crate) fn is_type_exception(&self, name: &str) -> bool {
        self.type_exceptions.contains(name)
    }

    pub(crate) fn is_in_flight(&self, pointer: &Pointer) -> bool {
        self.in_flight.contains(&pointer.to_string())
    }

    pub(crate) fn mark_in_flight(&mut self, pointer: &Pointer) {
        self.in_flight.insert(pointer.to_string());
    }

    pub(crate) fn clear_in_flight(&mut self, pointer: &Pointer) {
        self.in_flight.remove(&pointer.to_string());
    }
}

/// Serializes as the fully resolved document, so a registry can be embedded
/// directly in a components section.
impl Serialize for SchemaRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let document = self.resolve_document().map_err(serde::ser::Error::custom)?;
        document.serialize(serializer)
    }
}
