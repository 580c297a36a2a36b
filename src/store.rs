//! Flat pointer-to-schema storage.

use std::collections::HashMap;

use tracing::trace;

use crate::pointer::Pointer;
use crate::schema::Schema;

/// Key used for the root pointer, whose canonical rendering is empty.
const ROOT_KEY: &str = "#";

/// A flat map from canonical pointer strings to schemas.
///
/// Insertion is first-write-wins: a second [`set`](PointerStore::set) for a
/// key that is already present is a no-op. Re-registering a type therefore
/// always keeps its first-derived schema.
#[derive(Debug, Default)]
pub struct PointerStore {
    entries: HashMap<String, Schema>,
}

impl PointerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `schema` under `pointer` unless the key is already present.
    pub fn set(&mut self, pointer: &Pointer, schema: Schema) {
        let key = key_for(pointer);
        if self.entries.contains_key(&key) {
            trace!(pointer = %key, "schema already stored, keeping first write");
            return;
        }
        self.entries.insert(key, schema);
    }

    /// Look up the schema stored under `pointer`.
    pub fn get(&self, pointer: &Pointer) -> Option<&Schema> {
        self.entries.get(&key_for(pointer))
    }

    pub fn contains(&self, pointer: &Pointer) -> bool {
        self.entries.contains_key(&key_for(pointer))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn key_for(pointer: &Pointer) -> String {
    if pointer.is_root() {
        ROOT_KEY.to_string()
    } else {
        pointer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> Schema {
        Schema::from_value(value)
    }

    #[test]
    fn first_write_wins() {
        let mut store = PointerStore::new();
        let ptr = Pointer::from_segments(["components", "schemas", "foo"]);

        store.set(&ptr, schema(json!({ "type": "string" })));
        store.set(&ptr, schema(json!({ "type": "integer" })));

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(&ptr).unwrap().value(),
            &json!({ "type": "string" })
        );
    }

    #[test]
    fn get_missing_returns_none() {
        let store = PointerStore::new();
        assert!(store.get(&Pointer::from_segments(["nope"])).is_none());
    }

    #[test]
    fn root_pointer_uses_sentinel_key() {
        let mut store = PointerStore::new();
        store.set(&Pointer::root(), schema(json!({})));

        assert!(store.contains(&Pointer::root()));
        assert_eq!(store.get(&Pointer::root()).unwrap().value(), &json!({}));
        // A distinct single-segment pointer must not collide with the root.
        assert!(!store.contains(&Pointer::from_segments(["#"])));
    }
}
