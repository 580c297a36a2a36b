//! Hierarchical pointer index mirroring JSON document nesting.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::trace;

use crate::pointer::Pointer;
use crate::store::PointerStore;

/// A tree of pointers whose shape mirrors the nesting of the resolved
/// document.
///
/// Every pointer ever inserted has a node for each of its path prefixes:
/// inserting `a/b/c` into an empty tree backfills nodes for `a` and `a/b`.
/// Leaf nodes are the only nodes backed by a [`PointerStore`] entry; internal
/// nodes are purely structural and are assembled from their children during
/// resolution.
#[derive(Debug)]
pub struct PointerTree {
    ptr: Pointer,
    nodes: BTreeMap<String, PointerTree>,
}

impl PointerTree {
    pub fn new(ptr: Pointer) -> Self {
        Self {
            ptr,
            nodes: BTreeMap::new(),
        }
    }

    /// The pointer this node was created for.
    pub fn pointer(&self) -> &Pointer {
        &self.ptr
    }

    pub fn is_leaf(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert `pointer` below this node, creating any missing ancestor nodes
    /// first. Re-inserting an existing pointer leaves the tree unchanged.
    ///
    /// Chainable, so a tree can be populated in one expression.
    pub fn insert(&mut self, pointer: &Pointer) -> &mut Self {
        let segments = pointer.segments();
        match segments {
            [] => self,
            [only] => {
                self.nodes
                    .entry(only.clone())
                    .or_insert_with(|| PointerTree::new(pointer.clone()));
                self
            }
            [.., last] => {
                let parent = pointer.parent();
                if let Some(node) = self.find_mut(&parent) {
                    node.nodes
                        .entry(last.clone())
                        .or_insert_with(|| PointerTree::new(pointer.clone()));
                } else {
                    self.insert(&parent);
                    self.insert(pointer);
                }
                self
            }
        }
    }

    /// Descend one segment at a time; `None` the moment any segment is
    /// missing. The root pointer resolves to this node itself.
    ///
    /// Only child keys are compared while descending; a caller that needs
    /// exact-path confirmation compares the found node's own pointer.
    pub fn find(&self, pointer: &Pointer) -> Option<&PointerTree> {
        let mut node = self;
        for segment in pointer.segments() {
            node = node.nodes.get(segment)?;
        }
        Some(node)
    }

    fn find_mut(&mut self, pointer: &Pointer) -> Option<&mut PointerTree> {
        let mut node = self;
        for segment in pointer.segments() {
            node = node.nodes.get_mut(segment)?;
        }
        Some(node)
    }

    /// Recursively resolve this subtree into a JSON value.
    ///
    /// A leaf looks its own pointer up in `store`; a leaf with no backing
    /// schema resolves to `null` rather than failing. An internal node
    /// resolves every child and assembles `{segment: resolved}`.
    pub fn resolve(&self, store: &PointerStore) -> Value {
        if self.nodes.is_empty() {
            trace!(pointer = %self.ptr, "resolving leaf schema");
            return match store.get(&self.ptr) {
                Some(schema) => schema.value().clone(),
                None => Value::Null,
            };
        }

        let mut result = Map::new();
        for (segment, child) in &self.nodes {
            result.insert(segment.clone(), child.resolve(store));
        }
        Value::Object(result)
    }

    /// Structural equality one level deep: own-pointer segments must match
    /// element-wise and the immediate child key sets must be identical.
    /// Grandchildren are not compared.
    pub fn shallow_equals(&self, other: &PointerTree) -> bool {
        self.ptr.segments() == other.ptr.segments()
            && self.nodes.len() == other.nodes.len()
            && self.nodes.keys().all(|k| other.nodes.contains_key(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    fn tree_with_children(ptr: &[&str], children: &[&str]) -> PointerTree {
        let mut tree = PointerTree::new(Pointer::from_segments(ptr.to_vec()));
        for child in children {
            tree.insert(&Pointer::from_segments([*child]));
        }
        tree
    }

    // === Equality ===

    #[test]
    fn equals_with_root_pointer() {
        let a = tree_with_children(&[], &["field1", "field2", "field3"]);
        let b = tree_with_children(&[], &["field1", "field2", "field3"]);
        assert!(a.shallow_equals(&b));
    }

    #[test]
    fn equals_with_nested_pointer() {
        let a = tree_with_children(&["root", "child"], &["field1", "field2", "field3"]);
        let b = tree_with_children(&["root", "child"], &["field1", "field2", "field3"]);
        assert!(a.shallow_equals(&b));
    }

    #[test]
    fn not_equals_different_pointer() {
        let a = tree_with_children(&["root"], &["field1", "field2", "field3"]);
        let b = tree_with_children(&["root", "child"], &["field1", "field2", "field3"]);
        assert!(!a.shallow_equals(&b));
    }

    #[test]
    fn not_equals_different_children() {
        let a = tree_with_children(&["root", "child"], &["field1", "field3"]);
        let b = tree_with_children(&["root", "child"], &["field1", "field2"]);
        assert!(!a.shallow_equals(&b));
    }

    #[test]
    fn not_equals_missing_child() {
        let a = tree_with_children(&["root", "child"], &["field1", "field2", "field3"]);
        let b = tree_with_children(&["root", "child"], &["field1", "field2"]);
        assert!(!a.shallow_equals(&b));
        assert!(!b.shallow_equals(&a));
    }

    // === Find ===

    #[test]
    fn find_descends_inserted_chain() {
        let root = Pointer::from_segments(["root"]);
        let parent = Pointer::from_segments(["root", "parent"]);
        let child = Pointer::from_segments(["root", "parent", "child"]);
        let missing = Pointer::from_segments(["root", "parent", "child", "subchild"]);

        let mut tree = PointerTree::new(Pointer::root());
        tree.insert(&root).insert(&parent).insert(&child);

        assert_eq!(tree.find(&child).unwrap().pointer(), &child);
        assert_eq!(tree.find(&parent).unwrap().pointer(), &parent);
        assert_eq!(tree.find(&root).unwrap().pointer(), &root);
        assert!(tree.find(&missing).is_none());
    }

    #[test]
    fn find_root_returns_self() {
        let tree = PointerTree::new(Pointer::root());
        assert!(tree.find(&Pointer::root()).unwrap().is_leaf());
    }

    // === Insert ===

    #[test]
    fn insert_same_element_is_idempotent() {
        let mut tree = tree_with_children(&["root", "child"], &["field1", "field2", "field3"]);
        tree.insert(&Pointer::from_segments(["field1"]))
            .insert(&Pointer::from_segments(["field2"]))
            .insert(&Pointer::from_segments(["field3"]));

        let expected = tree_with_children(&["root", "child"], &["field1", "field2", "field3"]);
        assert!(tree.shallow_equals(&expected));
    }

    #[test]
    fn insert_backfills_missing_ancestors() {
        let mut tree = PointerTree::new(Pointer::root());
        tree.insert(&Pointer::from_segments(["a", "b", "c"]));

        let a = Pointer::from_segments(["a"]);
        let ab = Pointer::from_segments(["a", "b"]);
        let abc = Pointer::from_segments(["a", "b", "c"]);
        assert_eq!(tree.find(&a).unwrap().pointer(), &a);
        assert_eq!(tree.find(&ab).unwrap().pointer(), &ab);
        assert_eq!(tree.find(&abc).unwrap().pointer(), &abc);
    }

    #[test]
    fn insert_keeps_existing_subtree() {
        let mut tree = PointerTree::new(Pointer::root());
        tree.insert(&Pointer::from_segments(["a", "b"]));
        // Re-inserting the prefix must not clobber the existing child.
        tree.insert(&Pointer::from_segments(["a"]));

        assert!(tree.find(&Pointer::from_segments(["a", "b"])).is_some());
    }

    // === Resolution ===

    #[test]
    fn resolve_leaf_returns_stored_schema() {
        let ptr = Pointer::from_segments(["components", "schemas", "foo"]);
        let mut store = PointerStore::new();
        store.set(&ptr, Schema::from_value(json!({ "type": "string" })));

        let leaf = PointerTree::new(ptr);
        assert_eq!(leaf.resolve(&store), json!({ "type": "string" }));
    }

    #[test]
    fn resolve_dangling_leaf_is_null() {
        let leaf = PointerTree::new(Pointer::from_segments(["nowhere"]));
        assert_eq!(leaf.resolve(&PointerStore::new()), Value::Null);
    }

    #[test]
    fn resolve_assembles_children() {
        let foo = Pointer::from_segments(["schemas", "foo"]);
        let bar = Pointer::from_segments(["schemas", "bar"]);

        let mut store = PointerStore::new();
        store.set(&foo, Schema::from_value(json!({ "type": "string" })));
        store.set(&bar, Schema::from_value(json!({ "type": "integer" })));

        let mut tree = PointerTree::new(Pointer::root());
        tree.insert(&foo).insert(&bar);

        assert_eq!(
            tree.resolve(&store),
            json!({
                "schemas": {
                    "foo": { "type": "string" },
                    "bar": { "type": "integer" }
                }
            })
        );
    }
}
