// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Parameter Tree
//!
//! Dot-path addressed assembly of nested request documents. Every outbound
//! body in this crate is built by writing values at paths like
//! `body.mappings._source` into one of these trees.
//!
//! Writes are create-if-absent: an existing node is never overwritten unless
//! the replacing variant is used, and a replace removes only the node at the
//! written path, leaving sibling paths intact.
//!
//! # Example
//!
//! ```
//! use es_query::params::ParamTree;
//! use serde_json::json;
//!
//! let mut tree = ParamTree::new();
//! tree.set("body.settings.number_of_shards", 1)
//!     .set("body.settings.number_of_replicas", 1)
//!     .set("index", "products");
//!
//! assert_eq!(tree.get("body.settings.number_of_shards"), Some(&json!(1)));
//! ```

use serde_json::{Map, Value};

/// Ordered nested-object tree addressed by dot-delimited paths.
///
/// Sibling order is insertion order, so serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamTree {
    root: Map<String, Value>,
}

impl ParamTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self { root: Map::new() }
    }

    /// Write `value` at `path`, creating intermediate containers as needed.
    ///
    /// If a node already exists at the full path it is left untouched, so
    /// repeated identical calls are idempotent.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        self.write(path, value.into(), false);
        self
    }

    /// Write `value` at `path`, removing any prior node at that exact path
    /// first. Siblings and unrelated subtrees are untouched.
    pub fn set_replace(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        self.write(path, value.into(), true);
        self
    }

    fn write(&mut self, path: &str, value: Value, replace: bool) {
        let mut segments = path.split('.');
        let Some(mut current) = segments.next() else {
            return;
        };
        let mut node = &mut self.root;
        for next in segments {
            let slot = node
                .entry(current.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                // intermediates are always containers in internal use
                *slot = Value::Object(Map::new());
            }
            match slot {
                Value::Object(map) => node = map,
                _ => unreachable!("intermediate was just made a container"),
            }
            current = next;
        }
        if replace || !node.contains_key(current) {
            node.insert(current.to_string(), value);
        }
    }

    /// Read the node at `path`, if present.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut node = self.root.get(first)?;
        for segment in segments {
            node = node.as_object()?.get(segment)?;
        }
        Some(node)
    }

    /// Project the listed top-level keys into a new object, preserving the
    /// tree's own insertion order rather than the order of `keys`.
    #[must_use]
    pub fn pick(&self, keys: &[&str]) -> Map<String, Value> {
        self.root
            .iter()
            .filter(|(k, _)| keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Consume the tree into a JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Borrow the underlying object map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Whether the tree has no top-level keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Remove all nodes.
    pub fn clear(&mut self) {
        self.root.clear();
    }
}
