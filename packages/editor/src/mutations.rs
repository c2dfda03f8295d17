//! # Structural Mutations
//!
//! Every edit is an [`EditEvent`]: "the value reachable by following
//! `path` from the root becomes `value`". Applying one never touches the
//! input document; it returns a new root.
//!
//! ## Semantics
//!
//! - Empty path: the result is the new value itself (whole-document replace)
//! - Each container on the root-to-path spine is shallow-copied; every
//!   sibling subtree is carried over by reference
//! - Missing intermediates are created from the key kind: object for a
//!   member name, sequence for an index (padded with nulls)
//! - An index more than [`MAX_INDEX_PADDING`] past the end of a sequence
//!   appends at the end instead of padding
//! - A key of the wrong kind for the node it meets replaces that node
//!   with a fresh container of the right kind
//!
//! Nothing here can fail.

use crate::document::{Map, Value};
use crate::path::{Path, PathKey};
use std::sync::Arc;

/// Most nulls an index past the end of a sequence may pad with
pub const MAX_INDEX_PADDING: usize = 1024;

/// A single structural edit
#[derive(Debug, Clone, PartialEq)]
pub struct EditEvent {
    pub path: Path,
    pub value: Value,
}

impl EditEvent {
    pub fn new(path: Path, value: impl Into<Value>) -> Self {
        Self {
            path,
            value: value.into(),
        }
    }

    /// Replace the whole document
    pub fn replace(value: Value) -> Self {
        Self {
            path: Path::root(),
            value,
        }
    }

    /// Produce the next document
    pub fn apply(&self, doc: &Value) -> Value {
        set(doc, &self.path, self.value.clone())
    }
}

/// New document with the value at `path` replaced
pub fn set(doc: &Value, path: &Path, value: Value) -> Value {
    set_keys(doc, path.keys(), value)
}

fn set_keys(node: &Value, keys: &[PathKey], value: Value) -> Value {
    let Some((head, tail)) = keys.split_first() else {
        return value;
    };

    match head {
        PathKey::Field(name) => {
            let child = node.get(name).unwrap_or(&Value::Null);
            let next = set_keys(child, tail, value);

            let mut map = match node {
                Value::Object(map) => Map::clone(map),
                _ => Map::new(),
            };
            // insert keeps the position of an existing key
            map.insert(name.clone(), next);
            Value::Object(Arc::new(map))
        }
        PathKey::Index(index) => {
            let mut items = match node {
                Value::Array(items) => Vec::clone(items),
                _ => Vec::new(),
            };
            let slot = if index.saturating_sub(items.len()) > MAX_INDEX_PADDING {
                items.len()
            } else {
                *index
            };

            let next = set_keys(items.get(slot).unwrap_or(&Value::Null), tail, value);
            if items.len() <= slot {
                items.resize(slot + 1, Value::Null);
            }
            items[slot] = next;
            Value::Array(Arc::new(items))
        }
    }
}

/// Value at `path`, if every step exists
pub fn get<'a>(doc: &'a Value, path: &Path) -> Option<&'a Value> {
    path.keys().iter().try_fold(doc, |node, key| match key {
        PathKey::Field(name) => node.get(name),
        PathKey::Index(index) => node.as_array().and_then(|items| items.get(*index)),
    })
}
