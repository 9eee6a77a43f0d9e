//! Hierarchical metadata tree attached to a run table
//!
//! A node has an optional string value, string attributes and named
//! children. Paths are `/`-separated (`QC/history/event_1`). Children are
//! kept in a `BTreeMap`, so serialization order is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One node of the metadata tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attrs: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    children: BTreeMap<String, MetaNode>,
}

impl MetaNode {
    /// Creates an empty node
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the node at `path` for reading. Empty path returns `self`.
    pub fn open(&self, path: &str) -> Option<&MetaNode> {
        segments(path).try_fold(self, |node, name| node.children.get(name))
    }

    /// Opens the node at `path` for update, creating missing nodes.
    pub fn open_update(&mut self, path: &str) -> &mut MetaNode {
        segments(path).fold(self, |node, name| {
            node.children.entry(name.to_string()).or_default()
        })
    }

    /// Returns true if a node exists at `path`
    pub fn exists(&self, path: &str) -> bool {
        self.open(path).is_some()
    }

    /// Immediate child by name
    pub fn child(&self, name: &str) -> Option<&MetaNode> {
        self.children.get(name)
    }

    /// Names of immediate children, in order
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Number of immediate children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Removes and returns a child
    pub fn remove_child(&mut self, name: &str) -> Option<MetaNode> {
        self.children.remove(name)
    }

    /// Node value, if one was written
    pub fn read(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Overwrites the node value
    pub fn write(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// Attribute by key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Writes an attribute
    pub fn write_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Replaces this node's value, attributes and children with a copy of `src`
    pub fn copy_from(&mut self, src: &MetaNode) {
        *self = src.clone();
    }

    /// Writes `value` into a child node named `name`
    pub fn write_child(&mut self, name: &str, value: impl Into<String>) {
        self.open_update(name).write(value);
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
