//! Node identity and per-node storage

use std::borrow::Borrow;
use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a node, unique within one tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Random identifier for nodes created without a caller-supplied id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// How a parent refers to one of its children.
///
/// Named children are referenced by their name, all others by their position
/// in the parent's child list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Position(usize),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Position(position) => write!(f, "{}", position),
        }
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    pub(crate) id: NodeId,
    /// Name under which the parent references this node, if any
    pub(crate) name: Option<String>,
    pub(crate) data: T,
    /// Index of parent node in the arena, None for root nodes
    pub(crate) parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub(crate) children: Vec<Index>,
}

impl<T> TreeNode<T> {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_two_generated_ids_when_compared_then_differ() {
        assert_ne!(NodeId::generate(), NodeId::generate());
    }

    #[test]
    fn given_node_id_when_compared_with_str_then_matches_content() {
        let id = NodeId::from("root");
        assert_eq!(id, "root");
        assert_eq!(id.to_string(), "root");
    }

    #[test]
    fn given_keys_when_displayed_then_show_name_or_position() {
        assert_eq!(Key::Name("a".into()).to_string(), "a");
        assert_eq!(Key::Position(3).to_string(), "3");
    }
}
