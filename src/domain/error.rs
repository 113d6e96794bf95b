//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::NodeId;

/// Violations of the tree invariants, reported before any mutation happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node not found: {0}")]
    NotFound(NodeId),

    #[error("node id already exists: {0}")]
    DuplicateId(NodeId),

    #[error("cannot move {node} below {parent}: cycle in hierarchy")]
    Cycle { node: NodeId, parent: NodeId },

    #[error("key '{key}' already used below {parent}")]
    DuplicateKey { parent: NodeId, key: String },

    #[error("no node at path: '{0}'")]
    InvalidPath(String),

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
