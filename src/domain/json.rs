//! Trees built from JSON-like documents.
//!
//! Objects and arrays become inner nodes, every other value a leaf. Object
//! members are named by their key, array elements are positional.

use std::fmt;

use serde_json::{Map, Value};
use tracing::instrument;

use crate::domain::error::TreeResult;
use crate::domain::node::{Key, NodeId};
use crate::domain::tree::Tree;

#[derive(Debug, Clone, PartialEq)]
pub enum JsonNode {
    Object,
    Array,
    Scalar(Value),
}

impl JsonNode {
    fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => JsonNode::Object,
            Value::Array(_) => JsonNode::Array,
            scalar => JsonNode::Scalar(scalar.clone()),
        }
    }
}

impl fmt::Display for JsonNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonNode::Object => f.write_str("{}"),
            JsonNode::Array => f.write_str("[]"),
            JsonNode::Scalar(Value::String(s)) => f.write_str(s),
            JsonNode::Scalar(value) => write!(f, "{}", value),
        }
    }
}

pub type JsonTree = Tree<JsonNode>;

impl Tree<JsonNode> {
    /// Builds a single-rooted tree from `value`, with generated identifiers.
    #[instrument(level = "debug", skip(value))]
    pub fn from_value(value: &Value) -> TreeResult<Self> {
        let mut tree = Tree::new();
        tree.fill(None, None, value)?;
        Ok(tree)
    }

    /// Document of the first root, None for an empty tree.
    pub fn to_value(&self) -> Option<Value> {
        let root = self.root()?.clone();
        self.value_at(root.as_str()).ok()
    }

    /// Document rooted at `id`.
    pub fn value_at(&self, id: &str) -> TreeResult<Value> {
        let idx = self.index_of(id)?;
        Ok(self.build_value(idx))
    }

    fn fill(&mut self, parent: Option<&NodeId>, name: Option<&str>, value: &Value) -> TreeResult<()> {
        let id = NodeId::generate();
        let node = JsonNode::of(value);
        match (parent, name) {
            (Some(parent), Some(name)) => self.insert_named(parent.as_str(), name, id.clone(), node)?,
            (parent, _) => self.insert(parent.map(NodeId::as_str), id.clone(), node)?,
        }
        match value {
            Value::Object(members) => {
                for (key, member) in members {
                    self.fill(Some(&id), Some(key), member)?;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.fill(Some(&id), None, item)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn build_value(&self, idx: generational_arena::Index) -> Value {
        let node = self.node(idx);
        match node.data() {
            JsonNode::Object => {
                let mut members = Map::new();
                for &child in &node.children {
                    let key = match self.key_of(child) {
                        Some(Key::Name(name)) => name,
                        Some(key) => key.to_string(),
                        None => continue,
                    };
                    members.insert(key, self.build_value(child));
                }
                Value::Object(members)
            }
            JsonNode::Array => Value::Array(
                node.children
                    .iter()
                    .map(|&child| self.build_value(child))
                    .collect(),
            ),
            JsonNode::Scalar(value) => value.clone(),
        }
    }
}
