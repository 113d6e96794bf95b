//! Domain layer: tree store and the views built on it
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod browser;
pub mod error;
pub mod json;
pub mod node;
pub mod render;
pub mod traversal;
pub mod tree;

pub use browser::{coerce_attr, is_valid_attr_name, TreeBrowser};
pub use error::{TreeError, TreeResult};
pub use json::{JsonNode, JsonTree};
pub use node::{Key, NodeId, TreeNode};
pub use render::{LineStyle, RenderOptions};
pub use traversal::{Order, Traversal};
pub use tree::{DeleteMode, Tree};
