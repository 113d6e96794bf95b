//! In-memory trees: an identifier-keyed store with move/delete semantics,
//! lazy traversals, ascii rendering, JSON documents as trees and an
//! attribute-style browser.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    DeleteMode, JsonNode, JsonTree, Key, LineStyle, NodeId, Order, RenderOptions, Traversal,
    Tree, TreeBrowser, TreeError, TreeNode, TreeResult,
};
