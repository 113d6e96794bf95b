//! Reading documents from disk into JSON trees.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::JsonTree;
use crate::util::path::PathExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.toml` files are TOML, everything else is read as JSON.
    pub fn of(path: &Path) -> Self {
        if path.is_toml_file() {
            DocumentFormat::Toml
        } else {
            DocumentFormat::Json
        }
    }
}

/// Parses `content` into a JSON value; `path` is only used for error messages.
pub fn parse_document(content: &str, format: DocumentFormat, path: &Path) -> ApplicationResult<Value> {
    let parse_error = |message: String| ApplicationError::Parse {
        path: path.to_path_buf(),
        message,
    };
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        DocumentFormat::Toml => {
            let table: toml::Table = toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
            serde_json::to_value(table).map_err(|e| parse_error(e.to_string()))
        }
    }
}

/// Loads the document at `path` into a tree whose paths use `separator`.
#[instrument(level = "debug")]
pub fn load_json_tree(path: &Path, separator: &str) -> ApplicationResult<JsonTree> {
    let content = fs::read_to_string(path).with_path_context("read tree file", path)?;
    let format = DocumentFormat::of(path);
    let value = parse_document(&content, format, path)?;

    let mut tree = JsonTree::from_value(&value)?;
    tree.set_separator(separator);
    debug!(nodes = tree.len(), ?format, "loaded tree");
    Ok(tree)
}
