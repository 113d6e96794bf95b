//! Tests for loading JSON and TOML documents from disk

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use lighttree::application::{load_json_tree, ApplicationError, DocumentFormat};
use lighttree::util::testing;

/// Helper to create document files for testing
fn create_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    testing::init_test_setup();
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write document");
    path
}

#[test]
fn given_json_file_when_loading_then_tree_mirrors_document() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = create_file(&temp, "doc.json", r#"{"a": {"b": [1, 2]}, "c": "x"}"#);

    // Act
    let tree = load_json_tree(&path, ".").unwrap();

    // Assert
    assert_eq!(tree.len(), 6);
    assert_eq!(tree.to_value(), Some(json!({"a": {"b": [1, 2]}, "c": "x"})));
    assert!(tree.id_by_path("a.b.1").is_ok());
}

#[test]
fn given_toml_file_when_loading_then_tables_become_inner_nodes() {
    let temp = TempDir::new().unwrap();
    let path = create_file(
        &temp,
        "doc.toml",
        "title = \"demo\"\n\n[server]\nhost = \"localhost\"\nports = [80, 443]\n",
    );

    let tree = load_json_tree(&path, ".").unwrap();

    assert_eq!(DocumentFormat::of(&path), DocumentFormat::Toml);
    let ports = tree.id_by_path("server.ports").unwrap();
    assert_eq!(tree.value_at(ports.as_str()).unwrap(), json!([80, 443]));
}

#[test]
fn given_custom_separator_when_loading_then_paths_use_it() {
    let temp = TempDir::new().unwrap();
    let path = create_file(&temp, "doc.json", r#"{"a": {"b": true}}"#);

    let tree = load_json_tree(&path, "/").unwrap();

    let id = tree.id_by_path("a/b").unwrap();
    assert_eq!(tree.path(id.as_str()).unwrap(), "a/b");
}

#[test]
fn given_missing_file_when_loading_then_operation_failed_with_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.json");

    let err = load_json_tree(&path, ".").unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn given_invalid_json_when_loading_then_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = create_file(&temp, "broken.json", "{\"a\": ");

    let err = load_json_tree(&path, ".").unwrap_err();

    assert!(matches!(err, ApplicationError::Parse { .. }));
}

#[test]
fn given_invalid_toml_when_loading_then_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = create_file(&temp, "broken.toml", "[server\nhost = 1\n");

    let err = load_json_tree(&path, ".").unwrap_err();

    assert!(matches!(err, ApplicationError::Parse { .. }));
}

#[test]
fn given_unknown_extension_when_detecting_format_then_json() {
    assert_eq!(DocumentFormat::of(std::path::Path::new("tree.data")), DocumentFormat::Json);
}
