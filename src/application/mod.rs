//! Application layer: use cases on top of the domain
//!
//! This layer reads documents from disk and turns them into domain trees.

pub mod error;
pub mod error_ext;
pub mod loader;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use loader::{load_json_tree, parse_document, DocumentFormat};
