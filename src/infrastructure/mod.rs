//! Infrastructure layer: interactive I/O implementations
//!
//! This layer implements the terminal-facing boundary traits.

pub mod error;
pub mod traits;

pub use error::InfraError;
pub use traits::{SelectionItem, Selector, SkimSelector};
