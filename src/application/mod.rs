//! Application layer: tree files and error context
//!
//! This layer connects the domain layer to the filesystem.

pub mod error;
pub mod loader;

pub use error::{ApplicationError, ApplicationResult};
pub use loader::{load_tree, read_document, to_toml, write_tree};
