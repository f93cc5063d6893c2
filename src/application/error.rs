//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::NodeError;

/// Application errors wrap domain errors and add tree-file and config context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Node(#[from] NodeError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid tree file {path}: {message}")]
    TreeFormat { path: PathBuf, message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
