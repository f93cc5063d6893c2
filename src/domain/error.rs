//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Conditions the node layer reports instead of corrupting the tree.
///
/// Everything else (cycles, double attachment, overlapping assign) is a
/// caller obligation and is not detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("stale node handle: {0:?}")]
    Dangling(NodeId),

    #[error("node arena exhausted: limit of {limit} nodes reached")]
    CapacityExhausted { limit: usize },
}

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;
