//! Domain layer: binary tree nodes and structural algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod layout;
pub mod render;

pub use arena::{swap, AssignReport, BNode, NodeArena, NodeId};
pub use error::{NodeError, NodeResult};
pub use layout::{TreeDocument, TreeLayout};
pub use render::SubtreeConvert;
