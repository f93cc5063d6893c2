//! bnode: the node layer of a binary tree
//!
//! Nodes live in a [`domain::NodeArena`] and link to their left child, right
//! child and parent. The arena provides the structural operations a tree
//! container is built from: `size`, `add_left`/`add_right`, `clear`, `copy`,
//! `assign` (structural assign reusing existing nodes) and handle `swap`.
//!
//! ```
//! use bnode::domain::NodeArena;
//!
//! let mut arena = NodeArena::new();
//! let root = arena.new_node(5).unwrap();
//! arena.add_left_value(root, 3).unwrap();
//! arena.add_right_value(root, 8).unwrap();
//! assert_eq!(arena.size(Some(root)), 3);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
