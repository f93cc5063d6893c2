/*
Display helpers for subtrees.

`termtree` draws a rose tree, so left/right positions are carried in the
labels ("L: 3", "R: 8") instead of by child order alone.
 */
use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeArena, NodeId};

pub trait SubtreeConvert {
    fn to_tree_string(&self, root: Option<NodeId>) -> Tree<String>;
}

impl<T: Display> SubtreeConvert for NodeArena<T> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, root: Option<NodeId>) -> Tree<String> {
        match root.and_then(|idx| self.get(idx).map(|node| (idx, node))) {
            Some((root_idx, node)) => {
                let mut tree = Tree::new(node.value.to_string());

                fn build_tree<T: Display>(
                    arena: &NodeArena<T>,
                    node_idx: NodeId,
                    parent_tree: &mut Tree<String>,
                ) {
                    let children = [("L", arena.left(node_idx)), ("R", arena.right(node_idx))];
                    for (label, child_idx) in children {
                        if let Some(child_idx) = child_idx {
                            if let Some(value) = arena.value(child_idx) {
                                let mut child_tree = Tree::new(format!("{label}: {value}"));
                                build_tree(arena, child_idx, &mut child_tree);
                                parent_tree.push(child_tree);
                            }
                        }
                    }
                }

                build_tree(self, root_idx, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
