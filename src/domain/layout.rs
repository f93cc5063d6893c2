//! Nested, serde-friendly description of a binary tree.
//!
//! `TreeLayout` is the shape tree files are written in:
//!
//! ```toml
//! [root]
//! value = "5"
//! [root.left]
//! value = "3"
//! [root.right]
//! value = "8"
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::arena::{NodeArena, NodeId};
use crate::domain::error::NodeResult;

/// A subtree spelled out as nested values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeLayout<V = String> {
    pub value: V,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<TreeLayout<V>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<TreeLayout<V>>>,
}

/// Top-level tree file; a missing `root` is the empty tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDocument<V = String> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<TreeLayout<V>>,
}

impl<V> Default for TreeDocument<V> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<V> TreeLayout<V> {
    pub fn leaf(value: V) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }

    pub fn with_left(mut self, left: TreeLayout<V>) -> Self {
        self.left = Some(Box::new(left));
        self
    }

    pub fn with_right(mut self, right: TreeLayout<V>) -> Self {
        self.right = Some(Box::new(right));
        self
    }
}

impl<V: Clone> TreeLayout<V> {
    /// Allocates this layout as a new tree in `arena` and returns its root.
    ///
    /// Nothing is left behind in the arena if an allocation fails.
    pub fn build_into(&self, arena: &mut NodeArena<V>) -> NodeResult<NodeId> {
        let root = arena.new_node(self.value.clone())?;
        if let Err(e) = self.build_children(arena, root) {
            arena.clear(&mut Some(root));
            return Err(e);
        }
        Ok(root)
    }

    fn build_children(&self, arena: &mut NodeArena<V>, id: NodeId) -> NodeResult<()> {
        if let Some(left) = &self.left {
            let child = arena.add_left_value(id, left.value.clone())?;
            left.build_children(arena, child)?;
        }
        if let Some(right) = &self.right {
            let child = arena.add_right_value(id, right.value.clone())?;
            right.build_children(arena, child)?;
        }
        Ok(())
    }

    /// Reads the subtree at `root` back into nested form.
    pub fn from_subtree(arena: &NodeArena<V>, root: Option<NodeId>) -> Option<Self> {
        let node = arena.get(root?)?;
        Some(Self {
            value: node.value.clone(),
            left: Self::from_subtree(arena, node.left()).map(Box::new),
            right: Self::from_subtree(arena, node.right()).map(Box::new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::NodeError;

    fn sample() -> TreeLayout<i32> {
        TreeLayout::leaf(5)
            .with_left(TreeLayout::leaf(3).with_right(TreeLayout::leaf(4)))
            .with_right(TreeLayout::leaf(8))
    }

    #[test]
    fn given_layout_when_built_then_links_are_consistent() {
        let mut arena = NodeArena::new();
        let root = sample().build_into(&mut arena).unwrap();

        assert_eq!(arena.size(Some(root)), 4);
        assert!(arena.is_consistent(Some(root)));
        assert_eq!(TreeLayout::from_subtree(&arena, Some(root)), Some(sample()));
    }

    #[test]
    fn given_small_limit_when_building_then_arena_left_empty() {
        let mut arena = NodeArena::with_limits(0, Some(3));

        let result = sample().build_into(&mut arena);

        assert_eq!(result, Err(NodeError::CapacityExhausted { limit: 3 }));
        assert!(arena.is_empty());
    }

    #[test]
    fn given_toml_without_root_when_parsed_then_empty_document() {
        let doc: TreeDocument = toml::from_str("").unwrap();
        assert_eq!(doc, TreeDocument::default());
    }
}
