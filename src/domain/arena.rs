//! Arena-backed binary tree nodes and the structural operations on them.
//!
//! A [`NodeArena`] owns every node; a subtree is named by a handle of type
//! `Option<NodeId>` (`None` is the empty subtree). Children are owned through
//! their parent's `left`/`right` links, while `parent` is a plain back-link
//! used for upward navigation only.
//!
//! All walks use explicit work stacks, so degenerate trees (a linked list of
//! left children, say) do not exhaust the thread stack.

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, warn};

use crate::domain::error::{NodeError, NodeResult};

/// Stable identity of a node inside its arena.
pub type NodeId = Index;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Location an assign step writes into: the caller's handle or a child link.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Root,
    Child(NodeId, Side),
}

/// One vertex of a binary tree.
#[derive(Debug, Clone)]
pub struct BNode<T> {
    /// Payload, owned by the node
    pub value: T,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
}

impl<T> BNode<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
            parent: None,
        }
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Structural parent, `None` for a root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Node bookkeeping of a single [`NodeArena::assign`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignReport {
    /// Destination nodes whose value was overwritten in place
    pub reused: usize,
    /// Nodes freshly allocated where the destination had no node
    pub allocated: usize,
    /// Destination nodes destroyed where the source had no node
    pub cleared: usize,
}

/// Owning store for binary tree nodes.
///
/// Handles stay valid until their node is cleared; afterwards the
/// generational index is detectably stale rather than dangling.
#[derive(Debug)]
pub struct NodeArena<T> {
    arena: Arena<BNode<T>>,
    /// Upper bound on live nodes, `None` for unlimited
    max_nodes: Option<usize>,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeArena<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            max_nodes: None,
        }
    }

    /// Creates an arena with pre-allocated slots and an optional node limit.
    ///
    /// Allocating past `max_nodes` fails with [`NodeError::CapacityExhausted`],
    /// which is how allocation failure reaches the caller.
    pub fn with_limits(initial_capacity: usize, max_nodes: Option<usize>) -> Self {
        Self {
            arena: Arena::with_capacity(initial_capacity),
            max_nodes,
        }
    }

    pub fn max_nodes(&self) -> Option<usize> {
        self.max_nodes
    }

    /// Number of live nodes across all trees in this arena.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&BNode<T>> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut BNode<T>> {
        self.arena.get_mut(id)
    }

    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(BNode::left)
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(BNode::right)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(BNode::parent)
    }

    fn alloc(&mut self, value: T) -> NodeResult<NodeId> {
        if let Some(limit) = self.max_nodes {
            if self.arena.len() >= limit {
                return Err(NodeError::CapacityExhausted { limit });
            }
        }
        Ok(self.arena.insert(BNode::new(value)))
    }

    /// Allocates an unlinked node holding `value`.
    #[instrument(level = "trace", skip(self, value))]
    pub fn new_node(&mut self, value: T) -> NodeResult<NodeId> {
        self.alloc(value)
    }

    /// Allocates an unlinked node holding `T::default()`.
    pub fn new_default(&mut self) -> NodeResult<NodeId>
    where
        T: Default,
    {
        self.alloc(T::default())
    }

    /// Counts the nodes of the subtree at `root`; `None` counts as zero.
    ///
    /// A stale handle met during the walk counts as an empty subtree.
    #[instrument(level = "trace", skip(self))]
    pub fn size(&self, root: Option<NodeId>) -> usize {
        let mut count = 0;
        let mut stack: Vec<NodeId> = root.into_iter().collect();

        while let Some(current) = stack.pop() {
            match self.arena.get(current) {
                Some(node) => {
                    count += 1;
                    stack.extend(node.left);
                    stack.extend(node.right);
                }
                None => warn!(?current, "stale handle while sizing subtree"),
            }
        }
        count
    }

    /// Makes `child` the left subtree of `parent` and points its back-link at
    /// `parent`.
    ///
    /// A subtree previously held in the left slot is detached, not freed: the
    /// caller must keep its handle and [`clear`](Self::clear) it, or it stays
    /// allocated until the arena is dropped.
    #[instrument(level = "trace", skip(self))]
    pub fn add_left(&mut self, parent: NodeId, child: Option<NodeId>) -> NodeResult<()> {
        self.attach(parent, Side::Left, child)
    }

    /// Right-hand counterpart of [`add_left`](Self::add_left).
    #[instrument(level = "trace", skip(self))]
    pub fn add_right(&mut self, parent: NodeId, child: Option<NodeId>) -> NodeResult<()> {
        self.attach(parent, Side::Right, child)
    }

    /// Allocates a node for `value` and attaches it as the left child of
    /// `parent`. Returns the new node.
    #[instrument(level = "trace", skip(self, value))]
    pub fn add_left_value(&mut self, parent: NodeId, value: T) -> NodeResult<NodeId> {
        self.attach_value(parent, Side::Left, value)
    }

    /// Allocates a node for `value` and attaches it as the right child of
    /// `parent`. Returns the new node.
    #[instrument(level = "trace", skip(self, value))]
    pub fn add_right_value(&mut self, parent: NodeId, value: T) -> NodeResult<NodeId> {
        self.attach_value(parent, Side::Right, value)
    }

    fn attach(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) -> NodeResult<()> {
        if !self.arena.contains(parent) {
            return Err(NodeError::Dangling(parent));
        }
        if let Some(child) = child {
            let node = self
                .arena
                .get_mut(child)
                .ok_or(NodeError::Dangling(child))?;
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent) {
            *node.child_mut(side) = child;
        }
        Ok(())
    }

    fn attach_value(&mut self, parent: NodeId, side: Side, value: T) -> NodeResult<NodeId> {
        if !self.arena.contains(parent) {
            return Err(NodeError::Dangling(parent));
        }
        let child = self.alloc(value)?;
        self.link(parent, side, child);
        Ok(child)
    }

    /// Sets `parent.side = child` and `child.parent = parent`; both must be live.
    fn link(&mut self, parent: NodeId, side: Side, child: NodeId) {
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent) {
            *node.child_mut(side) = Some(child);
        }
    }

    /// Destroys the subtree at `*root` and resets the handle to `None`.
    ///
    /// Children go before their parent (left, right, node). If the root is
    /// still linked from its parent, that link is reset as well. Clearing an
    /// absent handle is a no-op. Returns the number of destroyed nodes.
    #[instrument(level = "trace", skip(self))]
    pub fn clear(&mut self, root: &mut Option<NodeId>) -> usize {
        let Some(top) = root.take() else {
            return 0;
        };

        if let Some(parent) = self.parent(top) {
            if let Some(node) = self.arena.get_mut(parent) {
                if node.left == Some(top) {
                    node.left = None;
                } else if node.right == Some(top) {
                    node.right = None;
                }
            }
        }

        let mut removed = 0;
        let mut stack = vec![(top, false)];
        while let Some((current, visited)) = stack.pop() {
            if visited {
                if self.arena.remove(current).is_some() {
                    removed += 1;
                }
                continue;
            }
            let Some(node) = self.arena.get(current) else {
                warn!(?current, "stale handle while clearing subtree");
                continue;
            };
            stack.push((current, true));
            // right below left: the left subtree is destroyed first
            stack.extend(node.right.map(|id| (id, false)));
            stack.extend(node.left.map(|id| (id, false)));
        }

        debug!(removed, "cleared subtree");
        removed
    }

    /// Returns `true` when every child below `root` points back at its parent.
    pub fn is_consistent(&self, root: Option<NodeId>) -> bool {
        let mut stack: Vec<NodeId> = root.into_iter().collect();
        while let Some(current) = stack.pop() {
            let Some(node) = self.arena.get(current) else {
                return false;
            };
            for child in [node.left, node.right].into_iter().flatten() {
                if self.parent(child) != Some(current) {
                    return false;
                }
                stack.push(child);
            }
        }
        true
    }

    /// Compares shape and values of `root` here with `other_root` in `other`.
    ///
    /// Node identities and parent links are not compared.
    pub fn subtree_eq(&self, root: Option<NodeId>, other: &Self, other_root: Option<NodeId>) -> bool
    where
        T: PartialEq,
    {
        let mut stack = vec![(root, other_root)];
        while let Some(pair) = stack.pop() {
            match pair {
                (None, None) => {}
                (Some(a), Some(b)) => match (self.arena.get(a), other.arena.get(b)) {
                    (Some(a), Some(b)) if a.value == b.value => {
                        stack.push((a.left, b.left));
                        stack.push((a.right, b.right));
                    }
                    _ => return false,
                },
                _ => return false,
            }
        }
        true
    }
}

impl<T: Clone> NodeArena<T> {
    /// Clones a node's value together with its child links.
    fn snapshot(&self, id: NodeId) -> NodeResult<(T, Option<NodeId>, Option<NodeId>)> {
        self.arena
            .get(id)
            .map(|node| (node.value.clone(), node.left, node.right))
            .ok_or(NodeError::Dangling(id))
    }

    /// Deep-copies the subtree at `source` within this arena.
    ///
    /// The copy shares no nodes with the source and its root has no parent.
    /// If allocation fails midway, the partial copy is destroyed before the
    /// error is returned.
    #[instrument(level = "trace", skip(self))]
    pub fn copy(&mut self, source: Option<NodeId>) -> NodeResult<Option<NodeId>> {
        self.copy_subtree(None, source)
    }

    /// Deep-copies the subtree at `source` in `other` into this arena.
    #[instrument(level = "trace", skip(self, other))]
    pub fn copy_from(
        &mut self,
        other: &Self,
        source: Option<NodeId>,
    ) -> NodeResult<Option<NodeId>> {
        self.copy_subtree(Some(other), source)
    }

    /// `other == None` reads the source from `self`.
    fn copy_subtree(
        &mut self,
        other: Option<&Self>,
        source: Option<NodeId>,
    ) -> NodeResult<Option<NodeId>> {
        let Some(source) = source else {
            return Ok(None);
        };

        let (value, left, right) = other.unwrap_or(&*self).snapshot(source)?;
        let root = self.alloc(value)?;

        let mut stack = Vec::new();
        stack.extend(right.map(|id| (id, root, Side::Right)));
        stack.extend(left.map(|id| (id, root, Side::Left)));

        while let Some((src, parent, side)) = stack.pop() {
            let snapshot = other.unwrap_or(&*self).snapshot(src);
            let step = snapshot
                .and_then(|(value, left, right)| Ok((self.alloc(value)?, left, right)));
            let (copied, left, right) = match step {
                Ok(step) => step,
                Err(e) => {
                    let removed = self.clear(&mut Some(root));
                    debug!(removed, error = %e, "discarded partial copy");
                    return Err(e);
                }
            };
            // the back-link is set only now that the child exists
            self.link(parent, side, copied);
            stack.extend(right.map(|id| (id, copied, Side::Right)));
            stack.extend(left.map(|id| (id, copied, Side::Left)));
        }

        Ok(Some(root))
    }

    /// Makes the subtree at `*dest` equal in shape and values to `source`,
    /// reusing destination nodes wherever both trees have a node.
    ///
    /// - `source` absent: the destination is cleared and `*dest` set to `None`.
    /// - destination absent: a node is allocated for the source value.
    /// - both present: the value is overwritten in place, so the destination
    ///   node keeps its identity.
    ///
    /// Right children are assigned before left ones. Every reached child gets
    /// its back-link pointed at its parent. `source` must not overlap the
    /// destination subtree.
    ///
    /// On error, nodes already overwritten stay overwritten, nodes not yet
    /// reached are untouched, and fresh nodes are already linked in.
    #[instrument(level = "trace", skip(self))]
    pub fn assign(
        &mut self,
        dest: &mut Option<NodeId>,
        source: Option<NodeId>,
    ) -> NodeResult<AssignReport> {
        self.assign_subtree(None, dest, source)
    }

    /// [`assign`](Self::assign) with the source subtree living in `other`.
    #[instrument(level = "trace", skip(self, other))]
    pub fn assign_from(
        &mut self,
        dest: &mut Option<NodeId>,
        other: &Self,
        source: Option<NodeId>,
    ) -> NodeResult<AssignReport> {
        self.assign_subtree(Some(other), dest, source)
    }

    fn assign_subtree(
        &mut self,
        other: Option<&Self>,
        dest: &mut Option<NodeId>,
        source: Option<NodeId>,
    ) -> NodeResult<AssignReport> {
        let mut report = AssignReport::default();
        let mut stack = vec![(Slot::Root, source)];

        while let Some((slot, src)) = stack.pop() {
            let linked = match slot {
                Slot::Root => *dest,
                Slot::Child(parent, side) => {
                    self.arena.get(parent).and_then(|node| node.child(side))
                }
            };
            let current = linked.filter(|id| self.arena.contains(*id));

            let Some(src) = src else {
                let mut doomed = current;
                report.cleared += self.clear(&mut doomed);
                self.set_slot(dest, slot, None);
                continue;
            };

            let (value, left, right) = other.unwrap_or(&*self).snapshot(src)?;
            let reusable = current.and_then(|id| self.arena.get_mut(id).map(|node| (id, node)));
            let target = match reusable {
                Some((id, node)) => {
                    node.value = value;
                    report.reused += 1;
                    id
                }
                None => {
                    let id = self.alloc(value)?;
                    report.allocated += 1;
                    self.set_slot(dest, slot, Some(id));
                    id
                }
            };
            if let Slot::Child(parent, _) = slot {
                if let Some(node) = self.arena.get_mut(target) {
                    node.parent = Some(parent);
                }
            }

            // popped in reverse: right before left
            stack.push((Slot::Child(target, Side::Left), left));
            stack.push((Slot::Child(target, Side::Right), right));
        }

        debug!(
            reused = report.reused,
            allocated = report.allocated,
            cleared = report.cleared,
            "assigned subtree"
        );
        Ok(report)
    }

    fn set_slot(&mut self, dest: &mut Option<NodeId>, slot: Slot, value: Option<NodeId>) {
        match slot {
            Slot::Root => *dest = value,
            Slot::Child(parent, side) => {
                if let Some(node) = self.arena.get_mut(parent) {
                    *node.child_mut(side) = value;
                }
            }
        }
    }
}

/// Exchanges two subtree handles; no node is touched.
pub fn swap(lhs: &mut Option<NodeId>, rhs: &mut Option<NodeId>) {
    std::mem::swap(lhs, rhs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_limit_when_allocating_past_it_then_capacity_exhausted() {
        let mut arena = NodeArena::with_limits(4, Some(1));
        let root = arena.new_node(1).unwrap();

        let result = arena.add_left_value(root, 2);

        assert_eq!(result, Err(NodeError::CapacityExhausted { limit: 1 }));
        assert_eq!(arena.left(root), None);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn given_cleared_node_when_attaching_to_it_then_dangling() {
        let mut arena = NodeArena::new();
        let root = arena.new_node(1).unwrap();
        let child = arena.new_node(2).unwrap();
        arena.clear(&mut Some(root));

        assert_eq!(arena.add_left(root, Some(child)), Err(NodeError::Dangling(root)));
        assert_eq!(arena.parent(child), None);
    }

    #[test]
    fn given_stale_child_when_attaching_then_parent_untouched() {
        let mut arena = NodeArena::new();
        let root = arena.new_node(1).unwrap();
        let child = arena.new_node(2).unwrap();
        arena.clear(&mut Some(child));

        assert_eq!(arena.add_right(root, Some(child)), Err(NodeError::Dangling(child)));
        assert_eq!(arena.right(root), None);
    }

    #[test]
    fn given_default_value_type_when_new_default_then_holds_default() {
        let mut arena: NodeArena<String> = NodeArena::new();
        let id = arena.new_default().unwrap();

        assert_eq!(arena.value(id).map(String::as_str), Some(""));
        assert!(arena.get(id).is_some_and(BNode::is_leaf));
        assert_eq!(arena.parent(id), None);
    }

    #[test]
    fn given_left_child_when_clearing_it_then_parent_slot_reset() {
        let mut arena = NodeArena::new();
        let root = arena.new_node(1).unwrap();
        let left = arena.add_left_value(root, 2).unwrap();

        let removed = arena.clear(&mut Some(left));

        assert_eq!(removed, 1);
        assert_eq!(arena.left(root), None);
        assert_eq!(arena.size(Some(root)), 1);
    }

    #[test]
    fn given_two_handles_when_swapped_then_nodes_untouched() {
        let mut arena = NodeArena::new();
        let a = arena.new_node("a").unwrap();
        let b = arena.new_node("b").unwrap();
        arena.add_left_value(b, "b.left").unwrap();
        let (mut lhs, mut rhs) = (Some(a), Some(b));

        swap(&mut lhs, &mut rhs);

        assert_eq!((lhs, rhs), (Some(b), Some(a)));
        assert_eq!(arena.size(lhs), 2);
        assert_eq!(arena.size(rhs), 1);
        assert!(arena.is_consistent(lhs));
    }
}
