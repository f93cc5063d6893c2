//! Tests for node creation, attachment, sizing, clearing and swapping

use rstest::{fixture, rstest};

use bnode::domain::{swap, NodeArena, NodeError, NodeId};
use bnode::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// R(5) with left child 3 and right child 8.
#[fixture]
fn sample() -> (NodeArena<i32>, NodeId) {
    let mut arena = NodeArena::new();
    let root = arena.new_node(5).unwrap();
    arena.add_left_value(root, 3).unwrap();
    arena.add_right_value(root, 8).unwrap();
    (arena, root)
}

// ============================================================
// size
// ============================================================

#[test]
fn given_absent_root_when_sizing_then_zero() {
    let arena: NodeArena<i32> = NodeArena::new();
    assert_eq!(arena.size(None), 0);
}

#[rstest]
fn given_three_node_tree_when_sizing_then_three(sample: (NodeArena<i32>, NodeId)) {
    let (arena, root) = sample;

    assert_eq!(arena.size(Some(root)), 3);
    assert_eq!(arena.size(arena.left(root)), 1);
    assert_eq!(arena.value(root), Some(&5));
}

#[test]
fn given_unbalanced_tree_when_sizing_then_counts_every_reachable_node() {
    let mut arena = NodeArena::new();
    let root = arena.new_node(0).unwrap();
    let mut current = root;
    for value in 1..10 {
        current = arena.add_right_value(current, value).unwrap();
        arena.add_left_value(current, -value).unwrap();
    }
    // unlinked node in the same arena is not counted
    arena.new_node(100).unwrap();

    assert_eq!(arena.size(Some(root)), 19);
    assert_eq!(arena.len(), 20);
}

// ============================================================
// add_left / add_right
// ============================================================

#[rstest]
fn given_value_attach_when_done_then_back_links_point_to_parent(sample: (NodeArena<i32>, NodeId)) {
    let (arena, root) = sample;
    let left = arena.left(root).unwrap();
    let right = arena.right(root).unwrap();

    assert_eq!(arena.parent(left), Some(root));
    assert_eq!(arena.parent(right), Some(root));
    assert_eq!(arena.parent(root), None);
    assert!(arena.is_consistent(Some(root)));
}

#[test]
fn given_existing_subtree_when_attached_left_then_sibling_untouched() {
    let mut arena = NodeArena::new();
    let root = arena.new_node("root").unwrap();
    let right = arena.add_right_value(root, "right").unwrap();
    let subtree = arena.new_node("sub").unwrap();
    arena.add_left_value(subtree, "sub.left").unwrap();

    arena.add_left(root, Some(subtree)).unwrap();

    assert_eq!(arena.left(root), Some(subtree));
    assert_eq!(arena.right(root), Some(right));
    assert_eq!(arena.parent(subtree), Some(root));
    assert_eq!(arena.size(Some(root)), 4);
    assert!(arena.is_consistent(Some(root)));
}

#[test]
fn given_existing_subtree_when_attached_right_then_sibling_untouched() {
    let mut arena = NodeArena::new();
    let root = arena.new_node("root").unwrap();
    let left = arena.add_left_value(root, "left").unwrap();
    let subtree = arena.new_node("sub").unwrap();
    let sub_right = arena.add_right_value(subtree, "sub.right").unwrap();

    arena.add_right(root, Some(subtree)).unwrap();

    assert_eq!(arena.right(root), Some(subtree));
    assert_eq!(arena.left(root), Some(left));
    assert_eq!(arena.parent(subtree), Some(root));
    assert_eq!(arena.parent(sub_right), Some(subtree));
    assert_eq!(arena.size(Some(root)), 4);
    assert!(arena.is_consistent(Some(root)));
}

#[test]
fn given_absent_child_when_attached_then_slot_emptied_without_freeing() {
    let mut arena = NodeArena::new();
    let root = arena.new_node(1).unwrap();
    let left = arena.add_left_value(root, 2).unwrap();

    arena.add_left(root, None).unwrap();

    assert_eq!(arena.left(root), None);
    // the detached node is still allocated; the caller owns it now
    assert!(arena.contains(left));
    assert_eq!(arena.len(), 2);
}

#[rstest]
fn given_occupied_slot_when_attaching_then_previous_subtree_detached_not_freed(
    sample: (NodeArena<i32>, NodeId),
) {
    let (mut arena, root) = sample;
    let mut old_left = arena.left(root);

    let new_left = arena.add_left_value(root, 30).unwrap();

    assert_eq!(arena.left(root), Some(new_left));
    assert_eq!(arena.size(Some(root)), 3);
    assert_eq!(arena.len(), 4);

    // the caller kept the old handle and is responsible for it
    arena.clear(&mut old_left);
    assert_eq!(arena.len(), 3);
    assert_eq!(arena.left(root), Some(new_left));
}

#[test]
fn given_stale_parent_when_attaching_value_then_dangling_and_nothing_allocated() {
    let mut arena = NodeArena::new();
    let root = arena.new_node(1).unwrap();
    arena.clear(&mut Some(root));

    let result = arena.add_right_value(root, 2);

    assert_eq!(result, Err(NodeError::Dangling(root)));
    assert!(arena.is_empty());
}

// ============================================================
// clear
// ============================================================

#[rstest]
fn given_three_node_tree_when_cleared_then_absent_and_empty(sample: (NodeArena<i32>, NodeId)) {
    let (mut arena, root) = sample;
    let mut handle = Some(root);

    let removed = arena.clear(&mut handle);

    assert_eq!(removed, 3);
    assert_eq!(handle, None);
    assert_eq!(arena.size(handle), 0);
    assert!(arena.is_empty());
    assert!(!arena.contains(root));
}

#[rstest]
fn given_cleared_handle_when_cleared_again_then_noop(sample: (NodeArena<i32>, NodeId)) {
    let (mut arena, root) = sample;
    let mut handle = Some(root);
    arena.clear(&mut handle);

    assert_eq!(arena.clear(&mut handle), 0);
    assert_eq!(arena.clear(&mut handle), 0);
    assert_eq!(handle, None);
}

#[rstest]
fn given_right_subtree_when_cleared_then_rest_of_tree_intact(sample: (NodeArena<i32>, NodeId)) {
    let (mut arena, root) = sample;
    let right = arena.right(root).unwrap();
    arena.add_left_value(right, 7).unwrap();
    let mut handle = Some(right);

    assert_eq!(arena.clear(&mut handle), 2);

    assert_eq!(arena.right(root), None);
    assert_eq!(arena.size(Some(root)), 2);
    assert!(arena.is_consistent(Some(root)));
}

#[test]
fn given_degenerate_deep_tree_when_sized_and_cleared_then_no_stack_overflow() {
    let mut arena = NodeArena::with_limits(100_000, None);
    let root = arena.new_node(0u32).unwrap();
    let mut current = root;
    for value in 1..100_000 {
        current = arena.add_left_value(current, value).unwrap();
    }

    assert_eq!(arena.size(Some(root)), 100_000);
    assert!(arena.is_consistent(Some(root)));

    let mut handle = Some(root);
    assert_eq!(arena.clear(&mut handle), 100_000);
    assert!(arena.is_empty());
}

// ============================================================
// swap
// ============================================================

#[rstest]
fn given_two_trees_when_swapped_then_handles_exchange_and_links_intact(
    sample: (NodeArena<i32>, NodeId),
) {
    let (mut arena, root) = sample;
    let other = arena.new_node(42).unwrap();
    let mut a = Some(root);
    let mut b = Some(other);

    swap(&mut a, &mut b);

    assert_eq!(a, Some(other));
    assert_eq!(b, Some(root));
    assert_eq!(arena.size(a), 1);
    assert_eq!(arena.size(b), 3);
    assert!(arena.is_consistent(b));
}

#[test]
fn given_absent_and_present_handles_when_swapped_then_absence_moves() {
    let mut arena = NodeArena::new();
    let node = arena.new_node('x').unwrap();
    let mut a = None;
    let mut b = Some(node);

    swap(&mut a, &mut b);

    assert_eq!((a, b), (Some(node), None));
}
