use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;

use super::*;
use crate::enums::{Direction, Edge, FlexDirection, MeasureMode};
use crate::value::{Size, StyleValue};

fn tree_with_children(count: usize) -> Result<(LayoutTree, NodeId, Vec<NodeId>)> {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    let mut children = Vec::new();
    for index in 0..count {
        let child = tree.new_node();
        tree.insert_child(root, child, index)?;
        children.push(child);
    }
    Ok((tree, root, children))
}

/// Message of a refused operation, empty if it succeeded.
fn error_message<T>(result: Result<T>) -> String {
    result.err().map(|error| error.to_string()).unwrap_or_default()
}

#[test]
/// Children keep insertion order and point back at their owner.
///
/// # Panics
/// Panics if order or ownership is wrong.
fn insert_keeps_order_and_owner() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(2)?;
    let first = tree.new_node();
    tree.insert_child(root, first, 0)?;
    let order: Vec<NodeId> = tree.children(root).collect();
    assert_eq!(order.first(), Some(&first));
    assert_eq!(order.get(1..), Some(children.as_slice()));
    assert_eq!(tree.owner(first), Some(root));
    assert_eq!(tree.child_count(root), 3);
    Ok(())
}

#[test]
/// Inserting a child of the same owner again moves it.
///
/// # Panics
/// Panics if the child is duplicated or lands at the wrong index.
fn reinsert_moves_child() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(3)?;
    let moved = children[0];
    tree.insert_child(root, moved, 2)?;
    assert_eq!(tree.child_count(root), 3);
    assert_eq!(tree.child(root, 2), Some(moved));
    assert_eq!(tree.child(root, 0), Some(children[1]));
    Ok(())
}

#[test]
/// A node owned elsewhere, an index past the end and cycles are refused.
///
/// # Panics
/// Panics if any invalid insertion succeeds or mutates the tree.
fn invalid_insertions_are_rejected() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(1)?;
    let other = tree.new_node();
    assert!(error_message(tree.insert_child(other, children[0], 0)).contains("already has a owner"));
    assert_eq!(tree.owner(children[0]), Some(root));

    let loose = tree.new_node();
    assert!(error_message(tree.insert_child(root, loose, 5)).contains("out of range"));
    assert_eq!(tree.owner(loose), None);

    assert!(error_message(tree.insert_child(children[0], root, 0)).contains("own subtree"));
    assert_eq!(tree.owner(root), None);
    Ok(())
}

#[test]
/// Nodes with a measure function are leaves.
///
/// # Panics
/// Panics if a measured node accepts children or the reverse.
fn measured_nodes_cannot_have_children() -> Result<()> {
    let (mut tree, root, _) = tree_with_children(1)?;
    let refused = tree.set_measure_func(root, |_: NodeId, _: f32, _: MeasureMode, _: f32, _: MeasureMode| {
        Size::new(1.0, 1.0)
    });
    assert!(error_message(refused).contains("cannot have children"));
    assert!(!tree.has_measure_func(root));

    let leaf = tree.new_node();
    tree.set_measure_func(leaf, |_: NodeId, _: f32, _: MeasureMode, _: f32, _: MeasureMode| Size::new(1.0, 1.0))?;
    assert_eq!(tree.node_type(leaf), NodeType::Text);
    let child = tree.new_node();
    assert!(error_message(tree.insert_child(leaf, child, 0)).contains("cannot have children"));
    tree.clear_measure_func(leaf);
    assert_eq!(tree.node_type(leaf), NodeType::Default);
    Ok(())
}

#[test]
/// Removing a node that is not a child is an error and changes nothing.
///
/// # Panics
/// Panics if removal of a stranger succeeds.
fn remove_non_child_fails() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(1)?;
    let stranger = tree.new_node();
    assert!(error_message(tree.remove_child(root, stranger)).contains("not a child"));
    tree.remove_child(root, children[0])?;
    assert_eq!(tree.child_count(root), 0);
    assert_eq!(tree.owner(children[0]), None);
    assert!(tree.is_dirty(root));
    Ok(())
}

#[test]
/// Children that survive `set_children` keep their layout; leavers lose it.
///
/// # Panics
/// Panics if the layout of a kept child is reset.
fn set_children_keeps_layout_of_survivors() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(2)?;
    tree.set_width(root, 100.0);
    tree.set_height(root, 100.0);
    tree.set_height(children[0], 10.0);
    tree.set_height(children[1], 20.0);
    tree.calculate_layout(root, None, None, Direction::Ltr);

    let added = tree.new_node();
    tree.set_children(root, &[children[1], added])?;
    assert!((tree.layout(children[1]).height() - 20.0).abs() < 0.01);
    assert!(tree.layout(children[0]).height().is_nan());
    assert_eq!(tree.owner(children[0]), None);
    assert_eq!(tree.child(root, 1), Some(added));

    assert!(error_message(tree.set_children(root, &[added, added])).contains("twice"));
    Ok(())
}

#[test]
/// Clearing every child orphans them all.
///
/// # Panics
/// Panics if a child keeps its owner.
fn remove_all_children_orphans() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(3)?;
    tree.remove_all_children(root);
    assert_eq!(tree.child_count(root), 0);
    assert!(children.iter().all(|&child| tree.owner(child).is_none()));
    Ok(())
}

#[test]
/// Deep clones copy styles and structure into unowned nodes.
///
/// # Panics
/// Panics if the copy shares nodes with the original.
fn clone_subtree_is_deep() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(2)?;
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_width(children[1], 30.0);
    let copy = tree.clone_subtree(root)?;
    assert_ne!(copy, root);
    assert_eq!(tree.owner(copy), None);
    assert_eq!(tree.style(copy).flex_direction(), FlexDirection::Row);
    assert_eq!(tree.child_count(copy), 2);
    let copied_child = tree.child(copy, 1);
    assert_ne!(copied_child, Some(children[1]));
    assert_eq!(
        copied_child.map(|child| tree.style(child).width()),
        Some(StyleValue::Point(30.0))
    );
    Ok(())
}

#[test]
/// The config's clone hook decides what ends up in the copy.
///
/// # Panics
/// Panics if the hook is not consulted once per child.
fn clone_hook_supplies_children() -> Result<()> {
    let config = ConfigRef::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    config.set_clone_node_func(move |tree: &mut LayoutTree, old: NodeId, _: NodeId, _: usize| {
        counter.fetch_add(1, Ordering::Relaxed);
        tree.clone_node(old)
    });
    let mut tree = LayoutTree::new();
    let root = tree.new_node_with_config(&config);
    for index in 0..2 {
        let child = tree.new_node_with_config(&config);
        tree.insert_child(root, child, index)?;
    }
    let copy = tree.clone_subtree(root)?;
    assert_eq!(calls.load(Ordering::Relaxed), 2);
    assert_eq!(tree.child_count(copy), 2);
    Ok(())
}

#[test]
/// Reset refuses attached nodes and restores defaults otherwise.
///
/// # Panics
/// Panics if reset ignores attachment or keeps the old style.
fn reset_restores_defaults() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(1)?;
    assert!(error_message(tree.reset(root)).contains("still has children"));
    assert!(error_message(tree.reset(children[0])).contains("still attached"));

    let loose = tree.new_node();
    tree.set_width(loose, 12.0);
    tree.reset(loose)?;
    assert_eq!(tree.style(loose).width(), StyleValue::Auto);
    assert!(!tree.is_dirty(loose));
    Ok(())
}

#[test]
/// Freeing a node detaches it from its owner and leaves its children alive.
///
/// # Panics
/// Panics if the freed node is still reachable.
fn free_detaches_and_orphans() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(1)?;
    let grandchild = tree.new_node();
    tree.insert_child(children[0], grandchild, 0)?;
    tree.free(children[0]);
    assert!(!tree.contains(children[0]));
    assert!(tree.contains(grandchild));
    assert_eq!(tree.owner(grandchild), None);
    assert_eq!(tree.child_count(root), 0);
    Ok(())
}

#[test]
/// Recursive free visits every node, leaves first.
///
/// # Panics
/// Panics if a node survives or cleanup order is wrong.
fn free_recursive_releases_subtree() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(2)?;
    let mut visited = Vec::new();
    tree.free_recursive_with_cleanup(root, |_, node| visited.push(node));
    assert_eq!(visited.len(), 3);
    assert_eq!(visited.last(), Some(&root));
    assert!(children.iter().all(|&child| !tree.contains(child)));
    assert_eq!(tree.node_count(), 0);
    Ok(())
}

#[test]
/// Style changes dirty the node and every ancestor.
///
/// # Panics
/// Panics if an ancestor stays clean.
fn dirtiness_propagates_to_root() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(1)?;
    let leaf = tree.new_node();
    tree.insert_child(children[0], leaf, 0)?;
    tree.calculate_layout(root, Some(100.0), Some(100.0), Direction::Ltr);
    assert!(!tree.is_dirty(root));
    assert!(!tree.is_dirty(leaf));

    tree.set_margin(leaf, Edge::Top, 4.0);
    assert!(tree.is_dirty(leaf));
    assert!(tree.is_dirty(children[0]));
    assert!(tree.is_dirty(root));
    Ok(())
}

#[test]
/// Dirtying a subtree from an inner node also dirties the path to the root.
///
/// # Panics
/// Panics if a later edit below the inner node is lost.
fn subtree_dirtying_reaches_root() -> Result<()> {
    let (mut tree, root, children) = tree_with_children(1)?;
    let middle = children[0];
    let leaf = tree.new_node();
    tree.set_width(leaf, 10.0);
    tree.set_height(leaf, 10.0);
    tree.insert_child(middle, leaf, 0)?;
    tree.calculate_layout(root, Some(100.0), Some(100.0), Direction::Ltr);

    tree.mark_dirty_and_propagate_to_descendants(middle);
    assert!(tree.is_dirty(root));
    assert!(tree.is_dirty(middle));
    assert!(tree.is_dirty(leaf));

    tree.set_width(leaf, 50.0);
    tree.calculate_layout(root, Some(100.0), Some(100.0), Direction::Ltr);
    assert!((tree.layout(leaf).width() - 50.0).abs() < 0.01);
    assert!(!tree.is_dirty(root));
    Ok(())
}

#[test]
/// Setting a value equal to the current one is not a change.
///
/// # Panics
/// Panics if an equal write dirties the node.
fn equal_style_writes_do_not_dirty() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_width(root, 50.0);
    tree.calculate_layout(root, None, None, Direction::Ltr);
    assert!(!tree.is_dirty(root));

    tree.set_width(root, 50.0);
    let flex_direction = tree.style(root).flex_direction();
    tree.set_flex_direction(root, flex_direction);
    assert!(!tree.is_dirty(root));

    tree.set_width_percent(root, 50.0);
    assert!(tree.is_dirty(root));
}

#[test]
/// The dirtied hook fires once per clean-to-dirty transition.
///
/// # Panics
/// Panics if the hook fires on already dirty nodes.
fn dirtied_hook_fires_on_transition() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    tree.set_dirtied_func(root, move |_: NodeId| {
        counter.fetch_add(1, Ordering::Relaxed);
    });
    tree.calculate_layout(root, None, None, Direction::Ltr);

    tree.set_width(root, 10.0);
    tree.set_height(root, 10.0);
    assert_eq!(calls.load(Ordering::Relaxed), 1);

    tree.calculate_layout(root, None, None, Direction::Ltr);
    tree.set_width(root, 20.0);
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

#[test]
/// Only measured leaves may be dirtied by hand.
///
/// # Panics
/// Panics if a plain container accepts `mark_dirty`.
fn mark_dirty_requires_measure() -> Result<()> {
    let mut tree = LayoutTree::new();
    let plain = tree.new_node();
    assert!(error_message(tree.mark_dirty(plain)).contains("custom measure functions"));

    let leaf = tree.new_node();
    tree.set_measure_func(leaf, |_: NodeId, _: f32, _: MeasureMode, _: f32, _: MeasureMode| Size::new(5.0, 5.0))?;
    tree.calculate_layout(leaf, None, None, Direction::Ltr);
    tree.mark_dirty(leaf)?;
    assert!(tree.is_dirty(leaf));
    Ok(())
}

#[test]
/// Host context round-trips through its concrete type.
///
/// # Panics
/// Panics if the context is lost or downcasts to the wrong type.
fn context_downcasts() {
    let mut tree = LayoutTree::new();
    let node = tree.new_node();
    tree.set_context(node, Arc::new(42u32));
    assert_eq!(tree.context_as::<u32>(node), Some(&42));
    assert_eq!(tree.context_as::<i64>(node), None);
    tree.clear_context(node);
    assert!(tree.context(node).is_none());
}
