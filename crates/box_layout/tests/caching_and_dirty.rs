#![allow(clippy::let_underscore_must_use, reason = "another test may have installed the logger")]

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use box_layout::{Align, Direction, FlexDirection, LayoutTree, MeasureMode, NodeId, Size};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn close(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() < 0.01
}

/// Text-like leaf whose width is read from `width` and whose calls are counted.
struct CountingLeaf {
    calls: Arc<AtomicUsize>,
    width: Arc<AtomicU32>,
}

impl CountingLeaf {
    fn new(width: f32) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            width: Arc::new(AtomicU32::new(width.to_bits())),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn set_width(&self, width: f32) {
        self.width.store(width.to_bits(), Ordering::Relaxed);
    }

    fn attach(&self, tree: &mut LayoutTree, node: NodeId) -> Result<()> {
        let calls = Arc::clone(&self.calls);
        let width = Arc::clone(&self.width);
        tree.set_measure_func(node, move |_: NodeId, _: f32, _: MeasureMode, _: f32, _: MeasureMode| {
            calls.fetch_add(1, Ordering::Relaxed);
            Size::new(f32::from_bits(width.load(Ordering::Relaxed)), 20.0)
        })
    }
}

/// Row of 200x100 holding one measured leaf.
fn row_with_leaf(leaf: &CountingLeaf) -> Result<(LayoutTree, NodeId, NodeId)> {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_width(root, 200.0);
    tree.set_height(root, 100.0);
    let text = tree.new_node();
    leaf.attach(&mut tree, text)?;
    tree.insert_child(root, text, 0)?;
    Ok((tree, root, text))
}

/// Column of flex-start items holding one measured leaf, sized by the pass.
fn column_with_leaf(leaf: &CountingLeaf) -> Result<(LayoutTree, NodeId)> {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Column);
    tree.set_align_items(root, Align::FlexStart);
    let text = tree.new_node();
    leaf.attach(&mut tree, text)?;
    tree.insert_child(root, text, 0)?;
    Ok((tree, root))
}

fn snapshot(tree: &LayoutTree, nodes: &[NodeId]) -> Vec<[f32; 4]> {
    nodes
        .iter()
        .map(|&node| {
            let layout = tree.layout(node);
            [layout.left(), layout.top(), layout.width(), layout.height()]
        })
        .collect()
}

#[test]
/// Measured leaves take the callback's width and the line's height.
///
/// # Panics
/// Panics if the measured size is not used.
fn measured_leaf_is_sized_by_callback() -> Result<()> {
    init_logging();
    let leaf = CountingLeaf::new(50.0);
    let (mut tree, root, text) = row_with_leaf(&leaf)?;
    tree.calculate_layout(root, None, None, Direction::Ltr);
    assert!(close(tree.layout(text).width(), 50.0));
    assert!(close(tree.layout(text).height(), 100.0));
    assert!(leaf.calls() >= 1);
    Ok(())
}

#[test]
/// A second pass over an unchanged tree reuses every cached result.
///
/// # Panics
/// Panics if the measure callback runs again or results change.
fn unchanged_tree_is_not_measured_again() -> Result<()> {
    init_logging();
    let leaf = CountingLeaf::new(50.0);
    let (mut tree, root, text) = row_with_leaf(&leaf)?;
    tree.calculate_layout(root, None, None, Direction::Ltr);
    let calls = leaf.calls();
    let before = snapshot(&tree, &[root, text]);

    tree.calculate_layout(root, None, None, Direction::Ltr);
    assert_eq!(leaf.calls(), calls);
    assert_eq!(snapshot(&tree, &[root, text]), before);
    Ok(())
}

#[test]
/// Dirtying a measured leaf remeasures it and relayouts its ancestors.
///
/// # Panics
/// Panics if the new intrinsic width is not picked up.
fn marked_leaf_is_remeasured() -> Result<()> {
    init_logging();
    let leaf = CountingLeaf::new(50.0);
    let (mut tree, root, text) = row_with_leaf(&leaf)?;
    tree.calculate_layout(root, None, None, Direction::Ltr);
    let calls = leaf.calls();

    leaf.set_width(80.0);
    tree.mark_dirty(text)?;
    assert!(tree.is_dirty(root));
    tree.calculate_layout(root, None, None, Direction::Ltr);
    assert!(leaf.calls() > calls);
    assert!(close(tree.layout(text).width(), 80.0));
    assert!(!tree.is_dirty(text));
    assert!(!tree.is_dirty(root));
    Ok(())
}

#[test]
/// Style edits after a pass are reflected by the next pass.
///
/// # Panics
/// Panics if a stale result is served from the cache.
fn style_change_relayouts() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_width(root, 100.0);
    let first = tree.new_node();
    tree.set_height(first, 10.0);
    tree.insert_child(root, first, 0)?;
    let second = tree.new_node();
    tree.set_height(second, 10.0);
    tree.insert_child(root, second, 1)?;
    tree.calculate_layout(root, None, None, Direction::Ltr);
    assert!(close(tree.layout(second).top(), 10.0));

    tree.set_height(first, 25.0);
    tree.calculate_layout(root, None, None, Direction::Ltr);
    assert!(close(tree.layout(first).height(), 25.0));
    assert!(close(tree.layout(second).top(), 25.0));
    assert!(close(tree.layout(root).height(), 35.0));
    Ok(())
}

#[test]
/// Repeating a pass with the same inputs yields identical geometry.
///
/// # Panics
/// Panics if any value drifts between passes.
fn layout_is_idempotent() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_width(root, 100.0);
    tree.set_height(root, 40.0);
    let mut nodes = vec![root];
    for index in 0..3 {
        let child = tree.new_node();
        tree.set_flex_grow(child, 1.0);
        tree.insert_child(root, child, index)?;
        nodes.push(child);
    }
    tree.calculate_layout(root, None, None, Direction::Ltr);
    let first = snapshot(&tree, &nodes);
    tree.calculate_layout(root, None, None, Direction::Ltr);
    assert_eq!(snapshot(&tree, &nodes), first);

    tree.mark_dirty_and_propagate_to_descendants(root);
    tree.calculate_layout(root, None, None, Direction::Ltr);
    assert_eq!(snapshot(&tree, &nodes), first);
    Ok(())
}

#[test]
/// Changing the available size invalidates the root's cached layout.
///
/// # Panics
/// Panics if the old owner size is still used.
fn owner_size_change_relayouts() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    let child = tree.new_node();
    tree.set_height(child, 10.0);
    tree.insert_child(root, child, 0)?;
    tree.calculate_layout(root, Some(100.0), Some(100.0), Direction::Ltr);
    assert!(close(tree.layout(child).width(), 100.0));
    tree.calculate_layout(root, Some(60.0), Some(100.0), Direction::Ltr);
    assert!(close(tree.layout(child).width(), 60.0));
    Ok(())
}

#[test]
/// Every node touched by a pass reports new layout until the host clears it.
///
/// # Panics
/// Panics if the flag is not raised by a pass.
fn passes_raise_new_layout_flag() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    let child = tree.new_node();
    tree.insert_child(root, child, 0)?;
    tree.calculate_layout(root, Some(50.0), Some(50.0), Direction::Ltr);
    assert!(tree.has_new_layout(child));
    tree.set_has_new_layout(child, false);
    tree.set_width(child, 20.0);
    tree.calculate_layout(root, Some(50.0), Some(50.0), Direction::Ltr);
    assert!(tree.has_new_layout(child));
    Ok(())
}

#[test]
/// Each distinct constraint reaches the callback once; repeated passes reuse it.
///
/// # Panics
/// Panics if the callback runs more than once for the same constraint.
fn one_call_per_constraint() -> Result<()> {
    init_logging();
    let leaf = CountingLeaf::new(50.0);
    let (mut tree, root) = column_with_leaf(&leaf)?;
    tree.calculate_layout(root, Some(200.0), None, Direction::Ltr);
    assert_eq!(leaf.calls(), 1);
    tree.calculate_layout(root, Some(200.0), None, Direction::Ltr);
    assert_eq!(leaf.calls(), 1);
    Ok(())
}

#[test]
/// An unconstrained measurement answers every bound it fits in and only a
/// bound it overflows measures again.
///
/// # Panics
/// Panics if a compatible bound calls the measure callback.
fn compatible_bounds_reuse_measurement() -> Result<()> {
    init_logging();
    let leaf = CountingLeaf::new(50.0);
    let (mut tree, root) = column_with_leaf(&leaf)?;
    tree.calculate_layout(root, None, None, Direction::Ltr);
    assert_eq!(leaf.calls(), 1);
    assert!(close(tree.layout(root).width(), 50.0));

    tree.calculate_layout(root, Some(300.0), None, Direction::Ltr);
    assert_eq!(leaf.calls(), 1);
    tree.calculate_layout(root, Some(100.0), None, Direction::Ltr);
    assert_eq!(leaf.calls(), 1);

    tree.calculate_layout(root, Some(30.0), None, Direction::Ltr);
    assert_eq!(leaf.calls(), 2);
    Ok(())
}

#[test]
/// A stricter bound that the last result still fits in is answered from the cache.
///
/// # Panics
/// Panics if a stricter but satisfied bound calls the measure callback.
fn stricter_bound_reuses_measurement() -> Result<()> {
    init_logging();
    let leaf = CountingLeaf::new(50.0);
    let (mut tree, root) = column_with_leaf(&leaf)?;
    tree.calculate_layout(root, Some(200.0), None, Direction::Ltr);
    assert_eq!(leaf.calls(), 1);
    tree.calculate_layout(root, Some(100.0), None, Direction::Ltr);
    assert_eq!(leaf.calls(), 1);
    tree.calculate_layout(root, Some(30.0), None, Direction::Ltr);
    assert_eq!(leaf.calls(), 2);
    Ok(())
}
