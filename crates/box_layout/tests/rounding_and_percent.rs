#![allow(clippy::let_underscore_must_use, reason = "another test may have installed the logger")]

use anyhow::Result;
use box_layout::{
    Align, ConfigRef, Direction, Edge, FlexDirection, LayoutTree, MeasureMode, NodeId, NodeType, Size,
    round_value_to_pixel_grid,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn close(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() < 0.01
}

/// Root of 100x100 with one 10.3 point square child, both using `config`.
fn fractional_child(config: &ConfigRef) -> Result<(LayoutTree, NodeId, NodeId)> {
    let mut tree = LayoutTree::new();
    let root = tree.new_node_with_config(config);
    tree.set_width(root, 100.0);
    tree.set_height(root, 100.0);
    let child = tree.new_node_with_config(config);
    tree.set_width(child, 10.3);
    tree.set_height(child, 10.3);
    tree.insert_child(root, child, 0)?;
    Ok((tree, root, child))
}

#[test]
/// Percentages resolve against the owner's inner size.
///
/// # Panics
/// Panics if a percentage resolves against the wrong base.
fn percent_of_owner() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_width(root, 200.0);
    tree.set_height(root, 100.0);
    let child = tree.new_node();
    tree.set_width_percent(child, 50.0);
    tree.set_height_percent(child, 50.0);
    tree.set_padding_percent(child, Edge::Left, 10.0);
    tree.insert_child(root, child, 0)?;
    tree.calculate_layout(root, None, None, Direction::Ltr);

    assert!(close(tree.layout(child).width(), 100.0));
    assert!(close(tree.layout(child).height(), 50.0));
    assert!(tree.layout(child).padding(Edge::Left).is_some_and(|padding| close(padding, 20.0)));
    Ok(())
}

#[test]
/// Percentages of an unknown size are treated as unset.
///
/// # Panics
/// Panics if a percentage of an undefined owner produces a size.
fn percent_of_undefined_owner() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    let child = tree.new_node();
    tree.set_width_percent(child, 50.0);
    tree.insert_child(root, child, 0)?;
    tree.calculate_layout(root, None, None, Direction::Ltr);

    assert!(close(tree.layout(child).width(), 0.0));
    assert!(close(tree.layout(root).width(), 0.0));
    Ok(())
}

#[test]
/// Sizes snap to the pixel grid of the root's config.
///
/// # Panics
/// Panics if the child is not snapped to half points.
fn scale_factor_snaps_to_grid() -> Result<()> {
    init_logging();
    let config = ConfigRef::new();
    config.set_point_scale_factor(2.0)?;
    let (mut tree, root, child) = fractional_child(&config)?;
    tree.calculate_layout(root, None, None, Direction::Ltr);
    assert!(close(tree.layout(child).width(), 10.5));
    assert!(close(tree.layout(child).height(), 10.5));
    Ok(())
}

#[test]
/// A zero scale factor leaves results unrounded.
///
/// # Panics
/// Panics if values are rounded.
fn zero_scale_factor_disables_rounding() -> Result<()> {
    init_logging();
    let config = ConfigRef::new();
    config.set_point_scale_factor(0.0)?;
    let (mut tree, root, child) = fractional_child(&config)?;
    tree.calculate_layout(root, None, None, Direction::Ltr);
    assert!(close(tree.layout(child).width(), 10.3));
    Ok(())
}

#[test]
/// Rounded siblings tile their owner without gaps or overlap.
///
/// # Panics
/// Panics if rounded edges of neighbours disagree.
fn rounded_siblings_tile() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_width(root, 100.0);
    tree.set_height(root, 10.0);
    let mut children = Vec::new();
    for index in 0..3 {
        let child = tree.new_node();
        tree.set_flex_grow(child, 1.0);
        tree.insert_child(root, child, index)?;
        children.push(child);
    }
    tree.calculate_layout(root, None, None, Direction::Ltr);

    let edges: Vec<(f32, f32)> = children
        .iter()
        .map(|&child| (tree.layout(child).left(), tree.layout(child).width()))
        .collect();
    let expected = [(0.0, 33.0), (33.0, 34.0), (67.0, 33.0)];
    assert!(edges
        .iter()
        .zip(expected)
        .all(|(&(left, width), (want_left, want_width))| close(left, want_left) && close(width, want_width)));
    Ok(())
}

#[test]
/// Measured text is never rounded below its measured size.
///
/// # Panics
/// Panics if text width is floored.
fn text_rounds_up() -> Result<()> {
    init_logging();
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row);
    tree.set_align_items(root, Align::FlexStart);
    let text = tree.new_node();
    tree.set_measure_func(text, |_: NodeId, _: f32, _: MeasureMode, _: f32, _: MeasureMode| {
        Size::new(10.2, 10.2)
    })?;
    assert_eq!(tree.node_type(text), NodeType::Text);
    tree.insert_child(root, text, 0)?;
    tree.calculate_layout(root, Some(100.0), Some(100.0), Direction::Ltr);
    assert!(close(tree.layout(text).width(), 11.0));
    Ok(())
}

#[test]
/// The public rounding helper honours its forcing flags.
///
/// # Panics
/// Panics if a value lands off the grid.
fn rounding_helper() {
    assert!(close(round_value_to_pixel_grid(10.3, 2.0, false, false), 10.5));
    assert!(close(round_value_to_pixel_grid(10.2, 1.0, true, false), 11.0));
    assert!(close(round_value_to_pixel_grid(10.8, 1.0, false, true), 10.0));
    assert!(close(round_value_to_pixel_grid(-1.5, 1.0, false, false), -1.0));
}
