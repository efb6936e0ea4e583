//! Host hooks attached to nodes.
//!
//! Each hook is a single-method trait so hosts can plug in either a type or
//! a closure. Hooks run synchronously inside tree operations and layout.

use indextree::NodeId;

use crate::enums::MeasureMode;
use crate::value::Size;

/// Intrinsic sizing for leaves whose content the tree cannot see (text, images).
///
/// Must be a pure function of its inputs: results are cached per constraint.
pub trait Measure: Send + Sync {
    fn measure(
        &self,
        node: NodeId,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
    ) -> Size;
}

impl<F> Measure for F
where
    F: Fn(NodeId, f32, MeasureMode, f32, MeasureMode) -> Size + Send + Sync,
{
    fn measure(
        &self,
        node: NodeId,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
    ) -> Size {
        self(node, width, width_mode, height, height_mode)
    }
}

/// Distance from the top of a node to its first baseline.
pub trait Baseline: Send + Sync {
    fn baseline(&self, node: NodeId, width: f32, height: f32) -> f32;
}

impl<F> Baseline for F
where
    F: Fn(NodeId, f32, f32) -> f32 + Send + Sync,
{
    fn baseline(&self, node: NodeId, width: f32, height: f32) -> f32 {
        self(node, width, height)
    }
}

/// Notification that a node went from clean to dirty.
pub trait Dirtied: Send + Sync {
    fn dirtied(&self, node: NodeId);
}

impl<F> Dirtied for F
where
    F: Fn(NodeId) + Send + Sync,
{
    fn dirtied(&self, node: NodeId) {
        self(node);
    }
}
