//! Computed geometry of a node.

use crate::cache::MeasurementCache;
use crate::enums::{Dimension, Direction, Edge};
use crate::value::UNDEFINED;

/// Results of the last layout pass over a node, plus bookkeeping the
/// algorithm keeps between passes.
///
/// Positions are relative to the owner's border box; every value is in points.
#[derive(Clone, Debug)]
pub struct LayoutResults {
    pub(crate) position: [f32; 4],
    pub(crate) dimensions: [f32; 2],
    pub(crate) margin: [f32; 6],
    pub(crate) border: [f32; 6],
    pub(crate) padding: [f32; 6],
    pub(crate) direction: Direction,
    pub(crate) had_overflow: bool,
    pub(crate) did_use_legacy_flag: bool,
    pub(crate) computed_flex_basis: Option<f32>,
    pub(crate) computed_flex_basis_generation: u32,
    pub(crate) generation_count: u32,
    pub(crate) last_owner_direction: Option<Direction>,
    /// Config revision the cached results were computed under.
    pub(crate) config_revision: Option<u64>,
    pub(crate) measured_dimensions: [f32; 2],
    pub(crate) cache: MeasurementCache,
}

impl Default for LayoutResults {
    fn default() -> Self {
        Self {
            position: [0.0; 4],
            dimensions: [UNDEFINED; 2],
            margin: [0.0; 6],
            border: [0.0; 6],
            padding: [0.0; 6],
            direction: Direction::Inherit,
            had_overflow: false,
            did_use_legacy_flag: false,
            computed_flex_basis: None,
            computed_flex_basis_generation: 0,
            generation_count: 0,
            last_owner_direction: None,
            config_revision: None,
            measured_dimensions: [UNDEFINED; 2],
            cache: MeasurementCache::default(),
        }
    }
}

impl LayoutResults {
    /// Zero-sized layout given to nodes with `display: none`.
    pub(crate) fn zeroed() -> Self {
        let mut layout = Self::default();
        layout.dimensions = [0.0; 2];
        layout
    }

    pub fn left(&self) -> f32 {
        self.position[Edge::Left.index()]
    }

    pub fn top(&self) -> f32 {
        self.position[Edge::Top.index()]
    }

    pub fn right(&self) -> f32 {
        self.position[Edge::Right.index()]
    }

    pub fn bottom(&self) -> f32 {
        self.position[Edge::Bottom.index()]
    }

    pub fn width(&self) -> f32 {
        self.dimensions[Dimension::Width.index()]
    }

    pub fn height(&self) -> f32 {
        self.dimensions[Dimension::Height.index()]
    }

    /// Direction the node was laid out in.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether children overflowed the node on the main axis.
    pub const fn had_overflow(&self) -> bool {
        self.had_overflow
    }

    /// Whether the legacy stretch setting changed how this node was sized.
    pub const fn did_use_legacy_flag(&self) -> bool {
        self.did_use_legacy_flag
    }

    /// Resolved margin; `None` for shorthand edges.
    pub fn margin(&self, edge: Edge) -> Option<f32> {
        self.resolved_edge(&self.margin, edge)
    }

    /// Resolved border width; `None` for shorthand edges.
    pub fn border(&self, edge: Edge) -> Option<f32> {
        self.resolved_edge(&self.border, edge)
    }

    /// Resolved padding; `None` for shorthand edges.
    pub fn padding(&self, edge: Edge) -> Option<f32> {
        self.resolved_edge(&self.padding, edge)
    }

    /// Left and right are read through start/end in the laid-out direction.
    fn resolved_edge(&self, values: &[f32; 6], edge: Edge) -> Option<f32> {
        let rtl = self.direction == Direction::Rtl;
        let slot = match edge {
            Edge::Left if rtl => Edge::End,
            Edge::Left => Edge::Start,
            Edge::Right if rtl => Edge::Start,
            Edge::Right => Edge::End,
            Edge::Horizontal | Edge::Vertical | Edge::All => return None,
            physical => physical,
        };
        values.get(slot.index()).copied()
    }

    pub(crate) fn set_position(&mut self, edge: Edge, value: f32) {
        if let Some(slot) = self.position.get_mut(edge.index()) {
            *slot = value;
        }
    }

    pub(crate) fn position(&self, edge: Edge) -> f32 {
        self.position.get(edge.index()).copied().unwrap_or(0.0)
    }

    pub(crate) const fn measured(&self, dimension: Dimension) -> f32 {
        self.measured_dimensions[dimension.index()]
    }

    pub(crate) fn set_measured(&mut self, dimension: Dimension, value: f32) {
        self.measured_dimensions[dimension.index()] = value;
    }

    pub(crate) const fn dimension(&self, dimension: Dimension) -> f32 {
        self.dimensions[dimension.index()]
    }

    pub(crate) fn set_dimension(&mut self, dimension: Dimension, value: f32) {
        self.dimensions[dimension.index()] = value;
    }

    pub(crate) fn set_edge_values(&mut self, kind: EdgeKind, edge: Edge, value: f32) {
        let values = match kind {
            EdgeKind::Margin => &mut self.margin,
            EdgeKind::Border => &mut self.border,
            EdgeKind::Padding => &mut self.padding,
        };
        if let Some(slot) = values.get_mut(edge.index()) {
            *slot = value;
        }
    }
}

/// Which resolved box edge array to write.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum EdgeKind {
    Margin,
    Border,
    Padding,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Physical left/right map onto start/end according to direction.
    ///
    /// # Panics
    /// Panics if the mapping ignores the layout direction.
    fn left_right_follow_direction() {
        let mut layout = LayoutResults::default();
        layout.set_edge_values(EdgeKind::Margin, Edge::Start, 3.0);
        layout.set_edge_values(EdgeKind::Margin, Edge::End, 7.0);
        assert_eq!(layout.margin(Edge::Left), Some(3.0));
        layout.direction = Direction::Rtl;
        assert_eq!(layout.margin(Edge::Left), Some(7.0));
        assert_eq!(layout.margin(Edge::Right), Some(3.0));
        assert_eq!(layout.margin(Edge::All), None);
    }

    #[test]
    /// Fresh layouts have undefined size and zero offsets.
    ///
    /// # Panics
    /// Panics if defaults change.
    fn defaults() {
        let layout = LayoutResults::default();
        assert!(layout.width().is_nan());
        assert!(layout.left().abs() < f32::EPSILON);
        let hidden = LayoutResults::zeroed();
        assert!(hidden.width().abs() < f32::EPSILON);
    }
}
