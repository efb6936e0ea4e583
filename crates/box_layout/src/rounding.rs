//! Snapping layout results to the physical pixel grid.

use indextree::NodeId;

use crate::enums::{Dimension, Edge, NodeType};
use crate::tree::LayoutTree;
use crate::value::{UNDEFINED, is_undefined};

fn doubles_equal(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() < 0.0001
}

/// Round `value` to the nearest multiple of `1 / point_scale_factor`.
///
/// Halves round up. `force_ceil` and `force_floor` override the rounding
/// direction for values that are not already on the grid.
pub fn round_value_to_pixel_grid(value: f32, point_scale_factor: f32, force_ceil: bool, force_floor: bool) -> f32 {
    let scale = f64::from(point_scale_factor);
    let mut scaled = f64::from(value) * scale;
    // `fraction` is chosen so that floor(scaled) == scaled - fraction.
    let mut fraction = scaled % 1.0;
    if fraction < 0.0 {
        fraction += 1.0;
    }
    if doubles_equal(fraction, 0.0) {
        scaled -= fraction;
    } else if doubles_equal(fraction, 1.0) {
        scaled = scaled - fraction + 1.0;
    } else if force_ceil {
        scaled = scaled - fraction + 1.0;
    } else if force_floor {
        scaled -= fraction;
    } else {
        let round_up = !fraction.is_nan() && (fraction > 0.5 || doubles_equal(fraction, 0.5));
        scaled = scaled - fraction + if round_up { 1.0 } else { 0.0 };
    }
    if scaled.is_nan() || scale.is_nan() {
        return UNDEFINED;
    }
    (scaled / scale) as f32
}

fn has_fraction(value: f32, point_scale_factor: f32) -> bool {
    let fraction = (f64::from(value) * f64::from(point_scale_factor)) % 1.0;
    !doubles_equal(fraction, 0.0) && !doubles_equal(fraction, 1.0)
}

impl LayoutTree {
    /// Round positions and sizes of `node` and its subtree.
    ///
    /// Edges are rounded in absolute coordinates and sizes are derived from
    /// the rounded edges, so adjacent boxes never gap or overlap. Text keeps
    /// at least its measured size.
    pub(crate) fn round_to_pixel_grid(&mut self, node: NodeId, point_scale_factor: f32, absolute_left: f32, absolute_top: f32) {
        if point_scale_factor == 0.0 {
            return;
        }
        let data = self.node_mut(node);
        let left = data.layout.position(Edge::Left);
        let top = data.layout.position(Edge::Top);
        let width = data.layout.dimension(Dimension::Width);
        let height = data.layout.dimension(Dimension::Height);
        let node_left = absolute_left + left;
        let node_top = absolute_top + top;
        let node_right = node_left + width;
        let node_bottom = node_top + height;
        let text = data.node_type == NodeType::Text;

        data.layout.set_position(Edge::Left, round_value_to_pixel_grid(left, point_scale_factor, false, text));
        data.layout.set_position(Edge::Top, round_value_to_pixel_grid(top, point_scale_factor, false, text));

        let fractional_width = !is_undefined(width) && has_fraction(width, point_scale_factor);
        let fractional_height = !is_undefined(height) && has_fraction(height, point_scale_factor);
        let rounded_width = round_value_to_pixel_grid(node_right, point_scale_factor, text && fractional_width, text && !fractional_width)
            - round_value_to_pixel_grid(node_left, point_scale_factor, false, text);
        let rounded_height = round_value_to_pixel_grid(node_bottom, point_scale_factor, text && fractional_height, text && !fractional_height)
            - round_value_to_pixel_grid(node_top, point_scale_factor, false, text);
        data.layout.set_dimension(Dimension::Width, rounded_width);
        data.layout.set_dimension(Dimension::Height, rounded_height);

        for child in self.child_list(node) {
            self.round_to_pixel_grid(child, point_scale_factor, node_left, node_top);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Two pixels per point snap to half points.
    ///
    /// # Panics
    /// Panics if values do not land on the half-point grid.
    fn half_point_grid() {
        assert!((round_value_to_pixel_grid(10.3, 2.0, false, false) - 10.5).abs() < 0.0001);
        assert!((round_value_to_pixel_grid(10.2, 2.0, false, false) - 10.0).abs() < 0.0001);
        assert!((round_value_to_pixel_grid(10.25, 2.0, false, false) - 10.5).abs() < 0.0001);
    }

    #[test]
    /// Forced directions only apply to off-grid values.
    ///
    /// # Panics
    /// Panics if forcing rounds an on-grid value or ignores the direction.
    fn forced_directions() {
        assert!((round_value_to_pixel_grid(3.2, 1.0, true, false) - 4.0).abs() < 0.0001);
        assert!((round_value_to_pixel_grid(3.8, 1.0, false, true) - 3.0).abs() < 0.0001);
        assert!((round_value_to_pixel_grid(3.0, 1.0, true, false) - 3.0).abs() < 0.0001);
    }

    #[test]
    /// Negative values round toward the nearest grid line too.
    ///
    /// # Panics
    /// Panics if negative values round the wrong way.
    fn negative_values() {
        assert!((round_value_to_pixel_grid(-3.4, 1.0, false, false) + 3.0).abs() < 0.0001);
        assert!((round_value_to_pixel_grid(-3.6, 1.0, false, false) + 4.0).abs() < 0.0001);
    }

    #[test]
    /// Undefined stays undefined.
    ///
    /// # Panics
    /// Panics if NaN turns into a number.
    fn undefined_passthrough() {
        assert!(is_undefined(round_value_to_pixel_grid(UNDEFINED, 1.0, false, false)));
    }
}
