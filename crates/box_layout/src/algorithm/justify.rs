//! Main-axis placement of the items of one line.

use indextree::NodeId;
use log::trace;

use super::container::FlexFrame;
use super::lines::FlexLine;
use crate::enums::{Dimension, Display, FlexDirection, Justify, MeasureMode, PositionType};
use crate::tree::LayoutTree;
use crate::value::{OrUndefined as _, StyleValue};

impl LayoutTree {
    /// Offset and gap between items dictated by `justify-content`.
    fn justify_offsets(justify: Justify, remaining: f32, items_on_line: usize) -> (f32, f32) {
        let items = items_on_line as f32;
        match justify {
            Justify::FlexStart => (0.0, 0.0),
            Justify::Center => (remaining / 2.0, 0.0),
            Justify::FlexEnd => (remaining, 0.0),
            Justify::SpaceBetween if items_on_line > 1 => (0.0, remaining.max(0.0) / (items - 1.0)),
            Justify::SpaceBetween => (0.0, 0.0),
            Justify::SpaceEvenly => {
                let gap = remaining / (items + 1.0);
                (gap, gap)
            }
            Justify::SpaceAround if items_on_line > 0 => {
                let leading = 0.5 * remaining / items;
                (leading, leading * 2.0)
            }
            Justify::SpaceAround => (0.0, 0.0),
        }
    }

    /// Free space left on an at-most line that must still honour the
    /// container's min size.
    fn remaining_space_for_min_size(&self, frame: &FlexFrame, line: &FlexLine) -> f32 {
        let style = &self.node(frame.node).style;
        let min_main = style
            .min_dimension(frame.main_axis.dimension())
            .resolve(frame.main_axis_owner_size);
        let Some(min_main) = min_main else {
            return 0.0;
        };
        let min_available = min_main
            - style.leading_padding_and_border(frame.main_axis, frame.owner_width)
            - style.trailing_padding_and_border(frame.main_axis, frame.owner_width);
        let occupied = frame.available_inner_main - line.remaining_free_space;
        (min_available - occupied).max(0.0)
    }

    /// Auto margins on the main axis among in-flow items.
    fn count_auto_margins(&self, main_axis: FlexDirection, line_children: &[NodeId]) -> usize {
        line_children
            .iter()
            .map(|&child| {
                let style = &self.node(child).style;
                if style.position_type != PositionType::Relative {
                    return 0;
                }
                usize::from(style.margin_leading_value(main_axis) == StyleValue::Auto)
                    + usize::from(style.margin_trailing_value(main_axis) == StyleValue::Auto)
            })
            .sum()
    }

    /// Position the items of `line` along the main axis and measure the
    /// line's main and cross extent.
    pub(super) fn justify_main_axis(&mut self, frame: &FlexFrame, line: &mut FlexLine, children: &[NodeId]) {
        let node = frame.node;
        let main_axis = frame.main_axis;
        let width = frame.available_inner_width;
        let (leading_padding_border, trailing_padding_border, justify, leading_border) = {
            let style = &self.node(node).style;
            (
                style.leading_padding_and_border(main_axis, frame.owner_width),
                style.trailing_padding_and_border(main_axis, frame.owner_width),
                style.justify_content,
                style.leading_border(main_axis),
            )
        };

        if frame.measure_mode_main == MeasureMode::AtMost && line.remaining_free_space > 0.0 {
            line.remaining_free_space = self.remaining_space_for_min_size(frame, line);
        }

        let line_children = children.get(line.start..line.end).unwrap_or_default();
        let auto_margins = self.count_auto_margins(main_axis, line_children);
        let (leading_main_dim, between_main_dim) = if auto_margins == 0 {
            Self::justify_offsets(justify, line.remaining_free_space, line.items_on_line)
        } else {
            (0.0, 0.0)
        };
        let auto_margin_share = line.remaining_free_space / auto_margins.max(1) as f32;

        line.main_dim = leading_padding_border + leading_main_dim;
        line.cross_dim = 0.0;
        let is_baseline_layout = self.is_baseline_layout(node);
        let can_skip_flex = !frame.perform_layout && frame.measure_mode_cross == MeasureMode::Exactly;
        let mut max_ascent: f32 = 0.0;
        let mut max_descent: f32 = 0.0;

        for &child in line_children {
            let data = self.node(child);
            let style = &data.style;
            if style.display == Display::None {
                continue;
            }
            if style.position_type == PositionType::Absolute {
                if style.is_leading_position_defined(main_axis) {
                    if frame.perform_layout {
                        let offset = style.leading_position(main_axis, frame.available_inner_main)
                            + leading_border
                            + style.leading_margin(main_axis, width);
                        self.node_mut(child).layout.set_position(main_axis.leading_edge(), offset);
                    }
                } else if frame.perform_layout {
                    let layout = &mut self.node_mut(child).layout;
                    let current = layout.position(main_axis.leading_edge());
                    layout.set_position(main_axis.leading_edge(), current + leading_border + leading_main_dim);
                }
                continue;
            }

            let leading_auto = style.margin_leading_value(main_axis) == StyleValue::Auto;
            let trailing_auto = style.margin_trailing_value(main_axis) == StyleValue::Auto;
            let margin_main = style.margin_for_axis(main_axis, width);
            let basis = data.layout.computed_flex_basis.or_undefined();

            if leading_auto {
                line.main_dim += auto_margin_share;
            }
            if frame.perform_layout {
                let main_dim = line.main_dim;
                let layout = &mut self.node_mut(child).layout;
                let current = layout.position(main_axis.leading_edge());
                layout.set_position(main_axis.leading_edge(), current + main_dim);
            }
            if trailing_auto {
                line.main_dim += auto_margin_share;
            }

            if can_skip_flex {
                line.main_dim += between_main_dim + margin_main + basis;
                line.cross_dim = frame.available_inner_cross;
            } else {
                line.main_dim += between_main_dim + self.dim_with_margin(child, main_axis, width);
                if is_baseline_layout {
                    let child_style = &self.node(child).style;
                    let ascent = self.baseline(child) + child_style.leading_margin(FlexDirection::Column, width);
                    let descent = self.measured(child, Dimension::Height)
                        + child_style.margin_for_axis(FlexDirection::Column, width)
                        - ascent;
                    max_ascent = max_ascent.max(ascent);
                    max_descent = max_descent.max(descent);
                } else {
                    line.cross_dim = line.cross_dim.max(self.dim_with_margin(child, frame.cross_axis, width));
                }
            }
        }

        line.main_dim += trailing_padding_border;
        if is_baseline_layout {
            line.cross_dim = max_ascent + max_descent;
        }
        trace!(
            target: "box_layout::flex",
            "[JUSTIFY] node={node:?} mode={justify:?} main={:.3} cross={:.3}",
            line.main_dim, line.cross_dim
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close((lead, gap): (f32, f32), expected: (f32, f32)) -> bool {
        (lead - expected.0).abs() < 0.01 && (gap - expected.1).abs() < 0.01
    }

    #[test]
    /// Space distribution for each `justify-content` value.
    ///
    /// # Panics
    /// Panics if leading offset or gap is off.
    fn offsets_per_justify_value() {
        assert!(close(LayoutTree::justify_offsets(Justify::Center, 60.0, 3), (30.0, 0.0)));
        assert!(close(LayoutTree::justify_offsets(Justify::FlexEnd, 60.0, 3), (60.0, 0.0)));
        assert!(close(LayoutTree::justify_offsets(Justify::SpaceBetween, 60.0, 3), (0.0, 30.0)));
        assert!(close(LayoutTree::justify_offsets(Justify::SpaceAround, 60.0, 3), (10.0, 20.0)));
        assert!(close(LayoutTree::justify_offsets(Justify::SpaceEvenly, 60.0, 3), (15.0, 15.0)));
    }

    #[test]
    /// Degenerate lines never divide by zero.
    ///
    /// # Panics
    /// Panics if an empty or single-item line produces a gap.
    fn degenerate_lines() {
        assert!(close(LayoutTree::justify_offsets(Justify::SpaceAround, 60.0, 0), (0.0, 0.0)));
        assert!(close(LayoutTree::justify_offsets(Justify::SpaceBetween, 60.0, 1), (0.0, 0.0)));
        let (_, gap) = LayoutTree::justify_offsets(Justify::SpaceBetween, -20.0, 3);
        assert!(gap.abs() < f32::EPSILON);
    }
}
