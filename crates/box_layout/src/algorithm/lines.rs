//! Line breaking and flexible length resolution.

use indextree::NodeId;
use log::{debug, trace};
use smallvec::SmallVec;

use super::container::FlexFrame;
use super::{LayoutReason, LayoutRequest};
use crate::enums::{Align, Dimension, Display, MeasureMode, PositionType, Wrap};
use crate::tree::{ChildList, LayoutTree};
use crate::value::{OrUndefined as _, StyleValue, floats_equal, is_undefined};

/// One flex line: a run of children sharing the main axis.
#[derive(Debug, Default)]
pub(super) struct FlexLine {
    pub(super) start: usize,
    /// Index one past the last child (in-flow or not) the line covers.
    pub(super) end: usize,
    pub(super) items_on_line: usize,
    pub(super) size_consumed: f32,
    pub(super) total_flex_grow: f32,
    /// Sum of `-shrink * basis`, so it is negative whenever anything shrinks.
    pub(super) total_flex_shrink_scaled: f32,
    pub(super) relative_children: ChildList,
    pub(super) remaining_free_space: f32,
    pub(super) main_dim: f32,
    pub(super) cross_dim: f32,
}

/// Size a child was clamped to while freezing, if any.
type FrozenSizes = SmallVec<Option<f32>, 8>;

impl LayoutTree {
    /// Gather the children of the next line starting at `start`.
    pub(super) fn collect_line(
        &mut self,
        frame: &FlexFrame,
        children: &[NodeId],
        start: usize,
        line_index: usize,
    ) -> FlexLine {
        let mut line = FlexLine { start, end: start, ..FlexLine::default() };
        let wraps = frame.wrap != Wrap::NoWrap;

        let mut index = start;
        while let Some(&child) = children.get(index) {
            let style = &self.node(child).style;
            if style.display == Display::None || style.position_type == PositionType::Absolute {
                index += 1;
                continue;
            }
            let margin = style.margin_for_axis(frame.main_axis, frame.available_inner_width);
            let basis = self.node(child).layout.computed_flex_basis.or_undefined();
            let outer = self.bound_axis_within_min_max(child, frame.main_axis, basis, frame.main_axis_owner_size)
                + margin;
            if line.size_consumed + outer > frame.available_inner_main && wraps && line.items_on_line > 0 {
                break;
            }

            self.node_mut(child).line_index = line_index;
            line.size_consumed += outer;
            line.items_on_line += 1;
            if self.is_flexible(child) {
                line.total_flex_grow += self.flex_grow(child);
                line.total_flex_shrink_scaled += -self.flex_shrink(child) * basis;
            }
            line.relative_children.push(child);
            index += 1;
        }
        line.end = index;

        // Factors summing below one distribute only part of the free space.
        if line.total_flex_grow > 0.0 && line.total_flex_grow < 1.0 {
            line.total_flex_grow = 1.0;
        }
        if line.total_flex_shrink_scaled > 0.0 && line.total_flex_shrink_scaled < 1.0 {
            line.total_flex_shrink_scaled = 1.0;
        }
        debug!(
            target: "box_layout::flex",
            "[LINE] {line_index}: children {start}..{} items={} consumed={:.3}",
            line.end, line.items_on_line, line.size_consumed
        );
        line
    }

    /// Grow or shrink the children of `line` to absorb its free space, then
    /// lay each of them out at its final main size.
    pub(super) fn resolve_flexible_length(&mut self, frame: &FlexFrame, line: &mut FlexLine) {
        let original_free_space = line.remaining_free_space;
        let frozen = self.freeze_clamped_children(frame, line);
        let distributed = self.distribute_free_space(frame, line, &frozen);
        line.remaining_free_space = original_free_space - distributed;
    }

    fn flex_basis_within_min_max(&self, frame: &FlexFrame, child: NodeId) -> f32 {
        let basis = self.node(child).layout.computed_flex_basis.or_undefined();
        self.bound_axis_within_min_max(child, frame.main_axis, basis, frame.main_axis_owner_size)
    }

    /// Freeze children whose flexed size violates their min/max, taking the
    /// clamped size out of the free space. Freezing one child changes the share
    /// of the others, so this repeats until nothing else freezes.
    fn freeze_clamped_children(&self, frame: &FlexFrame, line: &mut FlexLine) -> FrozenSizes {
        let mut frozen: FrozenSizes = line.relative_children.iter().map(|_| None).collect();
        loop {
            let mut delta_free_space = 0.0;
            let mut froze_any = false;
            for (slot, &child) in frozen.iter_mut().zip(line.relative_children.iter()) {
                if slot.is_some() {
                    continue;
                }
                let basis = self.flex_basis_within_min_max(frame, child);
                let (factor, base) = if line.remaining_free_space < 0.0 {
                    let factor = -self.flex_shrink(child) * basis;
                    (factor, basis + line.remaining_free_space / line.total_flex_shrink_scaled * factor)
                } else if line.remaining_free_space > 0.0 {
                    let factor = self.flex_grow(child);
                    (factor, basis + line.remaining_free_space / line.total_flex_grow * factor)
                } else {
                    continue;
                };
                if is_undefined(factor) || factor == 0.0 {
                    continue;
                }
                let bound = self.bound_axis(
                    child,
                    frame.main_axis,
                    base,
                    frame.available_inner_main,
                    frame.available_inner_width,
                );
                if is_undefined(base) || is_undefined(bound) || floats_equal(base, bound) {
                    continue;
                }
                delta_free_space += bound - basis;
                if line.remaining_free_space < 0.0 {
                    line.total_flex_shrink_scaled -= factor;
                } else {
                    line.total_flex_grow -= factor;
                }
                *slot = Some(bound);
                froze_any = true;
                trace!(target: "box_layout::flex", "[FLEX] froze child={child:?} at {bound:.3}");
            }
            line.remaining_free_space -= delta_free_space;
            if !froze_any {
                return frozen;
            }
        }
    }

    /// Final main size of one child.
    fn flexed_main_size(&self, frame: &FlexFrame, line: &FlexLine, child: NodeId, basis: f32) -> f32 {
        let remaining = line.remaining_free_space;
        let base = if remaining < 0.0 {
            let factor = -self.flex_shrink(child) * basis;
            if factor == 0.0 {
                return basis;
            }
            if line.total_flex_shrink_scaled == 0.0 {
                basis + factor
            } else {
                basis + remaining / line.total_flex_shrink_scaled * factor
            }
        } else if !is_undefined(remaining) && remaining > 0.0 {
            let factor = self.flex_grow(child);
            if is_undefined(factor) || factor == 0.0 {
                return basis;
            }
            basis + remaining / line.total_flex_grow * factor
        } else {
            return basis;
        };
        self.bound_axis(child, frame.main_axis, base, frame.available_inner_main, frame.available_inner_width)
    }

    /// Lay out every child of the line at its flexed main size.
    ///
    /// Returns the total change applied to the children's bases.
    fn distribute_free_space(&mut self, frame: &FlexFrame, line: &FlexLine, frozen: &FrozenSizes) -> f32 {
        let mut delta_free_space = 0.0;
        for (slot, &child) in frozen.iter().zip(line.relative_children.iter()) {
            let basis = self.flex_basis_within_min_max(frame, child);
            let main_size = slot.unwrap_or_else(|| self.flexed_main_size(frame, line, child, basis));
            delta_free_space += main_size - basis;
            self.layout_flexed_child(frame, child, main_size);
            let child_overflow = self.node(child).layout.had_overflow;
            self.node_mut(frame.node).layout.had_overflow |= child_overflow;
        }
        delta_free_space
    }

    fn stretches_in_cross_axis(&self, frame: &FlexFrame, child: NodeId) -> bool {
        let style = &self.node(child).style;
        self.align_item(frame.node, child) == Align::Stretch
            && style.margin_leading_value(frame.cross_axis) != StyleValue::Auto
            && style.margin_trailing_value(frame.cross_axis) != StyleValue::Auto
    }

    fn layout_flexed_child(&mut self, frame: &FlexFrame, child: NodeId, main_size: f32) {
        let width = frame.available_inner_width;
        let style = &self.node(child).style;
        let margin_main = style.margin_for_axis(frame.main_axis, width);
        let margin_cross = style.margin_for_axis(frame.cross_axis, width);
        let aspect_ratio = style.aspect_ratio;
        let cross_dimension = frame.cross_axis.dimension();
        let cross_size_defined = self.is_style_dim_defined(child, frame.cross_axis, frame.available_inner_cross);
        let stretches = self.stretches_in_cross_axis(frame, child);

        let mut child_main_size = main_size + margin_main;
        let mut child_main_mode = MeasureMode::Exactly;
        let (mut child_cross_size, mut child_cross_mode) = if let Some(ratio) = aspect_ratio {
            let inner = if frame.is_main_axis_row {
                (child_main_size - margin_main) / ratio
            } else {
                (child_main_size - margin_main) * ratio
            };
            (inner + margin_cross, MeasureMode::Exactly)
        } else if !is_undefined(frame.available_inner_cross)
            && !cross_size_defined
            && frame.measure_mode_cross == MeasureMode::Exactly
            && !(frame.wrap != Wrap::NoWrap && frame.flex_basis_overflows)
            && stretches
        {
            (frame.available_inner_cross, MeasureMode::Exactly)
        } else if !cross_size_defined {
            let size = frame.available_inner_cross;
            let mode = if is_undefined(size) { MeasureMode::Undefined } else { MeasureMode::AtMost };
            (size, mode)
        } else {
            let resolved = self.resolved_dimension(child, cross_dimension);
            let size = resolved.resolve(frame.available_inner_cross).or_undefined() + margin_cross;
            let loose_percent =
                matches!(resolved, StyleValue::Percent(_)) && frame.measure_mode_cross != MeasureMode::Exactly;
            let mode = if is_undefined(size) || loose_percent {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            };
            (size, mode)
        };

        self.constrain_max_size_for_mode(
            child,
            frame.main_axis,
            frame.available_inner_main,
            width,
            &mut child_main_mode,
            &mut child_main_size,
        );
        self.constrain_max_size_for_mode(
            child,
            frame.cross_axis,
            frame.available_inner_cross,
            width,
            &mut child_cross_mode,
            &mut child_cross_size,
        );

        let requires_stretch_layout = !cross_size_defined && stretches;
        let (available_width, width_mode, available_height, height_mode) = if frame.is_main_axis_row {
            (child_main_size, child_main_mode, child_cross_size, child_cross_mode)
        } else {
            (child_cross_size, child_cross_mode, child_main_size, child_main_mode)
        };
        let request = LayoutRequest {
            available_width,
            available_height,
            owner_direction: frame.direction,
            width_mode,
            height_mode,
            owner_width: frame.available_inner_width,
            owner_height: frame.available_inner_height,
            perform_layout: frame.perform_layout && !requires_stretch_layout,
            reason: LayoutReason::FlexLayout,
        };
        self.layout_node_internal(child, request);
        trace!(
            target: "box_layout::flex",
            "[FLEX] child={child:?} main={main_size:.3} measured={:.3}x{:.3}",
            self.measured(child, Dimension::Width),
            self.measured(child, Dimension::Height)
        );
    }
}
