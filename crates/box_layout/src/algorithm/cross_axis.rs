//! Cross-axis alignment within a line and of lines within the container.

use indextree::NodeId;
use log::debug;

use super::container::FlexFrame;
use super::lines::FlexLine;
use super::{LayoutReason, LayoutRequest};
use crate::enums::{Align, Dimension, Display, Edge, FlexDirection, MeasureMode, PositionType};
use crate::tree::LayoutTree;
use crate::value::{StyleValue, floats_equal, is_undefined};

/// Height of one line plus the ascent of its tallest baseline.
struct LineMetrics {
    end: usize,
    height: f32,
    max_ascent: f32,
}

impl LayoutTree {
    /// Position the items of one line on the cross axis.
    ///
    /// `line_offset` is the cross extent of all earlier lines.
    pub(super) fn align_line_cross_axis(
        &mut self,
        frame: &FlexFrame,
        line: &FlexLine,
        children: &[NodeId],
        line_offset: f32,
        container_cross_size: f32,
    ) {
        let line_children = children.get(line.start..line.end).unwrap_or_default();
        for &child in line_children {
            let style = &self.node(child).style;
            if style.display == Display::None {
                continue;
            }
            if style.position_type == PositionType::Absolute {
                self.place_absolute_on_cross_axis(frame, child);
                continue;
            }

            let leading_auto = style.margin_leading_value(frame.cross_axis) == StyleValue::Auto;
            let trailing_auto = style.margin_trailing_value(frame.cross_axis) == StyleValue::Auto;
            let align = self.align_item(frame.node, child);
            if self.uses_legacy_align_fallback(frame.node, child) {
                self.node_mut(frame.node).layout.did_use_legacy_flag = true;
            }
            let mut leading_cross = frame.leading_padding_and_border_cross;

            if align == Align::Stretch && !leading_auto && !trailing_auto {
                if !self.is_style_dim_defined(child, frame.cross_axis, frame.available_inner_cross) {
                    self.stretch_child(frame, child, line.cross_dim);
                }
            } else {
                let remaining = container_cross_size
                    - self.dim_with_margin(child, frame.cross_axis, frame.available_inner_width);
                leading_cross += match (leading_auto, trailing_auto, align) {
                    (true, true, _) => (remaining / 2.0).max(0.0),
                    (false, true, _) | (false, false, Align::FlexStart) => 0.0,
                    (true, false, _) => remaining.max(0.0),
                    (false, false, Align::Center) => remaining / 2.0,
                    (false, false, _) => remaining,
                };
            }

            let layout = &mut self.node_mut(child).layout;
            let edge = frame.cross_axis.leading_edge();
            let current = layout.position(edge);
            layout.set_position(edge, current + line_offset + leading_cross);
        }
    }

    /// Cross offset of an absolute child whose position was not already
    /// fixed by its insets.
    fn place_absolute_on_cross_axis(&mut self, frame: &FlexFrame, child: NodeId) {
        let cross_axis = frame.cross_axis;
        let leading_border = self.node(frame.node).style.leading_border(cross_axis);
        let style = &self.node(child).style;
        let leading_margin = style.leading_margin(cross_axis, frame.available_inner_width);
        let inset_defined = style.is_leading_position_defined(cross_axis);
        let inset = style.leading_position(cross_axis, frame.available_inner_cross);
        let layout = &mut self.node_mut(child).layout;
        let edge = cross_axis.leading_edge();
        if inset_defined {
            layout.set_position(edge, inset + leading_border + leading_margin);
        }
        if !inset_defined || is_undefined(layout.position(edge)) {
            layout.set_position(edge, leading_border + leading_margin);
        }
    }

    /// Relayout a stretched child at the line's cross size.
    fn stretch_child(&mut self, frame: &FlexFrame, child: NodeId, line_cross_dim: f32) {
        let width = frame.available_inner_width;
        let style = &self.node(child).style;
        let mut child_main_size = self.measured(child, frame.main_axis.dimension());
        let mut child_cross_size = match style.aspect_ratio {
            Some(ratio) => {
                let inner = if frame.is_main_axis_row {
                    child_main_size / ratio
                } else {
                    child_main_size * ratio
                };
                style.margin_for_axis(frame.cross_axis, width) + inner
            }
            None => line_cross_dim,
        };
        child_main_size += style.margin_for_axis(frame.main_axis, width);

        let mut main_mode = MeasureMode::Exactly;
        let mut cross_mode = MeasureMode::Exactly;
        self.constrain_max_size_for_mode(
            child,
            frame.main_axis,
            frame.available_inner_main,
            width,
            &mut main_mode,
            &mut child_main_size,
        );
        self.constrain_max_size_for_mode(
            child,
            frame.cross_axis,
            frame.available_inner_cross,
            width,
            &mut cross_mode,
            &mut child_cross_size,
        );

        let (child_width, child_height) = if frame.is_main_axis_row {
            (child_main_size, child_cross_size)
        } else {
            (child_cross_size, child_main_size)
        };
        let mode_for = |size: f32| if is_undefined(size) { MeasureMode::Undefined } else { MeasureMode::Exactly };
        let request = LayoutRequest {
            available_width: child_width,
            available_height: child_height,
            owner_direction: frame.direction,
            width_mode: mode_for(child_width),
            height_mode: mode_for(child_height),
            owner_width: frame.available_inner_width,
            owner_height: frame.available_inner_height,
            perform_layout: true,
            reason: LayoutReason::Stretch,
        };
        self.layout_node_internal(child, request);
    }

    /// Cross extent and baseline of the line starting at child `start`.
    fn line_metrics(&self, frame: &FlexFrame, children: &[NodeId], start: usize, line_index: usize) -> LineMetrics {
        let width = frame.available_inner_width;
        let mut metrics = LineMetrics { end: children.len(), height: 0.0, max_ascent: 0.0 };
        let mut max_descent: f32 = 0.0;
        for (index, &child) in children.iter().enumerate().skip(start) {
            let data = self.node(child);
            if data.style.display == Display::None || data.style.position_type != PositionType::Relative {
                continue;
            }
            if data.line_index != line_index {
                metrics.end = index;
                break;
            }
            if self.is_layout_dim_defined(child, frame.cross_axis) {
                metrics.height = metrics
                    .height
                    .max(self.dim_with_margin(child, frame.cross_axis, width));
            }
            if self.align_item(frame.node, child) == Align::Baseline {
                let ascent = self.baseline(child) + data.style.leading_margin(FlexDirection::Column, width);
                let descent = data.layout.measured(Dimension::Height)
                    + data.style.margin_for_axis(FlexDirection::Column, width)
                    - ascent;
                metrics.max_ascent = metrics.max_ascent.max(ascent);
                max_descent = max_descent.max(descent);
                metrics.height = metrics.height.max(metrics.max_ascent + max_descent);
            }
        }
        metrics
    }

    /// Leading offset and extra size per line from `align-content`.
    fn align_content_offsets(&self, frame: &FlexFrame, line_count: usize, total_line_cross_dim: f32) -> (f32, f32) {
        if is_undefined(frame.available_inner_cross) {
            return (0.0, 0.0);
        }
        let remaining = frame.available_inner_cross - total_line_cross_dim;
        let has_room = frame.available_inner_cross > total_line_cross_dim;
        let lines = line_count as f32;
        match self.node(frame.node).style.align_content {
            Align::FlexEnd => (remaining, 0.0),
            Align::Center => (remaining / 2.0, 0.0),
            Align::Stretch if has_room => (0.0, remaining / lines),
            Align::SpaceAround if has_room && line_count > 1 => (remaining / (2.0 * lines), remaining / lines),
            Align::SpaceAround if has_room => (remaining / (2.0 * lines), 0.0),
            Align::SpaceAround => (remaining / 2.0, 0.0),
            Align::SpaceBetween if has_room && line_count > 1 => (0.0, remaining / (lines - 1.0)),
            _ => (0.0, 0.0),
        }
    }

    /// Distribute lines over the container's cross size and align every item
    /// inside its line.
    pub(super) fn align_content(
        &mut self,
        frame: &FlexFrame,
        children: &[NodeId],
        line_count: usize,
        total_line_cross_dim: f32,
    ) {
        let (lead, cross_dim_lead) = self.align_content_offsets(frame, line_count, total_line_cross_dim);
        let mut current_lead = frame.leading_padding_and_border_cross + lead;
        debug!(
            target: "box_layout::flex",
            "[ALIGN-CONTENT] node={:?} lines={line_count} total_cross={total_line_cross_dim:.3} lead={lead:.3} extra={cross_dim_lead:.3}",
            frame.node
        );

        let mut end = 0;
        for line_index in 0..line_count {
            let start = end;
            let metrics = self.line_metrics(frame, children, start, line_index);
            end = metrics.end;
            let line_height = metrics.height + cross_dim_lead;
            let line_children = children.get(start..end).unwrap_or_default();
            for &child in line_children {
                let style = &self.node(child).style;
                if style.display == Display::None || style.position_type != PositionType::Relative {
                    continue;
                }
                self.align_child_in_line(frame, child, current_lead, line_height, metrics.max_ascent);
            }
            current_lead += line_height;
        }
    }

    fn align_child_in_line(&mut self, frame: &FlexFrame, child: NodeId, lead: f32, line_height: f32, max_ascent: f32) {
        let width = frame.available_inner_width;
        let cross_axis = frame.cross_axis;
        let edge = cross_axis.leading_edge();
        let cross_dimension = cross_axis.dimension();
        let style = &self.node(child).style;
        let leading_margin = style.leading_margin(cross_axis, width);
        let trailing_margin = style.trailing_margin(cross_axis, width);
        let baseline_inset = style.leading_position(FlexDirection::Column, frame.available_inner_cross);
        let child_cross = self.measured(child, cross_dimension);

        match self.align_item(frame.node, child) {
            Align::FlexStart => {
                self.node_mut(child).layout.set_position(edge, lead + leading_margin);
            }
            Align::FlexEnd => {
                let offset = lead + line_height - trailing_margin - child_cross;
                self.node_mut(child).layout.set_position(edge, offset);
            }
            Align::Center => {
                self.node_mut(child).layout.set_position(edge, lead + (line_height - child_cross) / 2.0);
            }
            Align::Stretch => {
                self.node_mut(child).layout.set_position(edge, lead + leading_margin);
                if !self.is_style_dim_defined(child, cross_axis, frame.available_inner_cross) {
                    self.stretch_child_to_line(frame, child, line_height);
                }
            }
            Align::Baseline => {
                let offset = lead + max_ascent - self.baseline(child) + baseline_inset;
                self.node_mut(child).layout.set_position(Edge::Top, offset);
            }
            Align::Auto | Align::SpaceBetween | Align::SpaceAround => {}
        }
    }

    /// Relayout a stretched child of a multi-line container at its line's height.
    fn stretch_child_to_line(&mut self, frame: &FlexFrame, child: NodeId, line_height: f32) {
        let margin_main = self
            .node(child)
            .style
            .margin_for_axis(frame.main_axis, frame.available_inner_width);
        let measured_width = self.measured(child, Dimension::Width);
        let measured_height = self.measured(child, Dimension::Height);
        let (child_width, child_height) = if frame.is_main_axis_row {
            (measured_width + margin_main, line_height)
        } else {
            (line_height, measured_height + margin_main)
        };
        if floats_equal(child_width, measured_width) && floats_equal(child_height, measured_height) {
            return;
        }
        let request = LayoutRequest {
            available_width: child_width,
            available_height: child_height,
            owner_direction: frame.direction,
            width_mode: MeasureMode::Exactly,
            height_mode: MeasureMode::Exactly,
            owner_width: frame.available_inner_width,
            owner_height: frame.available_inner_height,
            perform_layout: true,
            reason: LayoutReason::MultilineStretch,
        };
        self.layout_node_internal(child, request);
    }
}
