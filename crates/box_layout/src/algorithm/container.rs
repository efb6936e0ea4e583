//! Flex container algorithm: the per-node driver that runs flex basis, line
//! collection, flexing, justification and alignment in order.

use indextree::NodeId;
use log::debug;

use super::LayoutRequest;
use super::absolute::AbsoluteContext;
use super::lines::FlexLine;
use super::sizing::clamp_defined;
use crate::enums::{Dimension, Direction, Display, Edge, FlexDirection, MeasureMode, Overflow, PositionType, Wrap};
use crate::layout::EdgeKind;
use crate::tree::LayoutTree;
use crate::value::{OrUndefined as _, float_min, is_undefined};

/// Axis-resolved constraints of the container being laid out.
#[derive(Clone, Debug)]
pub(super) struct FlexFrame {
    pub(super) node: NodeId,
    pub(super) direction: Direction,
    pub(super) main_axis: FlexDirection,
    pub(super) cross_axis: FlexDirection,
    pub(super) is_main_axis_row: bool,
    pub(super) wrap: Wrap,
    pub(super) perform_layout: bool,
    /// Bases plus margins do not fit the available main size.
    pub(super) flex_basis_overflows: bool,
    pub(super) width_mode: MeasureMode,
    pub(super) height_mode: MeasureMode,
    pub(super) measure_mode_main: MeasureMode,
    pub(super) measure_mode_cross: MeasureMode,
    pub(super) owner_width: f32,
    pub(super) main_axis_owner_size: f32,
    pub(super) cross_axis_owner_size: f32,
    pub(super) leading_padding_and_border_cross: f32,
    pub(super) padding_and_border_main: f32,
    pub(super) padding_and_border_cross: f32,
    pub(super) available_inner_width: f32,
    pub(super) available_inner_height: f32,
    /// Shrinks to the consumed size of a line when the main size is content based.
    pub(super) available_inner_main: f32,
    pub(super) available_inner_cross: f32,
    pub(super) min_inner_main: f32,
    pub(super) max_inner_main: f32,
}

/// Inner size along one axis: available minus margin, padding and border,
/// clamped by min and max.
fn available_inner_dim(available: f32, margin: f32, padding_border: f32, min: Option<f32>, max: Option<f32>) -> f32 {
    let inner = available - margin - padding_border;
    if is_undefined(inner) {
        return inner;
    }
    let min_inner = min.map_or(0.0, |min| min - padding_border);
    let max_inner = max.map_or(f32::MAX, |max| max - padding_border);
    clamp_defined(inner, min_inner, max_inner)
}

impl LayoutTree {
    /// Lay out one node without consulting its cache.
    pub(super) fn layout_impl(&mut self, node: NodeId, request: &LayoutRequest) {
        let direction = self.resolve_direction(node, request.owner_direction);
        self.write_box_edges(node, direction, request.owner_width);

        if self.node(node).measure.is_some() {
            self.measure_leaf(node, request);
            return;
        }
        if self.child_count(node) == 0 {
            self.layout_empty_container(node, request);
            return;
        }
        if !request.perform_layout && self.try_fixed_size(node, request) {
            return;
        }

        self.node_mut(node).layout.had_overflow = false;
        let mut frame = self.build_frame(node, direction, request);
        let total_outer_flex_basis = self.compute_flex_basis_for_children(&frame);
        frame.flex_basis_overflows =
            frame.measure_mode_main != MeasureMode::Undefined && total_outer_flex_basis > frame.available_inner_main;
        if frame.wrap != Wrap::NoWrap && frame.flex_basis_overflows && frame.measure_mode_main == MeasureMode::AtMost {
            frame.measure_mode_main = MeasureMode::Exactly;
        }

        let children = self.child_list(node);
        let mut start = 0;
        let mut line_count = 0;
        let mut total_line_cross_dim = 0.0;
        let mut max_line_main_dim: f32 = 0.0;
        while start < children.len() {
            let mut line = self.collect_line(&frame, &children, start, line_count);
            start = line.end;
            self.size_line_main_axis(&mut frame, &mut line);
            self.justify_main_axis(&frame, &mut line, &children);
            let container_cross_size = self.size_line_cross_axis(&frame, &mut line);
            if frame.perform_layout {
                self.align_line_cross_axis(&frame, &line, &children, total_line_cross_dim, container_cross_size);
            }
            total_line_cross_dim += line.cross_dim;
            max_line_main_dim = max_line_main_dim.max(line.main_dim);
            line_count += 1;
        }

        if frame.perform_layout && (frame.wrap != Wrap::NoWrap || self.is_baseline_layout(node)) {
            self.align_content(&frame, &children, line_count, total_line_cross_dim);
        }

        self.size_container(&frame, request, max_line_main_dim, total_line_cross_dim);
        if frame.perform_layout {
            self.finish_children(&frame, &children);
        }
        debug!(
            target: "box_layout::flex",
            "[CONTAINER] node={node:?} lines={line_count} size={:.3}x{:.3}",
            self.measured(node, Dimension::Width),
            self.measured(node, Dimension::Height)
        );
    }

    /// Resolve margin, border and padding into the layout using start/end
    /// semantics for the horizontal edges.
    fn write_box_edges(&mut self, node: NodeId, direction: Direction, owner_width: f32) {
        let row = FlexDirection::Row.resolve(direction);
        let column = FlexDirection::Column.resolve(direction);
        let data = self.node_mut(node);
        data.layout.direction = direction;
        let style = &data.style;
        let edges = [
            (Edge::Start, row, true),
            (Edge::End, row, false),
            (Edge::Top, column, true),
            (Edge::Bottom, column, false),
        ];
        for (edge, axis, leading) in edges {
            let (margin, border, padding) = if leading {
                (style.leading_margin(axis, owner_width), style.leading_border(axis), style.leading_padding(axis, owner_width))
            } else {
                (style.trailing_margin(axis, owner_width), style.trailing_border(axis), style.trailing_padding(axis, owner_width))
            };
            data.layout.set_edge_values(EdgeKind::Margin, edge, margin);
            data.layout.set_edge_values(EdgeKind::Border, edge, border);
            data.layout.set_edge_values(EdgeKind::Padding, edge, padding);
        }
    }

    fn build_frame(&self, node: NodeId, direction: Direction, request: &LayoutRequest) -> FlexFrame {
        let style = &self.node(node).style;
        let main_axis = style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let is_main_axis_row = main_axis.is_row();
        let owner_width = request.owner_width;
        let owner_height = request.owner_height;

        let padding_and_border_main = style.padding_and_border_for_axis(main_axis, owner_width);
        let padding_and_border_cross = style.padding_and_border_for_axis(cross_axis, owner_width);
        let (padding_border_row, padding_border_column) = if is_main_axis_row {
            (padding_and_border_main, padding_and_border_cross)
        } else {
            (padding_and_border_cross, padding_and_border_main)
        };

        let min_width = style.min_dimension(Dimension::Width).resolve(owner_width);
        let max_width = style.max_dimension(Dimension::Width).resolve(owner_width);
        let min_height = style.min_dimension(Dimension::Height).resolve(owner_height);
        let max_height = style.max_dimension(Dimension::Height).resolve(owner_height);
        let available_inner_width = available_inner_dim(
            request.available_width,
            style.margin_for_axis(FlexDirection::Row, owner_width),
            padding_border_row,
            min_width,
            max_width,
        );
        let available_inner_height = available_inner_dim(
            request.available_height,
            style.margin_for_axis(FlexDirection::Column, owner_width),
            padding_border_column,
            min_height,
            max_height,
        );

        let (min_main, max_main, padding_border_main_axis) = if is_main_axis_row {
            (min_width, max_width, padding_border_row)
        } else {
            (min_height, max_height, padding_border_column)
        };
        let pick = |row: f32, column: f32| if is_main_axis_row { (row, column) } else { (column, row) };
        let (available_inner_main, available_inner_cross) = pick(available_inner_width, available_inner_height);
        let (main_axis_owner_size, cross_axis_owner_size) = pick(owner_width, owner_height);
        let (measure_mode_main, measure_mode_cross) = if is_main_axis_row {
            (request.width_mode, request.height_mode)
        } else {
            (request.height_mode, request.width_mode)
        };

        FlexFrame {
            node,
            direction,
            main_axis,
            cross_axis,
            is_main_axis_row,
            wrap: style.flex_wrap,
            perform_layout: request.perform_layout,
            flex_basis_overflows: false,
            width_mode: request.width_mode,
            height_mode: request.height_mode,
            measure_mode_main,
            measure_mode_cross,
            owner_width,
            main_axis_owner_size,
            cross_axis_owner_size,
            leading_padding_and_border_cross: style.leading_padding_and_border(cross_axis, owner_width),
            padding_and_border_main,
            padding_and_border_cross,
            available_inner_width,
            available_inner_height,
            available_inner_main,
            available_inner_cross,
            min_inner_main: min_main.map(|min| min - padding_border_main_axis).or_undefined(),
            max_inner_main: max_main.map(|max| max - padding_border_main_axis).or_undefined(),
        }
    }

    /// Decide how much main space the line may fill, then flex its children.
    fn size_line_main_axis(&mut self, frame: &mut FlexFrame, line: &mut FlexLine) {
        let node = frame.node;
        let mut size_based_on_content = false;
        if frame.measure_mode_main != MeasureMode::Exactly {
            if !is_undefined(frame.min_inner_main) && line.size_consumed < frame.min_inner_main {
                frame.available_inner_main = frame.min_inner_main;
            } else if !is_undefined(frame.max_inner_main) && line.size_consumed > frame.max_inner_main {
                frame.available_inner_main = frame.max_inner_main;
            } else {
                let legacy = self.node(node).config.use_legacy_stretch_behaviour();
                let nothing_grows = line.total_flex_grow == 0.0 || self.flex_grow(node) == 0.0;
                if !legacy && nothing_grows {
                    frame.available_inner_main = line.size_consumed;
                }
                if legacy {
                    self.node_mut(node).layout.did_use_legacy_flag = true;
                }
                size_based_on_content = !legacy;
            }
        }

        if !size_based_on_content && !is_undefined(frame.available_inner_main) {
            line.remaining_free_space = frame.available_inner_main - line.size_consumed;
        } else if line.size_consumed < 0.0 {
            line.remaining_free_space = -line.size_consumed;
        }

        let can_skip_flex = !frame.perform_layout && frame.measure_mode_cross == MeasureMode::Exactly;
        if !can_skip_flex {
            self.resolve_flexible_length(frame, line);
        }
        if line.remaining_free_space < 0.0 {
            self.node_mut(node).layout.had_overflow = true;
        }
    }

    /// Clamp the line's cross size and return the cross size items align in.
    fn size_line_cross_axis(&self, frame: &FlexFrame, line: &mut FlexLine) -> f32 {
        let node = frame.node;
        let cross_axis = frame.cross_axis;
        let padding_border = frame.padding_and_border_cross;
        let container_cross_size = match frame.measure_mode_cross {
            MeasureMode::Undefined | MeasureMode::AtMost => {
                self.bound_axis(
                    node,
                    cross_axis,
                    line.cross_dim + padding_border,
                    frame.cross_axis_owner_size,
                    frame.owner_width,
                ) - padding_border
            }
            MeasureMode::Exactly => frame.available_inner_cross,
        };
        if frame.wrap == Wrap::NoWrap && frame.measure_mode_cross == MeasureMode::Exactly {
            line.cross_dim = frame.available_inner_cross;
        }
        line.cross_dim = self.bound_axis(
            node,
            cross_axis,
            line.cross_dim + padding_border,
            frame.cross_axis_owner_size,
            frame.owner_width,
        ) - padding_border;
        container_cross_size
    }

    /// Final size of the container along `axis` from its content extent.
    fn content_based_size(&self, frame: &FlexFrame, axis: FlexDirection, mode: MeasureMode, content: f32, inner: f32) -> Option<f32> {
        let node = frame.node;
        let (owner_size, padding_border) = if axis == frame.main_axis {
            (frame.main_axis_owner_size, frame.padding_and_border_main)
        } else {
            (frame.cross_axis_owner_size, frame.padding_and_border_cross)
        };
        let scrolls = self.node(node).style.overflow == Overflow::Scroll;
        match mode {
            MeasureMode::Undefined => Some(self.bound_axis(node, axis, content, owner_size, frame.owner_width)),
            MeasureMode::AtMost if !scrolls => Some(self.bound_axis(node, axis, content, owner_size, frame.owner_width)),
            MeasureMode::AtMost => Some(
                float_min(inner + padding_border, self.bound_axis_within_min_max(node, axis, content, owner_size))
                    .max(padding_border),
            ),
            MeasureMode::Exactly => None,
        }
    }

    /// Measured size of the container itself.
    fn size_container(&mut self, frame: &FlexFrame, request: &LayoutRequest, max_line_main_dim: f32, total_line_cross_dim: f32) {
        let node = frame.node;
        let owner_width = request.owner_width;
        let style = &self.node(node).style;
        let margin_row = style.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_column = style.margin_for_axis(FlexDirection::Column, owner_width);
        let mut width = self.bound_axis(node, FlexDirection::Row, request.available_width - margin_row, owner_width, owner_width);
        let mut height =
            self.bound_axis(node, FlexDirection::Column, request.available_height - margin_column, request.owner_height, owner_width);

        let main = self.content_based_size(
            frame,
            frame.main_axis,
            frame.measure_mode_main,
            max_line_main_dim,
            frame.available_inner_main,
        );
        let cross = self.content_based_size(
            frame,
            frame.cross_axis,
            frame.measure_mode_cross,
            total_line_cross_dim + frame.padding_and_border_cross,
            frame.available_inner_cross,
        );
        let (row, column) = if frame.is_main_axis_row { (main, cross) } else { (cross, main) };
        if let Some(row) = row {
            width = row;
        }
        if let Some(column) = column {
            height = column;
        }
        let layout = &mut self.node_mut(node).layout;
        layout.set_measured(Dimension::Width, width);
        layout.set_measured(Dimension::Height, height);
    }

    /// Wrap-reverse mirroring, absolute children and trailing offsets.
    fn finish_children(&mut self, frame: &FlexFrame, children: &[NodeId]) {
        let node = frame.node;
        let cross_axis = frame.cross_axis;
        if frame.wrap == Wrap::WrapReverse {
            let container_cross = self.measured(node, cross_axis.dimension());
            for &child in children {
                if self.node(child).style.position_type != PositionType::Relative {
                    continue;
                }
                let child_cross = self.measured(child, cross_axis.dimension());
                let layout = &mut self.node_mut(child).layout;
                let leading = layout.position(cross_axis.leading_edge());
                layout.set_position(cross_axis.leading_edge(), container_cross - leading - child_cross);
            }
        }

        let context = AbsoluteContext {
            width: frame.available_inner_width,
            width_mode: if frame.is_main_axis_row { frame.measure_mode_main } else { frame.measure_mode_cross },
            height: frame.available_inner_height,
            direction: frame.direction,
        };
        for &child in children {
            let style = &self.node(child).style;
            if style.display == Display::None || style.position_type == PositionType::Relative {
                continue;
            }
            self.layout_absolute_child(node, child, context);
        }

        let main_reversed = frame.main_axis.is_reverse();
        let cross_reversed = cross_axis.is_reverse();
        if !main_reversed && !cross_reversed {
            return;
        }
        for &child in children {
            if self.node(child).style.display == Display::None {
                continue;
            }
            if main_reversed {
                self.set_child_trailing_position(node, child, frame.main_axis);
            }
            if cross_reversed {
                self.set_child_trailing_position(node, child, cross_axis);
            }
        }
    }
}
