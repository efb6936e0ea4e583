//! Absolutely positioned children, sized and placed against the owner's
//! padding box after in-flow layout is done.

use indextree::NodeId;
use log::trace;

use super::{LayoutReason, LayoutRequest};
use crate::enums::{Align, Dimension, Direction, FlexDirection, Justify, MeasureMode, Wrap};
use crate::tree::LayoutTree;
use crate::value::{OrUndefined as _, UNDEFINED, is_undefined};

/// Available space the owner offers its absolute children.
#[derive(Copy, Clone, Debug)]
pub(super) struct AbsoluteContext {
    pub(super) width: f32,
    pub(super) width_mode: MeasureMode,
    pub(super) height: f32,
    pub(super) direction: Direction,
}

impl LayoutTree {
    /// Size along `axis` implied by the style or by insets on both sides.
    fn absolute_axis_size(&self, node: NodeId, child: NodeId, axis: FlexDirection, owner_size: f32, width: f32) -> f32 {
        let style = &self.node(child).style;
        if self.is_style_dim_defined(child, axis, owner_size) {
            return self.resolved_dimension(child, axis.dimension()).resolve(owner_size).or_undefined()
                + style.margin_for_axis(axis, width);
        }
        if style.is_leading_position_defined(axis) && style.is_trailing_position_defined(axis) {
            let owner_style = &self.node(node).style;
            let size = self.measured(node, axis.dimension())
                - (owner_style.leading_border(axis) + owner_style.trailing_border(axis))
                - (style.leading_position(axis, owner_size) + style.trailing_position(axis, owner_size));
            return self.bound_axis(child, axis, size, owner_size, width);
        }
        UNDEFINED
    }

    pub(super) fn layout_absolute_child(&mut self, node: NodeId, child: NodeId, context: AbsoluteContext) {
        let AbsoluteContext { width, width_mode, height, direction } = context;
        let main_axis = self.node(node).style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let is_main_axis_row = main_axis.is_row();

        let (margin_row, margin_column, aspect_ratio) = {
            let style = &self.node(child).style;
            (
                style.margin_for_axis(FlexDirection::Row, width),
                style.margin_for_axis(FlexDirection::Column, width),
                style.aspect_ratio,
            )
        };
        let mut child_width = self.absolute_axis_size(node, child, FlexDirection::Row, width, width);
        let mut child_height = self.absolute_axis_size(node, child, FlexDirection::Column, height, width);

        if is_undefined(child_width) != is_undefined(child_height)
            && let Some(ratio) = aspect_ratio
        {
            if is_undefined(child_width) {
                child_width = margin_row + (child_height - margin_column) * ratio;
            } else {
                child_height = margin_column + (child_width - margin_row) / ratio;
            }
        }

        // Unknown sizes come from measuring the content first.
        if is_undefined(child_width) || is_undefined(child_height) {
            let mut measure_width_mode = if is_undefined(child_width) {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            };
            let measure_height_mode = if is_undefined(child_height) {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            };
            if !is_main_axis_row
                && is_undefined(child_width)
                && width_mode != MeasureMode::Undefined
                && !is_undefined(width)
                && width > 0.0
            {
                child_width = width;
                measure_width_mode = MeasureMode::AtMost;
            }
            let request = LayoutRequest {
                available_width: child_width,
                available_height: child_height,
                owner_direction: direction,
                width_mode: measure_width_mode,
                height_mode: measure_height_mode,
                owner_width: child_width,
                owner_height: child_height,
                perform_layout: false,
                reason: LayoutReason::AbsoluteMeasureChild,
            };
            self.layout_node_internal(child, request);
            child_width = self.measured(child, Dimension::Width) + margin_row;
            child_height = self.measured(child, Dimension::Height) + margin_column;
        }

        let request = LayoutRequest {
            available_width: child_width,
            available_height: child_height,
            owner_direction: direction,
            width_mode: MeasureMode::Exactly,
            height_mode: MeasureMode::Exactly,
            owner_width: child_width,
            owner_height: child_height,
            perform_layout: true,
            reason: LayoutReason::AbsoluteLayout,
        };
        self.layout_node_internal(child, request);

        let main_owner_size = if is_main_axis_row { width } else { height };
        let cross_owner_size = if is_main_axis_row { height } else { width };
        self.place_absolute_child(node, child, main_axis, main_owner_size, width, true);
        self.place_absolute_child(node, child, cross_axis, cross_owner_size, width, false);
        trace!(
            target: "box_layout::flex",
            "[ABSOLUTE] child={child:?} size={child_width:.3}x{child_height:.3}"
        );
    }

    /// Leading offset of an absolute child along one axis when its leading
    /// inset is not set.
    fn place_absolute_child(
        &mut self,
        node: NodeId,
        child: NodeId,
        axis: FlexDirection,
        owner_size: f32,
        width: f32,
        is_main_axis: bool,
    ) {
        let dimension = axis.dimension();
        let owner = self.node(node);
        let style = &self.node(child).style;
        if style.is_leading_position_defined(axis) {
            return;
        }
        let free_space = owner.layout.measured(dimension) - self.measured(child, dimension);
        let offset = if style.is_trailing_position_defined(axis) {
            free_space
                - owner.style.trailing_border(axis)
                - style.trailing_margin(axis, width)
                - style.trailing_position(axis, owner_size)
        } else if is_main_axis {
            match owner.style.justify_content {
                Justify::Center => free_space / 2.0,
                Justify::FlexEnd => free_space,
                _ => return,
            }
        } else {
            let align = self.align_item(node, child);
            let wrap_reverse = owner.style.flex_wrap == Wrap::WrapReverse;
            if align == Align::Center {
                free_space / 2.0
            } else if (align == Align::FlexEnd) != wrap_reverse {
                free_space
            } else {
                return;
            }
        };
        self.node_mut(child).layout.set_position(axis.leading_edge(), offset);
    }
}
