//! Nodes sized without running the flex algorithm over children.

use indextree::NodeId;
use log::trace;

use super::LayoutRequest;
use crate::enums::{Dimension, FlexDirection, MeasureMode};
use crate::tree::LayoutTree;
use crate::value::{Size, is_undefined};

impl LayoutTree {
    /// Size a leaf through its measure callback.
    pub(super) fn measure_leaf(&mut self, node: NodeId, request: &LayoutRequest) {
        let data = self.node(node);
        let style = &data.style;
        let available_width = request.available_width;
        let available_height = request.available_height;
        let padding_border_row = style.padding_and_border_for_axis(FlexDirection::Row, available_width);
        let padding_border_column =
            style.padding_and_border_for_axis(FlexDirection::Column, available_width);
        let margin_row = style.margin_for_axis(FlexDirection::Row, available_width);
        let margin_column = style.margin_for_axis(FlexDirection::Column, available_width);

        let inner_width = if is_undefined(available_width) {
            available_width
        } else {
            (available_width - margin_row - padding_border_row).max(0.0)
        };
        let inner_height = if is_undefined(available_height) {
            available_height
        } else {
            (available_height - margin_column - padding_border_column).max(0.0)
        };

        let size = if request.width_mode == MeasureMode::Exactly && request.height_mode == MeasureMode::Exactly {
            Size::new(available_width - margin_row, available_height - margin_column)
        } else {
            let measured = data.measure.as_ref().map_or(Size::new(0.0, 0.0), |measure| {
                measure.measure(node, inner_width, request.width_mode, inner_height, request.height_mode)
            });
            trace!(
                target: "box_layout::flex",
                "[MEASURE] node={node:?} inner={inner_width:.3}x{inner_height:.3} -> {:.3}x{:.3}",
                measured.width, measured.height
            );
            let width = if request.width_mode == MeasureMode::Exactly {
                available_width - margin_row
            } else {
                measured.width + padding_border_row
            };
            let height = if request.height_mode == MeasureMode::Exactly {
                available_height - margin_column
            } else {
                measured.height + padding_border_column
            };
            Size::new(width, height)
        };

        let width = self.bound_axis(node, FlexDirection::Row, size.width, request.owner_width, request.owner_width);
        let height =
            self.bound_axis(node, FlexDirection::Column, size.height, request.owner_height, request.owner_width);
        let layout = &mut self.node_mut(node).layout;
        layout.set_measured(Dimension::Width, width);
        layout.set_measured(Dimension::Height, height);
    }

    /// A container without children is as large as its padding and border
    /// unless the constraint is exact.
    pub(super) fn layout_empty_container(&mut self, node: NodeId, request: &LayoutRequest) {
        let style = &self.node(node).style;
        let owner_width = request.owner_width;
        let padding_border_row = style.padding_and_border_for_axis(FlexDirection::Row, owner_width);
        let padding_border_column = style.padding_and_border_for_axis(FlexDirection::Column, owner_width);
        let margin_row = style.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_column = style.margin_for_axis(FlexDirection::Column, owner_width);

        let width = match request.width_mode {
            MeasureMode::Undefined | MeasureMode::AtMost => padding_border_row,
            MeasureMode::Exactly => request.available_width - margin_row,
        };
        let height = match request.height_mode {
            MeasureMode::Undefined | MeasureMode::AtMost => padding_border_column,
            MeasureMode::Exactly => request.available_height - margin_column,
        };
        let width = self.bound_axis(node, FlexDirection::Row, width, owner_width, owner_width);
        let height = self.bound_axis(node, FlexDirection::Column, height, request.owner_height, owner_width);
        let layout = &mut self.node_mut(node).layout;
        layout.set_measured(Dimension::Width, width);
        layout.set_measured(Dimension::Height, height);
    }

    /// Skip measuring children when the outcome is already known: both axes
    /// exact, or an at-most axis with no room at all.
    ///
    /// Returns whether the node was sized here.
    pub(super) fn try_fixed_size(&mut self, node: NodeId, request: &LayoutRequest) -> bool {
        let no_width = request.width_mode == MeasureMode::AtMost && request.available_width <= 0.0;
        let no_height = request.height_mode == MeasureMode::AtMost && request.available_height <= 0.0;
        let exact = request.width_mode == MeasureMode::Exactly && request.height_mode == MeasureMode::Exactly;
        if !(no_width || no_height || exact) {
            return false;
        }

        let style = &self.node(node).style;
        let owner_width = request.owner_width;
        let margin_row = style.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_column = style.margin_for_axis(FlexDirection::Column, owner_width);
        let width = if is_undefined(request.available_width)
            || (request.width_mode == MeasureMode::AtMost && request.available_width < 0.0)
        {
            0.0
        } else {
            request.available_width - margin_row
        };
        let height = if is_undefined(request.available_height)
            || (request.height_mode == MeasureMode::AtMost && request.available_height < 0.0)
        {
            0.0
        } else {
            request.available_height - margin_column
        };
        let width = self.bound_axis(node, FlexDirection::Row, width, owner_width, owner_width);
        let height = self.bound_axis(node, FlexDirection::Column, height, request.owner_height, owner_width);
        let layout = &mut self.node_mut(node).layout;
        layout.set_measured(Dimension::Width, width);
        layout.set_measured(Dimension::Height, height);
        true
    }
}
