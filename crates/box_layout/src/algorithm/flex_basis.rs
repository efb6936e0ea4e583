//! Hypothetical main size of each item before free space is distributed.

use indextree::NodeId;
use log::trace;

use super::container::FlexFrame;
use super::{LayoutReason, LayoutRequest};
use crate::enums::{Align, Dimension, Display, ExperimentalFeature, FlexDirection, MeasureMode, Overflow, PositionType};
use crate::layout::LayoutResults;
use crate::tree::LayoutTree;
use crate::value::{OrUndefined as _, UNDEFINED, float_max, is_undefined};

impl LayoutTree {
    /// Give a hidden subtree an all-zero layout.
    pub(super) fn zero_out_layout_recursively(&mut self, node: NodeId) {
        let subtree: Vec<NodeId> = node.descendants(&self.arena).collect();
        for descendant in subtree {
            let data = self.node_mut(descendant);
            data.layout = LayoutResults::zeroed();
            data.has_new_layout = true;
        }
    }

    /// Compute the flex basis of every in-flow child of the frame's node.
    ///
    /// Returns the sum of the bases plus main-axis margins.
    pub(super) fn compute_flex_basis_for_children(&mut self, frame: &FlexFrame) -> f32 {
        let node = frame.node;
        let children = self.child_list(node);
        let main_is_exact = frame.measure_mode_main == MeasureMode::Exactly;

        // A single flexible child in an exact container fills it regardless of
        // its content, so measuring it would be wasted work.
        let mut single_flex_child = None;
        if main_is_exact {
            for &child in &children {
                if !self.is_flexible(child) {
                    continue;
                }
                let has_both = self.flex_grow(child) != 0.0 && self.flex_shrink(child) != 0.0;
                if single_flex_child.is_some() || !has_both {
                    single_flex_child = None;
                    break;
                }
                single_flex_child = Some(child);
            }
        }

        let mut total_outer_flex_basis = 0.0;
        for &child in &children {
            if self.node(child).style.display == Display::None {
                self.zero_out_layout_recursively(child);
                self.node_mut(child).has_new_layout = true;
                self.set_dirty(child, false);
                continue;
            }
            if frame.perform_layout {
                let child_direction = self.resolve_direction(child, frame.direction);
                let main_size = if frame.is_main_axis_row {
                    frame.available_inner_width
                } else {
                    frame.available_inner_height
                };
                let cross_size = if frame.is_main_axis_row {
                    frame.available_inner_height
                } else {
                    frame.available_inner_width
                };
                self.place_relative(child, child_direction, main_size, cross_size, frame.available_inner_width);
            }
            if self.node(child).style.position_type == PositionType::Absolute {
                continue;
            }
            if Some(child) == single_flex_child {
                let generation = self.generation;
                let layout = &mut self.node_mut(child).layout;
                layout.computed_flex_basis_generation = generation;
                layout.computed_flex_basis = Some(0.0);
            } else {
                self.compute_flex_basis_for_child(frame, child);
            }
            let basis = self.node(child).layout.computed_flex_basis.or_undefined();
            total_outer_flex_basis += basis
                + self.node(child).style.margin_for_axis(frame.main_axis, frame.available_inner_width);
        }
        total_outer_flex_basis
    }

    fn compute_flex_basis_for_child(&mut self, frame: &FlexFrame, child: NodeId) {
        let main_axis = frame.main_axis;
        let is_main_axis_row = frame.is_main_axis_row;
        let width = frame.available_inner_width;
        let height = frame.available_inner_height;
        let main_axis_size = if is_main_axis_row { width } else { height };
        let generation = self.generation;
        let data = self.node(child);
        let web_flex_basis = data
            .config
            .is_experimental_feature_enabled(ExperimentalFeature::WebFlexBasis);
        let resolved_flex_basis = data
            .style
            .resolved_flex_basis(data.config.use_web_defaults())
            .resolve(main_axis_size);
        let is_row_style_dim_defined = self.is_style_dim_defined(child, FlexDirection::Row, width);
        let is_column_style_dim_defined = self.is_style_dim_defined(child, FlexDirection::Column, height);

        if let Some(basis) = resolved_flex_basis.filter(|_| !is_undefined(main_axis_size)) {
            let stale = data.layout.computed_flex_basis.is_none()
                || data.layout.config_revision != Some(data.config.revision())
                || (web_flex_basis && data.layout.computed_flex_basis_generation != generation);
            if stale {
                let padding_border = data.style.padding_and_border_for_axis(main_axis, width);
                self.node_mut(child).layout.computed_flex_basis = Some(basis.max(padding_border));
            }
        } else if is_main_axis_row && is_row_style_dim_defined {
            let padding_border = data.style.padding_and_border_for_axis(FlexDirection::Row, width);
            let size = self.resolved_dimension(child, Dimension::Width).resolve(width).or_undefined();
            self.node_mut(child).layout.computed_flex_basis = Some(float_max(size, padding_border));
        } else if !is_main_axis_row && is_column_style_dim_defined {
            let padding_border = data.style.padding_and_border_for_axis(FlexDirection::Column, width);
            let size = self.resolved_dimension(child, Dimension::Height).resolve(height).or_undefined();
            self.node_mut(child).layout.computed_flex_basis = Some(float_max(size, padding_border));
        } else {
            self.measure_flex_basis(frame, child, is_row_style_dim_defined, is_column_style_dim_defined);
        }

        self.node_mut(child).layout.computed_flex_basis_generation = generation;
        trace!(
            target: "box_layout::flex",
            "[FLEX-BASIS] child={child:?} basis={:?}",
            self.node(child).layout.computed_flex_basis
        );
    }

    /// Flex basis of an item whose main size is content based.
    fn measure_flex_basis(
        &mut self,
        frame: &FlexFrame,
        child: NodeId,
        is_row_style_dim_defined: bool,
        is_column_style_dim_defined: bool,
    ) {
        let node = frame.node;
        let main_axis = frame.main_axis;
        let is_main_axis_row = frame.is_main_axis_row;
        let width = frame.available_inner_width;
        let height = frame.available_inner_height;
        let owner_width = width;
        let owner_height = height;

        let data = self.node(child);
        let margin_row = data.style.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_column = data.style.margin_for_axis(FlexDirection::Column, owner_width);
        let aspect_ratio = data.style.aspect_ratio;

        let mut child_width = UNDEFINED;
        let mut child_height = UNDEFINED;
        let mut width_mode = MeasureMode::Undefined;
        let mut height_mode = MeasureMode::Undefined;

        if is_row_style_dim_defined {
            child_width = self.resolved_dimension(child, Dimension::Width).resolve(owner_width).or_undefined()
                + margin_row;
            width_mode = MeasureMode::Exactly;
        }
        if is_column_style_dim_defined {
            child_height = self.resolved_dimension(child, Dimension::Height).resolve(owner_height).or_undefined()
                + margin_column;
            height_mode = MeasureMode::Exactly;
        }

        // Scroll containers are sized by their content only along the main axis.
        let overflow = self.node(node).style.overflow;
        let scrolls = overflow == Overflow::Scroll;
        if (!scrolls || !is_main_axis_row) && is_undefined(child_width) && !is_undefined(width) {
            child_width = width;
            width_mode = MeasureMode::AtMost;
        }
        if (!scrolls || is_main_axis_row) && is_undefined(child_height) && !is_undefined(height) {
            child_height = height;
            height_mode = MeasureMode::AtMost;
        }

        if let Some(ratio) = aspect_ratio {
            if !is_main_axis_row && width_mode == MeasureMode::Exactly {
                child_height = margin_column + (child_width - margin_row) / ratio;
                height_mode = MeasureMode::Exactly;
            } else if is_main_axis_row && height_mode == MeasureMode::Exactly {
                child_width = margin_row + (child_height - margin_column) * ratio;
                width_mode = MeasureMode::Exactly;
            }
        }

        // Stretched items take the container's cross size when it is known.
        let has_exact_width = !is_undefined(width) && frame.width_mode == MeasureMode::Exactly;
        let stretches = self.align_item(node, child) == Align::Stretch;
        if !is_main_axis_row && !is_row_style_dim_defined && has_exact_width && width_mode != MeasureMode::Exactly && stretches {
            child_width = width;
            width_mode = MeasureMode::Exactly;
            if let Some(ratio) = aspect_ratio {
                child_height = (child_width - margin_row) / ratio;
                height_mode = MeasureMode::Exactly;
            }
        }
        let has_exact_height = !is_undefined(height) && frame.height_mode == MeasureMode::Exactly;
        if is_main_axis_row && !is_column_style_dim_defined && has_exact_height && height_mode != MeasureMode::Exactly && stretches {
            child_height = height;
            height_mode = MeasureMode::Exactly;
            if let Some(ratio) = aspect_ratio {
                child_width = (child_height - margin_column) * ratio;
                width_mode = MeasureMode::Exactly;
            }
        }

        self.constrain_max_size_for_mode(child, FlexDirection::Row, owner_width, owner_width, &mut width_mode, &mut child_width);
        self.constrain_max_size_for_mode(child, FlexDirection::Column, owner_height, owner_width, &mut height_mode, &mut child_height);

        let request = LayoutRequest {
            available_width: child_width,
            available_height: child_height,
            owner_direction: frame.direction,
            width_mode,
            height_mode,
            owner_width,
            owner_height,
            perform_layout: false,
            reason: LayoutReason::MeasureChild,
        };
        self.layout_node_internal(child, request);

        let measured = self.measured(child, main_axis.dimension());
        let padding_border = self.node(child).style.padding_and_border_for_axis(main_axis, owner_width);
        self.node_mut(child).layout.computed_flex_basis = Some(float_max(measured, padding_border));
    }
}
