//! Flexbox layout pass.
//!
//! `calculate_layout` drives a recursive pass over the tree. Each node is
//! visited through [`LayoutTree::layout_node_internal`], which answers from the
//! node's measurement cache when it can and otherwise runs the container or
//! leaf algorithm. Results are written into the node's `LayoutResults`.

mod absolute;
mod container;
mod cross_axis;
mod flex_basis;
mod justify;
mod leaf;
mod lines;
mod sizing;

use indextree::NodeId;
use log::trace;

use crate::cache::CacheQuery;
use crate::enums::{Dimension, Direction, FlexDirection, MeasureMode};
use crate::tree::LayoutTree;
use crate::value::{OrUndefined as _, is_undefined};

/// Why a node is being laid out. Only used for tracing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum LayoutReason {
    Initial,
    AbsoluteLayout,
    Stretch,
    MultilineStretch,
    FlexLayout,
    MeasureChild,
    AbsoluteMeasureChild,
}

/// Constraints a node is sized under during one visit.
#[derive(Copy, Clone, Debug)]
pub(crate) struct LayoutRequest {
    pub(crate) available_width: f32,
    pub(crate) available_height: f32,
    pub(crate) owner_direction: Direction,
    pub(crate) width_mode: MeasureMode,
    pub(crate) height_mode: MeasureMode,
    pub(crate) owner_width: f32,
    pub(crate) owner_height: f32,
    /// `false` only measures; positions of descendants are left untouched.
    pub(crate) perform_layout: bool,
    pub(crate) reason: LayoutReason,
}

impl LayoutRequest {
    const fn query(&self) -> CacheQuery {
        CacheQuery {
            width: self.available_width,
            width_mode: self.width_mode,
            height: self.available_height,
            height_mode: self.height_mode,
        }
    }
}

impl LayoutTree {
    /// Lay out the subtree rooted at `root`.
    ///
    /// `owner_width` and `owner_height` are the space the root may occupy;
    /// `None` leaves that axis unconstrained. Positions and sizes are rounded
    /// to the root config's pixel grid afterwards. Calling this again without
    /// mutating the tree produces identical results.
    pub fn calculate_layout(
        &mut self,
        root: NodeId,
        owner_width: Option<f32>,
        owner_height: Option<f32>,
        owner_direction: Direction,
    ) {
        self.generation = self.generation.wrapping_add(1);
        let span = tracing::debug_span!(
            "calculate_layout",
            node = ?root,
            generation = self.generation,
            owner_width = ?owner_width,
            owner_height = ?owner_height
        );
        let _entered = span.enter();

        let owner_width = owner_width.or_undefined();
        let owner_height = owner_height.or_undefined();
        let (width, width_mode) =
            self.root_constraint(root, FlexDirection::Row, owner_width, owner_width);
        let (height, height_mode) =
            self.root_constraint(root, FlexDirection::Column, owner_height, owner_width);

        let request = LayoutRequest {
            available_width: width,
            available_height: height,
            owner_direction,
            width_mode,
            height_mode,
            owner_width,
            owner_height,
            perform_layout: true,
            reason: LayoutReason::Initial,
        };
        self.layout_node_internal(root, request);

        let direction = self.node(root).layout.direction;
        self.place_relative(root, direction, owner_width, owner_height, owner_width);
        let point_scale_factor = self.node(root).config.point_scale_factor();
        self.round_to_pixel_grid(root, point_scale_factor, 0.0, 0.0);
        trace!(target: "box_layout::flex", "[LAYOUT] done root={root:?} generation={}", self.generation);
    }

    /// Available size and mode for the root along one axis.
    fn root_constraint(
        &self,
        root: NodeId,
        axis: FlexDirection,
        owner_size: f32,
        owner_width: f32,
    ) -> (f32, MeasureMode) {
        let dimension = axis.dimension();
        if self.is_style_dim_defined(root, axis, owner_size) {
            let style = &self.node(root).style;
            let size = self.resolved_dimension(root, dimension).resolve(owner_size).or_undefined()
                + style.margin_for_axis(axis, owner_width);
            return (size, MeasureMode::Exactly);
        }
        let max = self.node(root).style.max_dimension(dimension).resolve(owner_size);
        if let Some(max) = max.filter(|max| *max >= 0.0) {
            return (max, MeasureMode::AtMost);
        }
        let mode = if is_undefined(owner_size) {
            MeasureMode::Undefined
        } else {
            MeasureMode::Exactly
        };
        (owner_size, mode)
    }

    /// Size `node` under `request`, reusing a cached result when possible.
    ///
    /// Returns whether the node was actually recomputed.
    pub(crate) fn layout_node_internal(&mut self, node: NodeId, request: LayoutRequest) -> bool {
        let generation = self.generation;
        let (need_to_visit, cached, config_revision) = {
            let data = self.node(node);
            let layout = &data.layout;
            let config_revision = data.config.revision();
            let need_to_visit = (data.is_dirty && layout.generation_count != generation)
                || layout.last_owner_direction != Some(request.owner_direction)
                || layout.config_revision != Some(config_revision);
            let cached = if need_to_visit {
                None
            } else if data.measure.is_some() {
                let style = &data.style;
                layout.cache.find_compatible(
                    request.query(),
                    style.margin_for_axis(FlexDirection::Row, request.owner_width),
                    style.margin_for_axis(FlexDirection::Column, request.owner_width),
                    data.config.point_scale_factor(),
                )
            } else {
                layout.cache.find_exact(request.query(), request.perform_layout)
            };
            (need_to_visit, cached, config_revision)
        };

        if need_to_visit {
            self.node_mut(node).layout.cache.clear();
        }

        if let Some(entry) = cached {
            trace!(
                target: "box_layout::cache",
                "[CACHE] hit node={node:?} reason={:?} size={:.3}x{:.3}",
                request.reason, entry.computed_width, entry.computed_height
            );
            let layout = &mut self.node_mut(node).layout;
            layout.set_measured(Dimension::Width, entry.computed_width);
            layout.set_measured(Dimension::Height, entry.computed_height);
        } else {
            trace!(
                target: "box_layout::flex",
                "[LAYOUT] visit node={node:?} reason={:?} avail={:.3}x{:.3} modes={:?}/{:?} layout={}",
                request.reason,
                request.available_width,
                request.available_height,
                request.width_mode,
                request.height_mode,
                request.perform_layout
            );
            self.layout_impl(node, &request);
            let data = self.node_mut(node);
            data.layout.last_owner_direction = Some(request.owner_direction);
            data.layout.config_revision = Some(config_revision);
            let computed_width = data.layout.measured(Dimension::Width);
            let computed_height = data.layout.measured(Dimension::Height);
            data.layout.cache.store(request.query(), request.perform_layout, computed_width, computed_height);
        }

        if request.perform_layout {
            let data = self.node_mut(node);
            let width = data.layout.measured(Dimension::Width);
            let height = data.layout.measured(Dimension::Height);
            data.layout.set_dimension(Dimension::Width, width);
            data.layout.set_dimension(Dimension::Height, height);
            data.has_new_layout = true;
            self.set_dirty(node, false);
        }

        self.node_mut(node).layout.generation_count = generation;
        cached.is_none()
    }
}

