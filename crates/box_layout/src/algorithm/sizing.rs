//! Size clamping and per-node queries shared by the layout steps.

use indextree::NodeId;

use crate::enums::{Align, Dimension, Direction, Edge, FlexDirection, MeasureMode, PositionType};
use crate::tree::LayoutTree;
use crate::value::{StyleValue, float_max, float_min, is_undefined};

impl LayoutTree {
    pub(super) fn has_owner(&self, node: NodeId) -> bool {
        self.owner(node).is_some()
    }

    pub(super) fn flex_grow(&self, node: NodeId) -> f32 {
        self.node(node).style.resolved_flex_grow(self.has_owner(node))
    }

    pub(super) fn flex_shrink(&self, node: NodeId) -> f32 {
        let data = self.node(node);
        data.style
            .resolved_flex_shrink(self.has_owner(node), data.config.use_web_defaults())
    }

    pub(super) fn is_flexible(&self, node: NodeId) -> bool {
        let data = self.node(node);
        data.style
            .is_flexible(self.has_owner(node), data.config.use_web_defaults())
    }

    /// `direction` of the node, or the owner's when it inherits.
    pub(super) fn resolve_direction(&self, node: NodeId, owner_direction: Direction) -> Direction {
        match self.node(node).style.direction {
            Direction::Inherit if owner_direction == Direction::Inherit => Direction::Ltr,
            Direction::Inherit => owner_direction,
            direction => direction,
        }
    }

    pub(crate) fn resolved_dimension(&self, node: NodeId, dimension: Dimension) -> StyleValue {
        self.node(node).style.resolved_dimension(dimension)
    }

    fn declared_align(&self, parent: NodeId, child: NodeId) -> Align {
        match self.node(child).style.align_self {
            Align::Auto => self.node(parent).style.align_items,
            align => align,
        }
    }

    /// Whether the cross alignment of `child` has no meaning in `parent` and must fall back.
    fn needs_align_fallback(&self, parent: NodeId, child: NodeId) -> bool {
        self.declared_align(parent, child) == Align::Baseline && self.node(parent).style.flex_direction.is_column()
    }

    /// Whether `child` is aligned by the legacy stretch fallback instead of flex-start.
    pub(super) fn uses_legacy_align_fallback(&self, parent: NodeId, child: NodeId) -> bool {
        self.needs_align_fallback(parent, child) && self.node(parent).config.use_legacy_stretch_behaviour()
    }

    /// Effective cross alignment of `child` inside `parent`.
    ///
    /// Baseline alignment across a column falls back to flex-start, or to
    /// stretch under the legacy stretch behaviour.
    pub(super) fn align_item(&self, parent: NodeId, child: NodeId) -> Align {
        if !self.needs_align_fallback(parent, child) {
            return self.declared_align(parent, child);
        }
        if self.node(parent).config.use_legacy_stretch_behaviour() {
            Align::Stretch
        } else {
            Align::FlexStart
        }
    }

    /// Whether the style pins the size along `axis` to a usable value.
    pub(crate) fn is_style_dim_defined(&self, node: NodeId, axis: FlexDirection, owner_size: f32) -> bool {
        match self.resolved_dimension(node, axis.dimension()) {
            StyleValue::Auto | StyleValue::Undefined => false,
            StyleValue::Point(points) => points >= 0.0,
            StyleValue::Percent(percent) => percent >= 0.0 && !is_undefined(owner_size),
        }
    }

    pub(super) fn is_layout_dim_defined(&self, node: NodeId, axis: FlexDirection) -> bool {
        let value = self.node(node).layout.measured(axis.dimension());
        !is_undefined(value) && value >= 0.0
    }

    pub(super) fn measured(&self, node: NodeId, dimension: Dimension) -> f32 {
        self.node(node).layout.measured(dimension)
    }

    pub(super) fn dim_with_margin(&self, node: NodeId, axis: FlexDirection, width_size: f32) -> f32 {
        let data = self.node(node);
        data.layout.measured(axis.dimension())
            + data.style.leading_margin(axis, width_size)
            + data.style.trailing_margin(axis, width_size)
    }

    /// Clamp `value` to the node's min/max along `axis`.
    pub(super) fn bound_axis_within_min_max(
        &self,
        node: NodeId,
        axis: FlexDirection,
        value: f32,
        axis_size: f32,
    ) -> f32 {
        let style = &self.node(node).style;
        let dimension = axis.dimension();
        let min = style.min_dimension(dimension).resolve(axis_size);
        let max = style.max_dimension(dimension).resolve(axis_size);
        let mut bound = value;
        if let Some(max) = max
            && max >= 0.0
            && bound > max
        {
            bound = max;
        }
        if let Some(min) = min
            && min >= 0.0
            && bound < min
        {
            bound = min;
        }
        bound
    }

    /// Like [`Self::bound_axis_within_min_max`], never below padding plus border.
    pub(super) fn bound_axis(
        &self,
        node: NodeId,
        axis: FlexDirection,
        value: f32,
        axis_size: f32,
        width_size: f32,
    ) -> f32 {
        float_max(
            self.bound_axis_within_min_max(node, axis, value, axis_size),
            self.node(node).style.padding_and_border_for_axis(axis, width_size),
        )
    }

    /// Tighten a measure constraint with the node's max size.
    pub(super) fn constrain_max_size_for_mode(
        &self,
        node: NodeId,
        axis: FlexDirection,
        owner_axis_size: f32,
        owner_width: f32,
        mode: &mut MeasureMode,
        size: &mut f32,
    ) {
        let style = &self.node(node).style;
        let max_size = style
            .max_dimension(axis.dimension())
            .resolve(owner_axis_size)
            .map(|max| max + style.margin_for_axis(axis, owner_width));
        match *mode {
            MeasureMode::Exactly | MeasureMode::AtMost => {
                if let Some(max_size) = max_size {
                    if *size > max_size {
                        *size = max_size;
                    }
                }
            }
            MeasureMode::Undefined => {
                if let Some(max_size) = max_size {
                    *mode = MeasureMode::AtMost;
                    *size = max_size;
                }
            }
        }
    }

    /// Write margin plus relative offset into the node's position slots.
    ///
    /// Roots always lay out their own axes left-to-right; the direction only
    /// flips the axes of their children.
    pub(crate) fn place_relative(
        &mut self,
        node: NodeId,
        direction: Direction,
        main_size: f32,
        cross_size: f32,
        owner_width: f32,
    ) {
        let direction = if self.has_owner(node) { direction } else { Direction::Ltr };
        let data = self.node_mut(node);
        let main_axis = data.style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let relative_main = data.style.relative_position(main_axis, main_size);
        let relative_cross = data.style.relative_position(cross_axis, cross_size);

        let leading_main = data.style.leading_margin(main_axis, owner_width) + relative_main;
        let trailing_main = data.style.trailing_margin(main_axis, owner_width) + relative_main;
        let leading_cross = data.style.leading_margin(cross_axis, owner_width) + relative_cross;
        let trailing_cross = data.style.trailing_margin(cross_axis, owner_width) + relative_cross;
        data.layout.set_position(main_axis.leading_edge(), leading_main);
        data.layout.set_position(main_axis.trailing_edge(), trailing_main);
        data.layout.set_position(cross_axis.leading_edge(), leading_cross);
        data.layout.set_position(cross_axis.trailing_edge(), trailing_cross);
    }

    /// Mirror the leading offset of `child` onto its trailing edge.
    pub(super) fn set_child_trailing_position(&mut self, parent: NodeId, child: NodeId, axis: FlexDirection) {
        let parent_size = self.measured(parent, axis.dimension());
        let layout = &mut self.node_mut(child).layout;
        let size = layout.measured(axis.dimension());
        let leading = layout.position(axis.leading_edge());
        layout.set_position(axis.trailing_edge(), parent_size - size - leading);
    }

    /// Distance from the node's top edge to its first baseline.
    pub(super) fn baseline(&self, node: NodeId) -> f32 {
        let data = self.node(node);
        if let Some(hook) = &data.baseline {
            return hook.baseline(
                node,
                data.layout.measured(Dimension::Width),
                data.layout.measured(Dimension::Height),
            );
        }

        let mut baseline_child = None;
        for child in self.children(node) {
            let child_data = self.node(child);
            if child_data.line_index > 0 {
                break;
            }
            if child_data.style.position_type == PositionType::Absolute {
                continue;
            }
            if self.align_item(node, child) == Align::Baseline || child_data.is_reference_baseline {
                baseline_child = Some(child);
                break;
            }
            if baseline_child.is_none() {
                baseline_child = Some(child);
            }
        }

        match baseline_child {
            Some(child) => self.baseline(child) + self.node(child).layout.position(Edge::Top),
            None => data.layout.measured(Dimension::Height),
        }
    }

    /// Whether any item of a row container aligns to the baseline.
    pub(super) fn is_baseline_layout(&self, node: NodeId) -> bool {
        let style = &self.node(node).style;
        if style.flex_direction.is_column() {
            return false;
        }
        if style.align_items == Align::Baseline {
            return true;
        }
        self.children(node).any(|child| {
            let child_style = &self.node(child).style;
            child_style.position_type == PositionType::Relative
                && child_style.align_self == Align::Baseline
        })
    }
}

/// Clamp `value` into `[min, max]`, ignoring undefined bounds.
pub(super) fn clamp_defined(value: f32, min: f32, max: f32) -> f32 {
    float_max(float_min(value, max), min)
}
