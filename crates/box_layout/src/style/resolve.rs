//! Axis-relative resolution of edge values and flex factors.
//!
//! Row axes prefer the logical start/end edges over the physical ones;
//! unresolvable values (percentages of an undefined size) count as zero.

use super::Style;
use crate::enums::{Dimension, Edge, FlexDirection, PositionType};
use crate::value::StyleValue;

const DEFAULT_FLEX_GROW: f32 = 0.0;
const DEFAULT_FLEX_SHRINK: f32 = 0.0;
const WEB_DEFAULT_FLEX_SHRINK: f32 = 1.0;

impl Style {
    fn logical_or_physical(
        edges: &super::Edges,
        axis: FlexDirection,
        logical: Edge,
        physical: Edge,
    ) -> StyleValue {
        if axis.is_row() {
            let value = edges.computed(logical, StyleValue::Undefined);
            if !value.is_undefined() {
                return value;
            }
        }
        edges.computed(physical, StyleValue::Undefined)
    }

    pub(crate) fn is_leading_position_defined(&self, axis: FlexDirection) -> bool {
        !Self::logical_or_physical(&self.position, axis, Edge::Start, axis.leading_edge())
            .is_undefined()
    }

    pub(crate) fn is_trailing_position_defined(&self, axis: FlexDirection) -> bool {
        !Self::logical_or_physical(&self.position, axis, Edge::End, axis.trailing_edge())
            .is_undefined()
    }

    pub(crate) fn leading_position(&self, axis: FlexDirection, axis_size: f32) -> f32 {
        Self::logical_or_physical(&self.position, axis, Edge::Start, axis.leading_edge())
            .resolve(axis_size)
            .unwrap_or(0.0)
    }

    pub(crate) fn trailing_position(&self, axis: FlexDirection, axis_size: f32) -> f32 {
        Self::logical_or_physical(&self.position, axis, Edge::End, axis.trailing_edge())
            .resolve(axis_size)
            .unwrap_or(0.0)
    }

    /// Offset applied to a relatively positioned box; leading wins over trailing.
    pub(crate) fn relative_position(&self, axis: FlexDirection, axis_size: f32) -> f32 {
        if self.is_leading_position_defined(axis) {
            return self.leading_position(axis, axis_size);
        }
        -self.trailing_position(axis, axis_size)
    }

    /// Margin value on the leading edge, before resolution.
    pub(crate) fn margin_leading_value(&self, axis: FlexDirection) -> StyleValue {
        if axis.is_row() && !self.margin[Edge::Start].is_undefined() {
            return self.margin[Edge::Start];
        }
        self.margin.computed(axis.leading_edge(), StyleValue::Point(0.0))
    }

    pub(crate) fn margin_trailing_value(&self, axis: FlexDirection) -> StyleValue {
        if axis.is_row() && !self.margin[Edge::End].is_undefined() {
            return self.margin[Edge::End];
        }
        self.margin.computed(axis.trailing_edge(), StyleValue::Point(0.0))
    }

    pub(crate) fn leading_margin(&self, axis: FlexDirection, width_size: f32) -> f32 {
        if axis.is_row() && !self.margin[Edge::Start].is_undefined() {
            return self.margin[Edge::Start].resolve_margin(width_size).unwrap_or(0.0);
        }
        self.margin
            .computed(axis.leading_edge(), StyleValue::Point(0.0))
            .resolve_margin(width_size)
            .unwrap_or(0.0)
    }

    pub(crate) fn trailing_margin(&self, axis: FlexDirection, width_size: f32) -> f32 {
        if axis.is_row() && !self.margin[Edge::End].is_undefined() {
            return self.margin[Edge::End].resolve_margin(width_size).unwrap_or(0.0);
        }
        self.margin
            .computed(axis.trailing_edge(), StyleValue::Point(0.0))
            .resolve_margin(width_size)
            .unwrap_or(0.0)
    }

    pub(crate) fn margin_for_axis(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.leading_margin(axis, width_size) + self.trailing_margin(axis, width_size)
    }

    fn border_for(&self, axis: FlexDirection, logical: Edge, physical: Edge) -> f32 {
        if axis.is_row()
            && let Some(width) = self.border[logical].number()
            && width >= 0.0
        {
            return width;
        }
        self.border
            .computed(physical, StyleValue::Point(0.0))
            .number()
            .unwrap_or(0.0)
            .max(0.0)
    }

    pub(crate) fn leading_border(&self, axis: FlexDirection) -> f32 {
        self.border_for(axis, Edge::Start, axis.leading_edge())
    }

    pub(crate) fn trailing_border(&self, axis: FlexDirection) -> f32 {
        self.border_for(axis, Edge::End, axis.trailing_edge())
    }

    fn padding_for(&self, axis: FlexDirection, logical: Edge, physical: Edge, width_size: f32) -> f32 {
        if axis.is_row()
            && let Some(padding) = self.padding[logical].resolve(width_size)
            && padding >= 0.0
        {
            return padding;
        }
        self.padding
            .computed(physical, StyleValue::Point(0.0))
            .resolve(width_size)
            .unwrap_or(0.0)
            .max(0.0)
    }

    pub(crate) fn leading_padding(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.padding_for(axis, Edge::Start, axis.leading_edge(), width_size)
    }

    pub(crate) fn trailing_padding(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.padding_for(axis, Edge::End, axis.trailing_edge(), width_size)
    }

    pub(crate) fn leading_padding_and_border(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.leading_padding(axis, width_size) + self.leading_border(axis)
    }

    pub(crate) fn trailing_padding_and_border(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.trailing_padding(axis, width_size) + self.trailing_border(axis)
    }

    pub(crate) fn padding_and_border_for_axis(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.leading_padding_and_border(axis, width_size)
            + self.trailing_padding_and_border(axis, width_size)
    }

    /// Grow factor; roots never grow.
    pub(crate) fn resolved_flex_grow(&self, has_owner: bool) -> f32 {
        if !has_owner {
            return 0.0;
        }
        if let Some(grow) = self.flex_grow {
            return grow;
        }
        match self.flex {
            Some(flex) if flex > 0.0 => flex,
            _ => DEFAULT_FLEX_GROW,
        }
    }

    /// Shrink factor; roots never shrink.
    pub(crate) fn resolved_flex_shrink(&self, has_owner: bool, use_web_defaults: bool) -> f32 {
        if !has_owner {
            return 0.0;
        }
        if let Some(shrink) = self.flex_shrink {
            return shrink;
        }
        if !use_web_defaults
            && let Some(flex) = self.flex
            && flex < 0.0
        {
            return -flex;
        }
        if use_web_defaults {
            WEB_DEFAULT_FLEX_SHRINK
        } else {
            DEFAULT_FLEX_SHRINK
        }
    }

    pub(crate) fn resolved_flex_basis(&self, use_web_defaults: bool) -> StyleValue {
        if !matches!(self.flex_basis, StyleValue::Auto | StyleValue::Undefined) {
            return self.flex_basis;
        }
        match self.flex {
            Some(flex) if flex > 0.0 => {
                if use_web_defaults {
                    StyleValue::Auto
                } else {
                    StyleValue::Point(0.0)
                }
            }
            _ => StyleValue::Auto,
        }
    }

    pub(crate) fn is_flexible(&self, has_owner: bool, use_web_defaults: bool) -> bool {
        self.position_type == PositionType::Relative
            && (self.resolved_flex_grow(has_owner) != 0.0
                || self.resolved_flex_shrink(has_owner, use_web_defaults) != 0.0)
    }

    /// Dimension used for sizing; equal min and max collapse to that value.
    pub(crate) fn resolved_dimension(&self, dimension: Dimension) -> StyleValue {
        let max = self.max_dimension(dimension);
        if !max.is_undefined() && max == self.min_dimension(dimension) {
            return max;
        }
        self.dimension(dimension)
    }
}
