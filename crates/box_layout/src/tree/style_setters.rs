//! Per-property style setters.
//!
//! Every setter compares against the stored value, unit included, and only
//! dirties the node when something changed. Point, percent and auto setters of
//! one property write the same slot, so the last call wins.

use indextree::NodeId;

use super::LayoutTree;
use crate::enums::{
    Align, Dimension, Direction, Display, Edge, FlexDirection, Justify, Overflow, PositionType,
    Wrap,
};
use crate::style::Style;
use crate::value::{StyleValue, is_undefined};

impl LayoutTree {
    fn update_style<T: PartialEq>(
        &mut self,
        node: NodeId,
        value: T,
        field: impl FnOnce(&mut Style) -> &mut T,
    ) {
        let slot = field(&mut self.node_mut(node).style);
        if *slot == value {
            return;
        }
        *slot = value;
        self.mark_dirty_and_propagate(node);
    }
}

/// NaN clears optional numbers.
fn optional(value: f32) -> Option<f32> {
    if is_undefined(value) { None } else { Some(value) }
}

macro_rules! enum_setters {
    ($($(#[$meta:meta])* $setter:ident => $field:ident: $kind:ty;)*) => {
        impl LayoutTree {
            $(
                $(#[$meta])*
                pub fn $setter(&mut self, node: NodeId, value: $kind) {
                    self.update_style(node, value, |style| &mut style.$field);
                }
            )*
        }
    };
}

enum_setters! {
    set_direction => direction: Direction;
    set_flex_direction => flex_direction: FlexDirection;
    set_justify_content => justify_content: Justify;
    set_align_content => align_content: Align;
    set_align_items => align_items: Align;
    /// `Align::Auto` defers to the owner's `align_items`.
    set_align_self => align_self: Align;
    set_position_type => position_type: PositionType;
    set_flex_wrap => flex_wrap: Wrap;
    set_overflow => overflow: Overflow;
    set_display => display: Display;
}

macro_rules! factor_setters {
    ($($(#[$meta:meta])* $setter:ident => $field:ident;)*) => {
        impl LayoutTree {
            $(
                $(#[$meta])*
                pub fn $setter(&mut self, node: NodeId, value: f32) {
                    self.update_style(node, optional(value), |style| &mut style.$field);
                }
            )*
        }
    };
}

factor_setters! {
    /// Shorthand: positive values grow, negative values shrink. NaN unsets.
    set_flex => flex;
    set_flex_grow => flex_grow;
    set_flex_shrink => flex_shrink;
    /// Width over height. NaN unsets.
    set_aspect_ratio => aspect_ratio;
}

macro_rules! dimension_setters {
    ($array:ident, $dimension:expr, $point:ident, $percent:ident $(, $auto:ident)?) => {
        impl LayoutTree {
            pub fn $point(&mut self, node: NodeId, points: f32) {
                self.update_style(node, StyleValue::point(points), |style| {
                    &mut style.$array[$dimension.index()]
                });
            }

            pub fn $percent(&mut self, node: NodeId, percent: f32) {
                self.update_style(node, StyleValue::percent(percent), |style| {
                    &mut style.$array[$dimension.index()]
                });
            }

            $(
                pub fn $auto(&mut self, node: NodeId) {
                    self.update_style(node, StyleValue::Auto, |style| {
                        &mut style.$array[$dimension.index()]
                    });
                }
            )?
        }
    };
}

dimension_setters!(dimensions, Dimension::Width, set_width, set_width_percent, set_width_auto);
dimension_setters!(dimensions, Dimension::Height, set_height, set_height_percent, set_height_auto);
dimension_setters!(min_dimensions, Dimension::Width, set_min_width, set_min_width_percent);
dimension_setters!(min_dimensions, Dimension::Height, set_min_height, set_min_height_percent);
dimension_setters!(max_dimensions, Dimension::Width, set_max_width, set_max_width_percent);
dimension_setters!(max_dimensions, Dimension::Height, set_max_height, set_max_height_percent);

macro_rules! edge_setters {
    ($edges:ident, $point:ident, $percent:ident $(, $auto:ident)?) => {
        impl LayoutTree {
            pub fn $point(&mut self, node: NodeId, edge: Edge, points: f32) {
                self.update_style(node, StyleValue::point(points), |style| &mut style.$edges[edge]);
            }

            pub fn $percent(&mut self, node: NodeId, edge: Edge, percent: f32) {
                self.update_style(node, StyleValue::percent(percent), |style| &mut style.$edges[edge]);
            }

            $(
                pub fn $auto(&mut self, node: NodeId, edge: Edge) {
                    self.update_style(node, StyleValue::Auto, |style| &mut style.$edges[edge]);
                }
            )?
        }
    };
}

edge_setters!(position, set_position, set_position_percent);
edge_setters!(margin, set_margin, set_margin_percent, set_margin_auto);
edge_setters!(padding, set_padding, set_padding_percent);

impl LayoutTree {
    /// Borders only accept points.
    pub fn set_border(&mut self, node: NodeId, edge: Edge, points: f32) {
        self.update_style(node, StyleValue::point(points), |style| &mut style.border[edge]);
    }

    pub fn set_flex_basis(&mut self, node: NodeId, points: f32) {
        self.update_style(node, StyleValue::point(points), |style| &mut style.flex_basis);
    }

    pub fn set_flex_basis_percent(&mut self, node: NodeId, percent: f32) {
        self.update_style(node, StyleValue::percent(percent), |style| &mut style.flex_basis);
    }

    pub fn set_flex_basis_auto(&mut self, node: NodeId) {
        self.update_style(node, StyleValue::Auto, |style| &mut style.flex_basis);
    }
}
