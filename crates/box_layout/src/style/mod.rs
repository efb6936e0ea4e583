//! Per-node layout style.
//!
//! A [`Style`] is a plain value: the tree owns one per node and every setter
//! on [`crate::LayoutTree`] replaces a single property, dirtying the node only
//! when the stored value actually changes.

mod resolve;

use core::ops::{Index, IndexMut};

use crate::enums::{
    Align, Dimension, Direction, Display, Edge, FlexDirection, Justify, Overflow, PositionType,
    Wrap,
};
use crate::value::StyleValue;

/// One style value per [`Edge`], shorthands included.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Edges([StyleValue; Edge::COUNT]);

impl Edges {
    /// Value for `edge` after falling back through the shorthands.
    ///
    /// Start and end never fall back to `default`; they stay undefined so
    /// callers can prefer the physical edge instead.
    pub(crate) fn computed(&self, edge: Edge, default: StyleValue) -> StyleValue {
        let own = self[edge];
        if !own.is_undefined() {
            return own;
        }
        let vertical = self[Edge::Vertical];
        if matches!(edge, Edge::Top | Edge::Bottom) && !vertical.is_undefined() {
            return vertical;
        }
        let horizontal = self[Edge::Horizontal];
        if matches!(edge, Edge::Left | Edge::Right | Edge::Start | Edge::End)
            && !horizontal.is_undefined()
        {
            return horizontal;
        }
        let all = self[Edge::All];
        if !all.is_undefined() {
            return all;
        }
        if matches!(edge, Edge::Start | Edge::End) {
            return StyleValue::Undefined;
        }
        default
    }
}

impl Index<Edge> for Edges {
    type Output = StyleValue;

    fn index(&self, edge: Edge) -> &StyleValue {
        &self.0[edge.index()]
    }
}

impl IndexMut<Edge> for Edges {
    fn index_mut(&mut self, edge: Edge) -> &mut StyleValue {
        &mut self.0[edge.index()]
    }
}

/// Layout properties of a single node.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub(crate) direction: Direction,
    pub(crate) flex_direction: FlexDirection,
    pub(crate) justify_content: Justify,
    pub(crate) align_content: Align,
    pub(crate) align_items: Align,
    pub(crate) align_self: Align,
    pub(crate) position_type: PositionType,
    pub(crate) flex_wrap: Wrap,
    pub(crate) overflow: Overflow,
    pub(crate) display: Display,
    pub(crate) flex: Option<f32>,
    pub(crate) flex_grow: Option<f32>,
    pub(crate) flex_shrink: Option<f32>,
    pub(crate) flex_basis: StyleValue,
    pub(crate) margin: Edges,
    pub(crate) position: Edges,
    pub(crate) padding: Edges,
    pub(crate) border: Edges,
    pub(crate) dimensions: [StyleValue; 2],
    pub(crate) min_dimensions: [StyleValue; 2],
    pub(crate) max_dimensions: [StyleValue; 2],
    pub(crate) aspect_ratio: Option<f32>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            direction: Direction::Inherit,
            flex_direction: FlexDirection::Column,
            justify_content: Justify::FlexStart,
            align_content: Align::FlexStart,
            align_items: Align::Stretch,
            align_self: Align::Auto,
            position_type: PositionType::Relative,
            flex_wrap: Wrap::NoWrap,
            overflow: Overflow::Visible,
            display: Display::Flex,
            flex: None,
            flex_grow: None,
            flex_shrink: None,
            flex_basis: StyleValue::Auto,
            margin: Edges::default(),
            position: Edges::default(),
            padding: Edges::default(),
            border: Edges::default(),
            dimensions: [StyleValue::Auto; 2],
            min_dimensions: [StyleValue::Undefined; 2],
            max_dimensions: [StyleValue::Undefined; 2],
            aspect_ratio: None,
        }
    }
}

impl Style {
    /// Default style, switched to row flow and stretched lines under web defaults.
    pub fn with_web_defaults(use_web_defaults: bool) -> Self {
        let mut style = Self::default();
        if use_web_defaults {
            style.flex_direction = FlexDirection::Row;
            style.align_content = Align::Stretch;
        }
        style
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    pub const fn flex_direction(&self) -> FlexDirection {
        self.flex_direction
    }

    pub const fn justify_content(&self) -> Justify {
        self.justify_content
    }

    pub const fn align_content(&self) -> Align {
        self.align_content
    }

    pub const fn align_items(&self) -> Align {
        self.align_items
    }

    pub const fn align_self(&self) -> Align {
        self.align_self
    }

    pub const fn position_type(&self) -> PositionType {
        self.position_type
    }

    pub const fn flex_wrap(&self) -> Wrap {
        self.flex_wrap
    }

    pub const fn overflow(&self) -> Overflow {
        self.overflow
    }

    pub const fn display(&self) -> Display {
        self.display
    }

    /// The `flex` shorthand, if set.
    pub const fn flex(&self) -> Option<f32> {
        self.flex
    }

    pub const fn flex_grow(&self) -> Option<f32> {
        self.flex_grow
    }

    pub const fn flex_shrink(&self) -> Option<f32> {
        self.flex_shrink
    }

    pub const fn flex_basis(&self) -> StyleValue {
        self.flex_basis
    }

    pub fn margin(&self, edge: Edge) -> StyleValue {
        self.margin[edge]
    }

    pub fn position(&self, edge: Edge) -> StyleValue {
        self.position[edge]
    }

    pub fn padding(&self, edge: Edge) -> StyleValue {
        self.padding[edge]
    }

    pub fn border(&self, edge: Edge) -> StyleValue {
        self.border[edge]
    }

    pub const fn width(&self) -> StyleValue {
        self.dimensions[Dimension::Width.index()]
    }

    pub const fn height(&self) -> StyleValue {
        self.dimensions[Dimension::Height.index()]
    }

    pub const fn min_width(&self) -> StyleValue {
        self.min_dimensions[Dimension::Width.index()]
    }

    pub const fn min_height(&self) -> StyleValue {
        self.min_dimensions[Dimension::Height.index()]
    }

    pub const fn max_width(&self) -> StyleValue {
        self.max_dimensions[Dimension::Width.index()]
    }

    pub const fn max_height(&self) -> StyleValue {
        self.max_dimensions[Dimension::Height.index()]
    }

    /// Width divided by height, if set.
    pub const fn aspect_ratio(&self) -> Option<f32> {
        self.aspect_ratio
    }

    pub(crate) const fn dimension(&self, dimension: Dimension) -> StyleValue {
        self.dimensions[dimension.index()]
    }

    pub(crate) const fn min_dimension(&self, dimension: Dimension) -> StyleValue {
        self.min_dimensions[dimension.index()]
    }

    pub(crate) const fn max_dimension(&self, dimension: Dimension) -> StyleValue {
        self.max_dimensions[dimension.index()]
    }
}
