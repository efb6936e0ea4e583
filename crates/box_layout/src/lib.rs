//! Retained-mode flexbox layout.
//!
//! A [`LayoutTree`] owns styled nodes. Hosts edit styles and structure through
//! the tree, call [`LayoutTree::calculate_layout`] on a root and read each
//! node's [`LayoutResults`]. Only the parts of the tree that changed since the
//! last pass are recomputed; everything else is answered from per-node caches.
//!
//! Sizes are in points. Unconstrained and unresolved values are represented by
//! [`UNDEFINED`] (NaN).

mod algorithm;
mod cache;
mod callbacks;
mod config;
mod enums;
mod layout;
mod node;
mod rounding;
mod style;
mod tree;
mod value;

pub use cache::{CacheQuery, CachedMeasurement, MAX_CACHED_MEASUREMENTS, can_use_cached_measurement};
pub use callbacks::{Baseline, Dirtied, Measure};
pub use config::{CloneNode, ConfigRef, Logger};
pub use enums::{
    Align, Dimension, Direction, Display, Edge, ExperimentalFeature, FlexDirection, Justify, LogLevel,
    MeasureMode, NodeType, Overflow, PositionType, Wrap,
};
pub use indextree::NodeId;
pub use layout::LayoutResults;
pub use rounding::round_value_to_pixel_grid;
pub use style::{Edges, Style};
pub use tree::LayoutTree;
pub use value::{Size, StyleValue, UNDEFINED, is_undefined};
