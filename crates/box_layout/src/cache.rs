//! Per-node memo of earlier measurements.
//!
//! Each node keeps one slot for its last full layout and a small ring of
//! measurement-only results. Nodes with a measure callback may also reuse an
//! entry taken under different but compatible constraints, since calling the
//! host is the most expensive step of a pass.

use core::iter;

use log::trace;

use crate::enums::MeasureMode;
use crate::rounding::round_value_to_pixel_grid;
use crate::value::{floats_equal, is_undefined};

/// Measurement-only results kept per node before the ring wraps around.
pub const MAX_CACHED_MEASUREMENTS: usize = 16;

/// Available space and modes a node was (or is about to be) sized under.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CacheQuery {
    pub width: f32,
    pub width_mode: MeasureMode,
    pub height: f32,
    pub height_mode: MeasureMode,
}

/// A stored query together with the size it produced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CachedMeasurement {
    pub available_width: f32,
    pub available_height: f32,
    /// `None` marks an empty slot.
    pub width_mode: Option<MeasureMode>,
    pub height_mode: Option<MeasureMode>,
    pub computed_width: f32,
    pub computed_height: f32,
}

impl Default for CachedMeasurement {
    fn default() -> Self {
        Self {
            available_width: -1.0,
            available_height: -1.0,
            width_mode: None,
            height_mode: None,
            computed_width: -1.0,
            computed_height: -1.0,
        }
    }
}

impl CachedMeasurement {
    fn new(query: CacheQuery, computed_width: f32, computed_height: f32) -> Self {
        Self {
            available_width: query.width,
            available_height: query.height,
            width_mode: Some(query.width_mode),
            height_mode: Some(query.height_mode),
            computed_width,
            computed_height,
        }
    }

    /// Same modes and the same available sizes.
    fn matches_exactly(&self, query: CacheQuery) -> bool {
        self.width_mode == Some(query.width_mode)
            && self.height_mode == Some(query.height_mode)
            && floats_equal(self.available_width, query.width)
            && floats_equal(self.available_height, query.height)
    }
}

/// An exact request equal to the size measured last time.
fn size_is_exact_and_matches_old(mode: MeasureMode, size: f32, last_computed: f32) -> bool {
    mode == MeasureMode::Exactly && floats_equal(size, last_computed)
}

/// An at-most request that the previous unconstrained measurement already fits in.
fn old_size_is_unspecified_and_still_fits(
    mode: MeasureMode,
    size: f32,
    last_mode: Option<MeasureMode>,
    last_computed: f32,
) -> bool {
    mode == MeasureMode::AtMost
        && last_mode == Some(MeasureMode::Undefined)
        && (size >= last_computed || floats_equal(size, last_computed))
}

/// A tighter at-most request that the previous result still satisfies.
fn new_size_is_stricter_and_still_valid(
    mode: MeasureMode,
    size: f32,
    last_mode: Option<MeasureMode>,
    last_size: f32,
    last_computed: f32,
) -> bool {
    last_mode == Some(MeasureMode::AtMost)
        && mode == MeasureMode::AtMost
        && !is_undefined(last_size)
        && !is_undefined(size)
        && !is_undefined(last_computed)
        && last_size > size
        && (last_computed <= size || floats_equal(size, last_computed))
}

fn axis_is_compatible(
    mode: MeasureMode,
    size: f32,
    last_mode: Option<MeasureMode>,
    last_size: f32,
    last_computed: f32,
    margin: f32,
    point_scale_factor: f32,
) -> bool {
    let (effective, effective_last) = if point_scale_factor == 0.0 {
        (size, last_size)
    } else {
        (
            round_value_to_pixel_grid(size, point_scale_factor, false, false),
            round_value_to_pixel_grid(last_size, point_scale_factor, false, false),
        )
    };
    let same_constraint = last_mode == Some(mode) && floats_equal(effective_last, effective);
    same_constraint
        || size_is_exact_and_matches_old(mode, size - margin, last_computed)
        || old_size_is_unspecified_and_still_fits(mode, size - margin, last_mode, last_computed)
        || new_size_is_stricter_and_still_valid(mode, size - margin, last_mode, last_size, last_computed)
}

/// Whether `cached` can answer `query` for a node with the given margins.
///
/// Sizes in the query include margins, stored computed sizes do not. When
/// `point_scale_factor` is non-zero, available sizes are compared after
/// pixel-grid rounding.
pub fn can_use_cached_measurement(
    query: CacheQuery,
    cached: &CachedMeasurement,
    margin_row: f32,
    margin_column: f32,
    point_scale_factor: f32,
) -> bool {
    if (!is_undefined(cached.computed_height) && cached.computed_height < 0.0)
        || (!is_undefined(cached.computed_width) && cached.computed_width < 0.0)
    {
        return false;
    }
    let width_ok = axis_is_compatible(
        query.width_mode,
        query.width,
        cached.width_mode,
        cached.available_width,
        cached.computed_width,
        margin_row,
        point_scale_factor,
    );
    width_ok
        && axis_is_compatible(
            query.height_mode,
            query.height,
            cached.height_mode,
            cached.available_height,
            cached.computed_height,
            margin_column,
            point_scale_factor,
        )
}

/// Layout slot plus measurement ring of a single node.
#[derive(Clone, Debug, Default)]
pub(crate) struct MeasurementCache {
    layout: CachedMeasurement,
    measurements: [CachedMeasurement; MAX_CACHED_MEASUREMENTS],
    next_index: usize,
}

impl MeasurementCache {
    pub(crate) fn clear(&mut self) {
        self.layout = CachedMeasurement::default();
        self.next_index = 0;
    }

    /// Lookup for nodes measured by the host, using the compatibility rules.
    pub(crate) fn find_compatible(
        &self,
        query: CacheQuery,
        margin_row: f32,
        margin_column: f32,
        point_scale_factor: f32,
    ) -> Option<CachedMeasurement> {
        let usable = |entry: &&CachedMeasurement| {
            can_use_cached_measurement(query, entry, margin_row, margin_column, point_scale_factor)
        };
        iter::once(&self.layout)
            .find(usable)
            .or_else(|| self.measurements.iter().take(self.next_index).find(usable))
            .copied()
    }

    /// Lookup for containers, which only reuse identical requests.
    pub(crate) fn find_exact(&self, query: CacheQuery, perform_layout: bool) -> Option<CachedMeasurement> {
        if perform_layout {
            return self.layout.matches_exactly(query).then_some(self.layout);
        }
        self.measurements
            .iter()
            .take(self.next_index)
            .find(|entry| entry.matches_exactly(query))
            .copied()
    }

    pub(crate) fn store(
        &mut self,
        query: CacheQuery,
        perform_layout: bool,
        computed_width: f32,
        computed_height: f32,
    ) {
        if self.next_index == MAX_CACHED_MEASUREMENTS {
            trace!(target: "box_layout::cache", "[CACHE] out of cache entries, wrapping");
            self.next_index = 0;
        }
        let entry = CachedMeasurement::new(query, computed_width, computed_height);
        if perform_layout {
            self.layout = entry;
        } else if let Some(slot) = self.measurements.get_mut(self.next_index) {
            *slot = entry;
            self.next_index += 1;
        }
    }

    #[cfg(test)]
    pub(crate) const fn measurement_count(&self) -> usize {
        self.next_index
    }
}
