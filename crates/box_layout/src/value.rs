//! Style values and the undefined float sentinel.

/// Sentinel for "no value" in available sizes and computed geometry.
pub const UNDEFINED: f32 = f32::NAN;

/// Tolerance used when comparing layout floats.
const EPSILON: f32 = 0.0001;

/// Whether `value` is the [`UNDEFINED`] sentinel.
pub fn is_undefined(value: f32) -> bool {
    value.is_nan()
}

/// Two floats are equal within tolerance, or both undefined.
pub(crate) fn floats_equal(lhs: f32, rhs: f32) -> bool {
    if is_undefined(lhs) || is_undefined(rhs) {
        return is_undefined(lhs) && is_undefined(rhs);
    }
    (lhs - rhs).abs() < EPSILON
}

/// Max that prefers whichever side is defined.
pub(crate) fn float_max(lhs: f32, rhs: f32) -> f32 {
    if !is_undefined(lhs) && !is_undefined(rhs) {
        return lhs.max(rhs);
    }
    if is_undefined(lhs) { rhs } else { lhs }
}

/// Min that prefers whichever side is defined.
pub(crate) fn float_min(lhs: f32, rhs: f32) -> f32 {
    if !is_undefined(lhs) && !is_undefined(rhs) {
        return lhs.min(rhs);
    }
    if is_undefined(lhs) { rhs } else { lhs }
}

/// Bridge from resolved optional values back to sentinel floats.
pub(crate) trait OrUndefined {
    fn or_undefined(self) -> f32;
}

impl OrUndefined for Option<f32> {
    fn or_undefined(self) -> f32 {
        self.unwrap_or(UNDEFINED)
    }
}

/// A length as written in a style.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum StyleValue {
    /// Unset; the algorithm falls back to its default resolution.
    #[default]
    Undefined,
    Auto,
    Point(f32),
    /// Percentage of the owner's size along the relevant axis.
    Percent(f32),
}

impl StyleValue {
    /// Point value; NaN becomes [`StyleValue::Undefined`].
    pub fn point(value: f32) -> Self {
        if is_undefined(value) {
            Self::Undefined
        } else {
            Self::Point(value)
        }
    }

    /// Percent value; NaN becomes [`StyleValue::Undefined`].
    pub fn percent(value: f32) -> Self {
        if is_undefined(value) {
            Self::Undefined
        } else {
            Self::Percent(value)
        }
    }

    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolve against the owner size. Percentages of an undefined owner stay unresolved.
    pub fn resolve(self, owner_size: f32) -> Option<f32> {
        match self {
            Self::Point(points) => Some(points),
            Self::Percent(percent) if !is_undefined(owner_size) => Some(percent * owner_size * 0.01),
            Self::Percent(_) | Self::Auto | Self::Undefined => None,
        }
    }

    /// Resolution used for margins, where `auto` contributes nothing.
    pub(crate) fn resolve_margin(self, owner_size: f32) -> Option<f32> {
        if self.is_auto() {
            Some(0.0)
        } else {
            self.resolve(owner_size)
        }
    }

    /// Raw number carried by point and percent values.
    pub const fn number(self) -> Option<f32> {
        match self {
            Self::Point(number) | Self::Percent(number) => Some(number),
            Self::Auto | Self::Undefined => None,
        }
    }
}

/// Width and height pair returned by measure callbacks.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
