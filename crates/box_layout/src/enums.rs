//! Enumerations used by styles, layout results and the flex algorithm.

/// Inline base direction of a node.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Take the direction of the owner; roots fall back to left-to-right.
    #[default]
    Inherit,
    Ltr,
    Rtl,
}

/// Axis and orientation along which children flow.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum FlexDirection {
    #[default]
    Column,
    ColumnReverse,
    Row,
    RowReverse,
}

impl FlexDirection {
    /// True for `Row` and `RowReverse`.
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// True for `Column` and `ColumnReverse`.
    pub const fn is_column(self) -> bool {
        matches!(self, Self::Column | Self::ColumnReverse)
    }

    /// True when items are laid out from the trailing edge.
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }

    /// Flip row directions for right-to-left content.
    pub(crate) const fn resolve(self, direction: Direction) -> Self {
        if matches!(direction, Direction::Rtl) {
            return match self {
                Self::Row => Self::RowReverse,
                Self::RowReverse => Self::Row,
                other => other,
            };
        }
        self
    }

    /// The axis perpendicular to `self` in the given direction.
    pub(crate) const fn cross(self, direction: Direction) -> Self {
        if self.is_column() {
            Self::Row.resolve(direction)
        } else {
            Self::Column
        }
    }

    /// Edge items start from on this axis.
    pub(crate) const fn leading_edge(self) -> Edge {
        match self {
            Self::Column => Edge::Top,
            Self::ColumnReverse => Edge::Bottom,
            Self::Row => Edge::Left,
            Self::RowReverse => Edge::Right,
        }
    }

    /// Edge opposite to [`Self::leading_edge`].
    pub(crate) const fn trailing_edge(self) -> Edge {
        match self {
            Self::Column => Edge::Bottom,
            Self::ColumnReverse => Edge::Top,
            Self::Row => Edge::Right,
            Self::RowReverse => Edge::Left,
        }
    }

    /// Size dimension measured along this axis.
    pub(crate) const fn dimension(self) -> Dimension {
        if self.is_row() {
            Dimension::Width
        } else {
            Dimension::Height
        }
    }
}

/// Main-axis distribution of free space (`justify-content`).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Justify {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Cross-axis alignment used by `align-items`, `align-self` and `align-content`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Align {
    Auto,
    FlexStart,
    Center,
    FlexEnd,
    Stretch,
    Baseline,
    SpaceBetween,
    SpaceAround,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PositionType {
    #[default]
    Relative,
    Absolute,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Wrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Display {
    #[default]
    Flex,
    None,
}

/// Box edges, including the logical and shorthand ones accepted by style setters.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
    Start,
    End,
    Horizontal,
    Vertical,
    All,
}

impl Edge {
    /// Number of edges stored per style edge array.
    pub const COUNT: usize = 9;

    /// Every edge in storage order.
    pub const ALL_EDGES: [Self; Self::COUNT] = [
        Self::Left,
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Start,
        Self::End,
        Self::Horizontal,
        Self::Vertical,
        Self::All,
    ];

    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Shorthand edges have no layout value of their own.
    pub const fn is_shorthand(self) -> bool {
        matches!(self, Self::Horizontal | Self::Vertical | Self::All)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// How strictly an available size constrains a measurement.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum MeasureMode {
    /// No constraint; the size is unknown.
    #[default]
    Undefined,
    /// The result must be exactly the given size.
    Exactly,
    /// The result may be at most the given size.
    AtMost,
}

/// Tag distinguishing ordinary containers from leaves measured by the host.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum NodeType {
    #[default]
    Default,
    /// Measured leaf; its size is never rounded down.
    Text,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Verbose,
    Fatal,
}

impl LogLevel {
    /// Equivalent level of the `log` facade.
    pub(crate) const fn as_log_level(self) -> log::Level {
        match self {
            Self::Error | Self::Fatal => log::Level::Error,
            Self::Warn => log::Level::Warn,
            Self::Info => log::Level::Info,
            Self::Debug => log::Level::Debug,
            Self::Verbose => log::Level::Trace,
        }
    }
}

/// Opt-in behaviours that deviate from the stable algorithm.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExperimentalFeature {
    /// Recompute flex basis on every layout pass, as browsers do.
    WebFlexBasis,
}

impl ExperimentalFeature {
    pub const COUNT: usize = 1;

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}
