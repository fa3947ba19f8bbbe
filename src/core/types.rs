use serde::{Deserialize, Serialize};

use crate::core::spacing::{TickSpacing, tick_index_bounds, visible_tick_count};
use crate::error::{TickError, TickResult};

/// Relative tolerance for range containment checks.
pub const CONTAINMENT_TOLERANCE: f64 = 1e-9;

/// Closed data interval `[lo, hi]` with `lo < hi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataRange {
    lo: f64,
    hi: f64,
}

impl DataRange {
    pub fn new(lo: f64, hi: f64) -> TickResult<Self> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(TickError::InvalidData("data range bounds must be finite".to_owned()));
        }
        if lo >= hi {
            return Err(TickError::InvalidData(format!(
                "data range lower bound {lo} must be below upper bound {hi}"
            )));
        }

        Ok(Self { lo, hi })
    }

    /// Builds a range from user limits, widening a degenerate pair.
    ///
    /// `(0, 0)` becomes `(-1, 1)`; any other `(a, a)` is stretched to include
    /// zero. Inverted or non-finite limits are rejected.
    pub fn from_limits(a: f64, b: f64) -> TickResult<Self> {
        if !a.is_finite() || !b.is_finite() {
            return Err(TickError::InvalidData("axis limits must be finite".to_owned()));
        }
        if b < a {
            return Err(TickError::InvalidData(format!(
                "lower bound {a} must not be larger than upper bound {b}"
            )));
        }

        if a != b {
            return Self::new(a, b);
        }
        if a == 0.0 {
            return Self::new(-1.0, 1.0);
        }
        Self::new(a.min(0.0), a.max(0.0))
    }

    #[must_use]
    pub fn lo(self) -> f64 {
        self.lo
    }

    #[must_use]
    pub fn hi(self) -> f64 {
        self.hi
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.hi - self.lo
    }

    #[must_use]
    pub fn midpoint(self) -> f64 {
        0.5 * (self.lo + self.hi)
    }

    /// Whether `[start, end]` contains this range, up to a relative tolerance.
    #[must_use]
    pub fn is_contained_in(self, start: f64, end: f64) -> bool {
        let slack = CONTAINMENT_TOLERANCE * self.span().max(end - start);
        start <= self.lo + slack && end >= self.hi - slack
    }

    /// Symmetric widening about the midpoint to at least `min_span`.
    #[must_use]
    pub fn widened_to(self, min_span: f64) -> Self {
        if min_span.is_nan() || min_span <= self.span() {
            return self;
        }
        let half = 0.5 * min_span;
        let mid = self.midpoint();
        Self {
            lo: (mid - half).min(self.lo),
            hi: (mid + half).max(self.hi),
        }
    }
}

/// Device-space size of the axis box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn validate(self) -> TickResult<Self> {
        if !self.is_valid() {
            return Err(TickError::InvalidGeometry(format!(
                "axis box must be finite and > 0: width={}, height={}",
                self.width, self.height
            )));
        }
        Ok(self)
    }

    /// Axis length in device units for the given orientation.
    #[must_use]
    pub fn extent(self, orientation: AxisOrientation) -> f64 {
        match orientation {
            AxisOrientation::Horizontal => self.width,
            AxisOrientation::Vertical => self.height,
        }
    }
}

/// Fixed ratio between horizontal and vertical data-to-device scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub fn new(value: f64) -> TickResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(TickError::InvalidAspect(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Vertical data length per unit of horizontal data length in `geometry`.
    #[must_use]
    pub fn vertical_per_horizontal(self, geometry: Geometry) -> f64 {
        geometry.height / (self.0 * geometry.width)
    }
}

/// Which axis of the box is being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisOrientation {
    /// x axis; labels are typeset parallel to the axis.
    Horizontal,
    /// y axis; labels are typeset perpendicular to the axis.
    Vertical,
}

/// Placed axis: extended range `[start, end]` plus tick spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSolution {
    start: f64,
    end: f64,
    spacing: TickSpacing,
}

impl AxisSolution {
    #[must_use]
    pub(crate) fn new(start: f64, end: f64, spacing: TickSpacing) -> Self {
        Self {
            start,
            end,
            spacing,
        }
    }

    #[must_use]
    pub fn start(self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn tick_spacing(self) -> TickSpacing {
        self.spacing
    }

    #[must_use]
    pub fn spacing(self) -> f64 {
        self.spacing.value()
    }

    #[must_use]
    pub fn tick_count(self) -> u64 {
        visible_tick_count(self.start, self.end, self.spacing())
    }

    /// Tick positions in data units, ascending.
    #[must_use]
    pub fn ticks(self) -> Vec<f64> {
        tick_values(self.start, self.end, self.spacing())
    }

    /// Maps a data value onto `[0, extent]` device units.
    #[must_use]
    pub fn device_position(self, value: f64, extent: f64) -> f64 {
        (value - self.start) / self.length() * extent
    }
}

pub(crate) fn tick_values(start: f64, end: f64, spacing: f64) -> Vec<f64> {
    let (first, last) = tick_index_bounds(start, end, spacing);
    if !first.is_finite() || !last.is_finite() || last < first {
        return Vec::new();
    }
    let count = (last - first) as usize + 1;
    (0..count)
        .map(|offset| (first + offset as f64) * spacing)
        .collect()
}
