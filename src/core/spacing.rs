use serde::{Deserialize, Serialize};

/// Mantissas of the admissible tick spacings, ascending within one decade.
pub const SPACING_MANTISSAS: [f64; 4] = [1.0, 2.0, 2.5, 5.0];

/// Absolute tolerance, in tick-index units, for snapping to the nearest integer.
pub const INDEX_TOLERANCE: f64 = 1e-9;

/// Relative slack when matching a length against the ladder.
const LENGTH_TOLERANCE: f64 = 1e-9;

const LADDER_MIN_INDEX: i32 = -4 * 330;
const LADDER_MAX_INDEX: i32 = 4 * 310;

/// Tick spacing of the form `c * 10^k` with `c` in [`SPACING_MANTISSAS`].
///
/// Spacings are stored as a single ladder index `i`: `c = SPACING_MANTISSAS[i mod 4]`
/// and `k = i div 4`, so stepping the index walks the ladder
/// `..., 1, 2, 2.5, 5, 10, 20, 25, 50, ...` in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TickSpacing {
    index: i32,
}

impl TickSpacing {
    #[must_use]
    pub fn from_index(index: i32) -> Self {
        Self { index }
    }

    #[must_use]
    pub fn index(self) -> i32 {
        self.index
    }

    #[must_use]
    pub fn mantissa(self) -> f64 {
        SPACING_MANTISSAS[self.index.rem_euclid(4) as usize]
    }

    #[must_use]
    pub fn exponent(self) -> i32 {
        self.index.div_euclid(4)
    }

    /// Spacing in data units.
    #[must_use]
    pub fn value(self) -> f64 {
        let exponent = self.exponent();
        // Dividing by an exact power of ten keeps values like 0.25 and 0.002 as
        // close to their decimal form as f64 allows.
        if exponent >= 0 {
            self.mantissa() * 10f64.powi(exponent)
        } else {
            self.mantissa() / 10f64.powi(-exponent)
        }
    }

    #[must_use]
    pub fn finer(self) -> Self {
        Self::from_index(self.index - 1)
    }

    #[must_use]
    pub fn coarser(self) -> Self {
        Self::from_index(self.index + 1)
    }

    /// Smallest admissible spacing that is `>= length`.
    ///
    /// Returns `None` for non-finite or non-positive lengths and for lengths
    /// outside the range representable by the ladder.
    #[must_use]
    pub fn at_least(length: f64) -> Option<Self> {
        if !length.is_finite() || length <= 0.0 {
            return None;
        }

        let decade = length.log10().floor() as i32;
        let start = (decade - 1).saturating_mul(4).max(LADDER_MIN_INDEX);
        let threshold = length * (1.0 - LENGTH_TOLERANCE);
        (start..=(start + 12).min(LADDER_MAX_INDEX))
            .map(Self::from_index)
            .find(|spacing| spacing.value() >= threshold)
    }

    /// Recognizes an admissible spacing value, tolerating floating-point noise.
    #[must_use]
    pub fn from_value(value: f64) -> Option<Self> {
        let candidate = Self::at_least(value * (1.0 - 1e-6))?;
        let relative_error = (candidate.value() - value).abs() / value;
        (relative_error <= 1e-6).then_some(candidate)
    }
}

/// Descending iterator over admissible spacings.
#[derive(Debug, Clone)]
pub struct SpacingLadder {
    next: Option<TickSpacing>,
}

impl SpacingLadder {
    #[must_use]
    pub fn descending_from(start: TickSpacing) -> Self {
        Self { next: Some(start) }
    }

    /// Ladder starting at the coarsest spacing worth trying for `length`:
    /// the smallest spacing not shorter than the whole range.
    #[must_use]
    pub fn covering(length: f64) -> Option<Self> {
        TickSpacing::at_least(length).map(Self::descending_from)
    }
}

impl Iterator for SpacingLadder {
    type Item = TickSpacing;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if current.index() <= LADDER_MIN_INDEX || !current.value().is_normal() {
            self.next = None;
            return None;
        }
        self.next = Some(current.finer());
        Some(current)
    }
}

/// Snaps `quotient` to the nearest integer when it lies within rounding noise.
///
/// The tolerance is in tick-index units: a fixed floor plus a few ulps of the
/// quotient, so large indices never absorb a visible fraction of a tick.
fn snaps_to_integer(quotient: f64) -> Option<f64> {
    let rounded = quotient.round();
    let tolerance = INDEX_TOLERANCE.max(4.0 * f64::EPSILON * quotient.abs());
    ((quotient - rounded).abs() <= tolerance).then_some(rounded)
}

/// `ceil`, except that values within tolerance of an integer snap to it.
#[must_use]
pub fn tolerant_ceil(quotient: f64) -> f64 {
    snaps_to_integer(quotient).unwrap_or_else(|| quotient.ceil())
}

/// `floor`, except that values within tolerance of an integer snap to it.
#[must_use]
pub fn tolerant_floor(quotient: f64) -> f64 {
    snaps_to_integer(quotient).unwrap_or_else(|| quotient.floor())
}

/// First and last tick multiples of `spacing` inside `[start, end]`.
#[must_use]
pub fn tick_index_bounds(start: f64, end: f64, spacing: f64) -> (f64, f64) {
    (tolerant_ceil(start / spacing), tolerant_floor(end / spacing))
}

#[must_use]
pub fn visible_tick_count(start: f64, end: f64, spacing: f64) -> u64 {
    let (first, last) = tick_index_bounds(start, end, spacing);
    if !first.is_finite() || !last.is_finite() || last < first {
        return 0;
    }
    (last - first) as u64 + 1
}

/// Largest multiple of `spacing` not above `value`, never exceeding `value`.
#[must_use]
pub fn align_down(value: f64, spacing: f64) -> f64 {
    ((value / spacing).floor() * spacing).min(value)
}

/// Smallest multiple of `spacing` not below `value`, never falling short of `value`.
#[must_use]
pub fn align_up(value: f64, spacing: f64) -> f64 {
    ((value / spacing).ceil() * spacing).max(value)
}
