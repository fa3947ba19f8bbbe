use serde::{Deserialize, Serialize};

use crate::core::AxisOrientation;
use crate::error::{TickError, TickResult};

use super::label_format::LabelFormat;
use super::validation::validate_tick_placement_config;

/// Consecutive non-improving spacings after which a search stops.
///
/// This is an early exit, not an optimality proof: finer spacings are assumed
/// to keep getting worse once two in a row failed to improve.
pub const DEFAULT_STALL_LIMIT: u32 = 2;

/// Upper bound on spacings tried by any single search loop.
pub const DEFAULT_MAX_ITERATIONS: u32 = 96;

/// 2cm expressed in points.
pub const DEFAULT_OPT_SPACING: f64 = 56.692_913_385_826_77;

/// Relative strength of the four penalty terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    /// Label-overlap avoidance (`p0`).
    pub overlap: f64,
    /// Device-spacing accuracy (`p1`).
    pub spacing: f64,
    /// Alignment of the axis ends with ticks (`p2`).
    pub alignment: f64,
    /// Area utilization (`p3`).
    pub area: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

impl PenaltyWeights {
    #[must_use]
    pub fn new(overlap: f64, spacing: f64, alignment: f64, area: f64) -> Self {
        Self {
            overlap,
            spacing,
            alignment,
            area,
        }
    }

    #[must_use]
    pub fn as_array(self) -> [f64; 4] {
        [self.overlap, self.spacing, self.alignment, self.area]
    }

    #[must_use]
    pub fn combine(self, components: [f64; 4]) -> f64 {
        self.as_array()
            .iter()
            .zip(components)
            .map(|(weight, component)| weight * component)
            .sum()
    }
}

/// Immutable configuration passed into every tick search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickPlacementConfig {
    pub weights: PenaltyWeights,
    /// Target on-device distance between adjacent ticks.
    pub opt_spacing: f64,
    /// Use `min(extent / 2, opt_spacing)` so short axes still get two ticks.
    pub clamp_opt_spacing_to_half_extent: bool,
    /// Minimum gap between neighbouring x-axis labels, in device units.
    pub horizontal_label_separation: f64,
    /// Minimum gap between neighbouring y-axis labels, in device units.
    pub vertical_label_separation: f64,
    /// Font size for the built-in label width estimate.
    pub label_font_size: f64,
    pub label_format: LabelFormat,
    pub stall_limit: u32,
    pub max_iterations: u32,
}

impl Default for TickPlacementConfig {
    fn default() -> Self {
        Self {
            weights: PenaltyWeights::default(),
            opt_spacing: DEFAULT_OPT_SPACING,
            clamp_opt_spacing_to_half_extent: true,
            horizontal_label_separation: 8.0,
            vertical_label_separation: 0.0,
            label_font_size: 10.0,
            label_format: LabelFormat::default(),
            stall_limit: DEFAULT_STALL_LIMIT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl TickPlacementConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_opt_spacing(mut self, opt_spacing: f64) -> Self {
        self.opt_spacing = opt_spacing;
        self
    }

    #[must_use]
    pub fn with_opt_spacing_clamp(mut self, enabled: bool) -> Self {
        self.clamp_opt_spacing_to_half_extent = enabled;
        self
    }

    #[must_use]
    pub fn with_label_separation(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_label_separation = horizontal;
        self.vertical_label_separation = vertical;
        self
    }

    #[must_use]
    pub fn with_label_font_size(mut self, font_size: f64) -> Self {
        self.label_font_size = font_size;
        self
    }

    #[must_use]
    pub fn with_label_format(mut self, label_format: LabelFormat) -> Self {
        self.label_format = label_format;
        self
    }

    #[must_use]
    pub fn with_stall_limit(mut self, stall_limit: u32) -> Self {
        self.stall_limit = stall_limit;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn label_separation(&self, orientation: AxisOrientation) -> f64 {
        match orientation {
            AxisOrientation::Horizontal => self.horizontal_label_separation,
            AxisOrientation::Vertical => self.vertical_label_separation,
        }
    }

    /// Optimal device spacing used for an axis of length `extent`.
    #[must_use]
    pub fn effective_opt_spacing(&self, extent: f64) -> f64 {
        if self.clamp_opt_spacing_to_half_extent {
            self.opt_spacing.min(0.5 * extent)
        } else {
            self.opt_spacing
        }
    }

    pub fn validate(self) -> TickResult<Self> {
        validate_tick_placement_config(self)
    }

    /// Parses and validates a JSON config; missing fields take defaults.
    pub fn from_json_str(input: &str) -> TickResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|err| TickError::InvalidConfig(format!("failed to parse config: {err}")))?;
        config.validate()
    }

    pub fn to_json_pretty(&self) -> TickResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| TickError::InvalidConfig(format!("failed to serialize config: {err}")))
    }
}
