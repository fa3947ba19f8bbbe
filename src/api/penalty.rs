use serde::{Deserialize, Serialize};

use crate::core::scale::validate_extent;
use crate::core::spacing::{tolerant_ceil, tolerant_floor};
use crate::core::types::tick_values;
use crate::core::{AxisOrientation, DataRange, LinearScale};
use crate::error::{TickError, TickResult};

use super::{LabelMetrics, TickPlacementConfig};

/// The four penalty terms of one axis candidate and their weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyVector {
    /// `p0`: label overlap, `0` or `1 + overlap_fraction`.
    pub overlap: f64,
    /// `p1`: `|ln(device_spacing / opt_spacing)|`.
    pub spacing: f64,
    /// `p2`: squared distance of both axis ends from the nearest inner tick.
    pub alignment: f64,
    /// `p3`: `log2(axis_length / data_span)`.
    pub area: f64,
    pub total: f64,
}

impl PenaltyVector {
    #[must_use]
    pub fn components(self) -> [f64; 4] {
        [self.overlap, self.spacing, self.alignment, self.area]
    }
}

/// One axis as seen by the evaluator: data range, device length, orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFrame {
    pub data: DataRange,
    pub extent: f64,
    pub orientation: AxisOrientation,
}

impl AxisFrame {
    #[must_use]
    pub fn new(data: DataRange, extent: f64, orientation: AxisOrientation) -> Self {
        Self {
            data,
            extent,
            orientation,
        }
    }
}

/// Scores axis candidates. Holds no state besides borrowed configuration.
pub struct PenaltyEvaluator<'a, M: LabelMetrics> {
    config: &'a TickPlacementConfig,
    metrics: &'a M,
}

// Manual impls: copying the evaluator only copies references, whatever `M` is.
impl<M: LabelMetrics> Clone for PenaltyEvaluator<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: LabelMetrics> Copy for PenaltyEvaluator<'_, M> {}

impl<'a, M: LabelMetrics> PenaltyEvaluator<'a, M> {
    #[must_use]
    pub fn new(config: &'a TickPlacementConfig, metrics: &'a M) -> Self {
        Self { config, metrics }
    }

    #[must_use]
    pub fn config(&self) -> &'a TickPlacementConfig {
        self.config
    }

    /// Penalty of drawing `frame` over `[start, end]` with ticks every `spacing`.
    pub fn evaluate(
        &self,
        frame: &AxisFrame,
        start: f64,
        end: f64,
        spacing: f64,
    ) -> TickResult<PenaltyVector> {
        validate_extent(frame.extent)?;
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(TickError::InvalidGeometry(format!(
                "tick spacing must be finite and > 0, got {spacing}"
            )));
        }
        let scale = LinearScale::new(start, end)?;
        if !frame.data.is_contained_in(start, end) {
            return Err(TickError::InvalidGeometry(format!(
                "axis range [{start}, {end}] does not contain data range [{}, {}]",
                frame.data.lo(),
                frame.data.hi()
            )));
        }

        let device_per_data = scale.device_per_data(frame.extent)?;
        let device_spacing = spacing * device_per_data;

        let overlap = self.overlap_penalty(frame.orientation, start, end, spacing, device_spacing);

        let opt_spacing = self.config.effective_opt_spacing(frame.extent);
        let spacing_term = (device_spacing / opt_spacing).ln().abs();

        let q_start = start / spacing;
        let q_end = end / spacing;
        let alignment =
            (tolerant_ceil(q_start) - q_start).powi(2) + (q_end - tolerant_floor(q_end)).powi(2);

        let area = ((end - start) / frame.data.span()).log2().max(0.0);

        let components = [overlap, spacing_term, alignment, area];
        Ok(PenaltyVector {
            overlap,
            spacing: spacing_term,
            alignment,
            area,
            total: self.config.weights.combine(components),
        })
    }

    fn overlap_penalty(
        &self,
        orientation: AxisOrientation,
        start: f64,
        end: f64,
        spacing: f64,
        device_spacing: f64,
    ) -> f64 {
        let ticks = tick_values(start, end, spacing);
        if ticks.len() < 2 {
            return 0.0;
        }

        let separation = self.config.label_separation(orientation);
        let extents: Vec<f64> = ticks
            .iter()
            .map(|&value| {
                let text = self.config.label_format.format(value, spacing);
                self.metrics.label_extent(&text, orientation)
            })
            .collect();
        let required: f64 = extents
            .windows(2)
            .map(|pair| 0.5 * (pair[0] + pair[1]) + separation)
            .sum();
        let available = (ticks.len() - 1) as f64 * device_spacing;

        if required <= available {
            0.0
        } else {
            1.0 + ((required - available) / available).max(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisFrame, PenaltyEvaluator};
    use crate::api::{EstimatedLabelMetrics, LabelMetrics, PenaltyWeights, TickPlacementConfig};
    use crate::core::{AxisOrientation, DataRange};
    use crate::error::TickError;

    /// Every label is exactly `width` wide and `height` tall.
    struct FixedMetrics {
        width: f64,
        height: f64,
    }

    impl LabelMetrics for FixedMetrics {
        fn label_width(&self, _text: &str) -> f64 {
            self.width
        }

        fn line_height(&self) -> f64 {
            self.height
        }
    }

    fn frame(lo: f64, hi: f64, extent: f64) -> AxisFrame {
        AxisFrame::new(
            DataRange::new(lo, hi).expect("range"),
            extent,
            AxisOrientation::Horizontal,
        )
    }

    #[test]
    fn tick_aligned_range_has_zero_alignment_penalty() {
        let config = TickPlacementConfig::new().with_opt_spacing(50.0);
        let metrics = EstimatedLabelMetrics::default();
        let evaluator = PenaltyEvaluator::new(&config, &metrics);

        let penalty = evaluator
            .evaluate(&frame(0.0, 10.0, 400.0), 0.0, 10.0, 5.0)
            .expect("penalty");
        assert_eq!(penalty.alignment, 0.0);
        assert_eq!(penalty.area, 0.0);
    }

    #[test]
    fn unaligned_ends_add_squared_fractions() {
        let config = TickPlacementConfig::new();
        let metrics = EstimatedLabelMetrics::default();
        let evaluator = PenaltyEvaluator::new(&config, &metrics);

        let penalty = evaluator
            .evaluate(&frame(0.5, 9.0, 400.0), 0.5, 9.0, 2.0)
            .expect("penalty");
        // ceil(0.25) - 0.25 = 0.75, 4.5 - floor(4.5) = 0.5
        assert!((penalty.alignment - (0.75f64.powi(2) + 0.5f64.powi(2))).abs() < 1e-12);
    }

    #[test]
    fn alignment_penalty_is_exact_far_from_zero() {
        let config = TickPlacementConfig::new();
        let metrics = EstimatedLabelMetrics::default();
        let evaluator = PenaltyEvaluator::new(&config, &metrics);
        let (lo, hi) = (1e9 + 0.3, 1e9 + 2.7);

        let penalty = evaluator
            .evaluate(&frame(lo, hi, 400.0), lo, hi, 2.5)
            .expect("penalty");
        // ceil(4e8 + 0.12) - (4e8 + 0.12) = 0.88, (4e8 + 1.08) - floor(..) = 0.08
        assert!((penalty.alignment - (0.88f64.powi(2) + 0.08f64.powi(2))).abs() < 1e-6);
    }

    #[test]
    fn spacing_penalty_is_zero_at_optimal_device_spacing() {
        let config = TickPlacementConfig::new().with_opt_spacing(40.0);
        let metrics = EstimatedLabelMetrics::default();
        let evaluator = PenaltyEvaluator::new(&config, &metrics);

        let penalty = evaluator
            .evaluate(&frame(0.0, 10.0, 400.0), 0.0, 10.0, 1.0)
            .expect("penalty");
        assert!(penalty.spacing.abs() < 1e-12);

        let coarse = evaluator
            .evaluate(&frame(0.0, 10.0, 400.0), 0.0, 10.0, 2.5)
            .expect("penalty");
        assert!((coarse.spacing - 2.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn area_penalty_counts_doublings_of_the_data_span() {
        let config = TickPlacementConfig::new();
        let metrics = EstimatedLabelMetrics::default();
        let evaluator = PenaltyEvaluator::new(&config, &metrics);

        let penalty = evaluator
            .evaluate(&frame(0.0, 1.0, 300.0), 0.0, 2.0, 1.0)
            .expect("penalty");
        assert!((penalty.area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn overlap_penalty_measures_shortfall_against_available_space() {
        let config = TickPlacementConfig::new().with_label_separation(0.0, 0.0);
        let metrics = FixedMetrics {
            width: 20.0,
            height: 5.0,
        };
        let evaluator = PenaltyEvaluator::new(&config, &metrics);

        // Ticks 0 and 1 are 100 device units apart: plenty of room.
        let roomy = evaluator
            .evaluate(&frame(0.0, 1.0, 100.0), 0.0, 1.0, 1.0)
            .expect("penalty");
        assert_eq!(roomy.overlap, 0.0);

        // Eleven ticks 10 units apart need 20 units each: overlap fraction 1.
        let crowded = evaluator
            .evaluate(&frame(0.0, 1.0, 100.0), 0.0, 1.0, 0.1)
            .expect("penalty");
        assert!((crowded.overlap - 2.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_axis_overlap_uses_line_height() {
        let config = TickPlacementConfig::new().with_label_separation(0.0, 0.0);
        let metrics = FixedMetrics {
            width: 1000.0,
            height: 5.0,
        };
        let evaluator = PenaltyEvaluator::new(&config, &metrics);
        let vertical = AxisFrame::new(
            DataRange::new(0.0, 1.0).expect("range"),
            100.0,
            AxisOrientation::Vertical,
        );

        let penalty = evaluator
            .evaluate(&vertical, 0.0, 1.0, 0.1)
            .expect("penalty");
        assert_eq!(penalty.overlap, 0.0);
    }

    #[test]
    fn separation_counts_towards_required_space() {
        let config = TickPlacementConfig::new().with_label_separation(10.0, 0.0);
        let metrics = FixedMetrics {
            width: 10.0,
            height: 5.0,
        };
        let evaluator = PenaltyEvaluator::new(&config, &metrics);

        // Ticks 10 units apart, labels need 10 + 10.
        let penalty = evaluator
            .evaluate(&frame(0.0, 1.0, 100.0), 0.0, 1.0, 0.1)
            .expect("penalty");
        assert!((penalty.overlap - 2.0).abs() < 1e-9);
    }

    #[test]
    fn total_is_weighted_sum_of_components() {
        let config = TickPlacementConfig::new()
            .with_weights(PenaltyWeights::new(3.0, 0.5, 2.0, 4.0))
            .with_opt_spacing(30.0);
        let metrics = EstimatedLabelMetrics::default();
        let evaluator = PenaltyEvaluator::new(&config, &metrics);

        let penalty = evaluator
            .evaluate(&frame(0.3, 9.1, 250.0), 0.0, 10.0, 2.0)
            .expect("penalty");
        let expected = 3.0 * penalty.overlap
            + 0.5 * penalty.spacing
            + 2.0 * penalty.alignment
            + 4.0 * penalty.area;
        assert!((penalty.total - expected).abs() < 1e-12);
        assert!(penalty.components().iter().all(|term| *term >= 0.0));
    }

    #[test]
    fn invalid_inputs_are_rejected_as_geometry_errors() {
        let config = TickPlacementConfig::new();
        let metrics = EstimatedLabelMetrics::default();
        let evaluator = PenaltyEvaluator::new(&config, &metrics);

        let cases = [
            (frame(0.0, 10.0, 0.0), 0.0, 10.0, 1.0),
            (frame(0.0, 10.0, 400.0), 0.0, 10.0, 0.0),
            (frame(0.0, 10.0, 400.0), 10.0, 0.0, 1.0),
            (frame(0.0, 10.0, 400.0), 1.0, 10.0, 1.0),
        ];
        for (axis, start, end, spacing) in cases {
            let result = evaluator.evaluate(&axis, start, end, spacing);
            assert!(matches!(result, Err(TickError::InvalidGeometry(_))));
        }
    }
}
