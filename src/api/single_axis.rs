use tracing::{debug, trace, warn};

use crate::core::scale::validate_extent;
use crate::core::spacing::visible_tick_count;
use crate::core::{AxisSolution, SpacingLadder};
use crate::error::{TickError, TickResult};

use super::penalty::{AxisFrame, PenaltyEvaluator, PenaltyVector};
use super::search_support::{ImprovementTrace, StallCounter, extension_candidates};
use super::{LabelMetrics, TickPlacementConfig};

/// Result of a single-axis search.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSearchOutcome {
    pub solution: AxisSolution,
    pub penalty: PenaltyVector,
    /// Number of spacings tried.
    pub iterations: u32,
    /// Every recorded best total, in recording order.
    pub improvements: ImprovementTrace,
}

/// Chooses spacing and extension for one axis on its own.
///
/// Spacings are tried coarse to fine, starting from the smallest spacing that
/// spans the whole data range. The search stops after
/// `config.stall_limit` consecutive spacings without improvement.
pub fn search_axis<M: LabelMetrics>(
    frame: &AxisFrame,
    config: &TickPlacementConfig,
    metrics: &M,
) -> TickResult<AxisSearchOutcome> {
    validate_extent(frame.extent)?;

    let evaluator = PenaltyEvaluator::new(config, metrics);
    let Some(ladder) = SpacingLadder::covering(frame.data.span()) else {
        return Err(TickError::NoFeasibleSolution { iterations: 0 });
    };

    let mut best: Option<(AxisSolution, PenaltyVector)> = None;
    let mut improvements = ImprovementTrace::new();
    let mut stall = StallCounter::new(config.stall_limit);
    let mut iterations = 0u32;

    for tick_spacing in ladder {
        if iterations >= config.max_iterations {
            warn!(
                iterations,
                orientation = ?frame.orientation,
                "single-axis search hit iteration bound"
            );
            return Err(TickError::NoFeasibleSolution { iterations });
        }
        iterations += 1;

        let spacing = tick_spacing.value();
        let mut improved = false;
        for (start, end) in extension_candidates(frame.data, spacing) {
            if visible_tick_count(start, end, spacing) < 2 {
                continue;
            }
            let penalty = evaluator.evaluate(frame, start, end, spacing)?;
            let is_better = best
                .as_ref()
                .is_none_or(|(_, current)| penalty.total < current.total);
            if is_better {
                trace!(spacing, start, end, total = penalty.total, "axis candidate improved");
                best = Some((AxisSolution::new(start, end, tick_spacing), penalty));
                improvements.push(penalty.total);
                improved = true;
            }
        }

        if stall.observe(improved, best.is_some()) {
            break;
        }
    }

    let Some((solution, penalty)) = best else {
        return Err(TickError::NoFeasibleSolution { iterations });
    };
    debug!(
        orientation = ?frame.orientation,
        spacing = solution.spacing(),
        start = solution.start(),
        end = solution.end(),
        total = penalty.total,
        iterations,
        "single-axis search finished"
    );

    Ok(AxisSearchOutcome {
        solution,
        penalty,
        iterations,
        improvements,
    })
}

#[cfg(test)]
mod tests {
    use super::search_axis;
    use crate::api::penalty::AxisFrame;
    use crate::api::{EstimatedLabelMetrics, TickPlacementConfig};
    use crate::core::{AxisOrientation, DataRange};
    use crate::error::TickError;

    fn horizontal(lo: f64, hi: f64, extent: f64) -> AxisFrame {
        AxisFrame::new(
            DataRange::new(lo, hi).expect("range"),
            extent,
            AxisOrientation::Horizontal,
        )
    }

    #[test]
    fn aligned_data_keeps_its_range() {
        let config = TickPlacementConfig::new().with_opt_spacing(50.0);
        let outcome = search_axis(
            &horizontal(0.0, 10.0, 400.0),
            &config,
            &EstimatedLabelMetrics::default(),
        )
        .expect("search");

        assert_eq!(outcome.solution.range(), (0.0, 10.0));
        assert_eq!(outcome.penalty.alignment, 0.0);
        assert!(outcome.solution.tick_count() >= 2);
    }

    #[test]
    fn improvements_are_strictly_decreasing() {
        let config = TickPlacementConfig::new();
        let outcome = search_axis(
            &horizontal(-3.7, 123.4, 512.0),
            &config,
            &EstimatedLabelMetrics::default(),
        )
        .expect("search");

        assert!(!outcome.improvements.is_empty());
        assert!(outcome.improvements.windows(2).all(|pair| pair[1] < pair[0]));
        assert_eq!(outcome.improvements.last().copied(), Some(outcome.penalty.total));
    }

    #[test]
    fn zero_extent_fails_before_searching() {
        let result = search_axis(
            &horizontal(0.0, 10.0, 0.0),
            &TickPlacementConfig::new(),
            &EstimatedLabelMetrics::default(),
        );
        assert!(matches!(result, Err(TickError::InvalidGeometry(_))));
    }

    #[test]
    fn exhausted_iteration_bound_is_reported() {
        let config = TickPlacementConfig::new().with_max_iterations(1);
        let result = search_axis(
            &horizontal(0.0, 10.0, 400.0),
            &config,
            &EstimatedLabelMetrics::default(),
        );
        assert!(matches!(
            result,
            Err(TickError::NoFeasibleSolution { iterations: 1 })
        ));
    }

    #[test]
    fn larger_stall_limit_never_scores_worse() {
        let metrics = EstimatedLabelMetrics::default();
        let frame = horizontal(0.013, 0.871, 300.0);
        let quick = search_axis(&frame, &TickPlacementConfig::new(), &metrics).expect("quick");
        let thorough = search_axis(
            &frame,
            &TickPlacementConfig::new().with_stall_limit(6),
            &metrics,
        )
        .expect("thorough");

        assert!(thorough.penalty.total <= quick.penalty.total);
        assert!(thorough.iterations >= quick.iterations);
    }
}
