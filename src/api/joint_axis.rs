use tracing::{debug, trace, warn};

use crate::core::spacing::visible_tick_count;
use crate::core::{
    AspectRatio, AxisOrientation, AxisSolution, DataRange, Geometry, SpacingLadder, TickSpacing,
};
use crate::error::{TickError, TickResult};

use super::penalty::{AxisFrame, PenaltyEvaluator, PenaltyVector};
use super::search_support::{
    ImprovementTrace, StallCounter, extension_candidates, fixed_length_starts,
};
use super::{LabelMetrics, TickPlacementConfig};

/// Relative slack when checking that a fixed-length window covers the data.
const WINDOW_CONTAINMENT_TOLERANCE: f64 = 1e-12;

/// Result of a joint search under a fixed aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct JointSearchOutcome {
    pub x: AxisSolution,
    pub y: AxisSolution,
    pub x_penalty: PenaltyVector,
    pub y_penalty: PenaltyVector,
    /// `x_penalty.total + y_penalty.total`.
    pub total: f64,
    /// Axis whose candidates drove the winning pass.
    pub driver: AxisOrientation,
    /// Outer iterations over both passes.
    pub iterations: u32,
    /// Recorded best totals of the winning pass.
    pub improvements: ImprovementTrace,
}

/// Chooses both axes so that `(x3 - x0) / w == aspect * (y3 - y0) / h`.
///
/// Two passes run: one enumerates x candidates and derives the y length from
/// the aspect relation, the other does the same with the axes swapped. The
/// lower total wins; on equal totals the coarser x spacing, then the coarser
/// y spacing wins. The rule applies inside each pass as well as between them,
/// and the x-driven pass wins remaining ties.
pub fn search_joint<M: LabelMetrics>(
    data_x: DataRange,
    data_y: DataRange,
    geometry: Geometry,
    aspect: AspectRatio,
    config: &TickPlacementConfig,
    metrics: &M,
) -> TickResult<JointSearchOutcome> {
    let geometry = geometry.validate()?;
    let x_frame = AxisFrame::new(data_x, geometry.width, AxisOrientation::Horizontal);
    let y_frame = AxisFrame::new(data_y, geometry.height, AxisOrientation::Vertical);

    let y_per_x = aspect.vertical_per_horizontal(geometry);
    let x_per_y = aspect.value() * geometry.width / geometry.height;
    if !is_usable_ratio(y_per_x) || !is_usable_ratio(x_per_y) {
        warn!(
            aspect = aspect.value(),
            width = geometry.width,
            height = geometry.height,
            "aspect ratio is incompatible with the axis box"
        );
        return Err(TickError::NoFeasibleSolution { iterations: 0 });
    }

    let evaluator = PenaltyEvaluator::new(config, metrics);
    let x_driven = DrivenPass {
        evaluator,
        driver: x_frame,
        follower: y_frame,
        follower_per_driver: y_per_x,
    }
    .run()?;
    let y_driven = DrivenPass {
        evaluator,
        driver: y_frame,
        follower: x_frame,
        follower_per_driver: x_per_y,
    }
    .run()?;

    let iterations = x_driven.iterations + y_driven.iterations;
    let x_best = x_driven.best.map(|best| best.into_outcome(AxisOrientation::Horizontal));
    let y_best = y_driven.best.map(|best| best.into_outcome(AxisOrientation::Vertical));

    let winner = match (x_best, y_best) {
        (Some(from_x), Some(from_y)) => {
            if joint_is_better(&from_y, &from_x) {
                from_y
            } else {
                from_x
            }
        }
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => {
            warn!(iterations, "joint search found no feasible axis pair");
            return Err(TickError::NoFeasibleSolution { iterations });
        }
    };

    debug!(
        driver = ?winner.driver,
        x_spacing = winner.x.spacing(),
        y_spacing = winner.y.spacing(),
        total = winner.total,
        iterations,
        "joint search finished"
    );
    Ok(JointSearchOutcome {
        iterations,
        ..winner
    })
}

fn is_usable_ratio(ratio: f64) -> bool {
    ratio.is_finite() && ratio > 0.0
}

/// `(x spacing, y spacing)` of an axis pair.
type SpacingKey = (TickSpacing, TickSpacing);

/// Lexicographic on (total, x spacing descending, y spacing descending).
fn ranks_above(total: f64, key: SpacingKey, current_total: f64, current_key: SpacingKey) -> bool {
    if total != current_total {
        return total < current_total;
    }
    key > current_key
}

fn joint_is_better(candidate: &JointSearchOutcome, current: &JointSearchOutcome) -> bool {
    ranks_above(
        candidate.total,
        (candidate.x.tick_spacing(), candidate.y.tick_spacing()),
        current.total,
        (current.x.tick_spacing(), current.y.tick_spacing()),
    )
}

#[derive(Debug, Clone, Copy)]
struct ScoredAxis {
    solution: AxisSolution,
    penalty: PenaltyVector,
}

#[derive(Debug, Clone)]
struct PassBest {
    driver: ScoredAxis,
    follower: ScoredAxis,
    total: f64,
    improvements: ImprovementTrace,
}

impl PassBest {
    fn into_outcome(self, driver: AxisOrientation) -> JointSearchOutcome {
        let (x, y) = match driver {
            AxisOrientation::Horizontal => (self.driver, self.follower),
            AxisOrientation::Vertical => (self.follower, self.driver),
        };
        JointSearchOutcome {
            x: x.solution,
            y: y.solution,
            x_penalty: x.penalty,
            y_penalty: y.penalty,
            total: self.total,
            driver,
            iterations: 0,
            improvements: self.improvements,
        }
    }
}

struct PassResult {
    best: Option<PassBest>,
    iterations: u32,
}

/// One half of the joint search: enumerate the driver axis, derive the follower.
struct DrivenPass<'a, M: LabelMetrics> {
    evaluator: PenaltyEvaluator<'a, M>,
    driver: AxisFrame,
    follower: AxisFrame,
    follower_per_driver: f64,
}

impl<M: LabelMetrics> DrivenPass<'_, M> {
    fn spacing_key(&self, driver: TickSpacing, follower: TickSpacing) -> SpacingKey {
        match self.driver.orientation {
            AxisOrientation::Horizontal => (driver, follower),
            AxisOrientation::Vertical => (follower, driver),
        }
    }

    fn run(&self) -> TickResult<PassResult> {
        let config = self.evaluator.config();

        // Driver lengths below this cannot yield a follower covering its data.
        let widened = self
            .driver
            .data
            .widened_to(self.follower.data.span() / self.follower_per_driver);
        let ladder = if widened.lo().is_finite() && widened.hi().is_finite() {
            SpacingLadder::covering(widened.span())
        } else {
            None
        };
        let Some(ladder) = ladder else {
            return Ok(PassResult {
                best: None,
                iterations: 0,
            });
        };

        let mut best: Option<PassBest> = None;
        let mut improvements = ImprovementTrace::new();
        let mut stall = StallCounter::new(config.stall_limit);
        let mut iterations = 0u32;

        for driver_spacing in ladder {
            if iterations >= config.max_iterations {
                warn!(
                    iterations,
                    driver = ?self.driver.orientation,
                    "joint search hit iteration bound"
                );
                return Err(TickError::NoFeasibleSolution { iterations });
            }
            iterations += 1;

            let spacing = driver_spacing.value();
            let mut improved = false;
            for (start, end) in extension_candidates(widened, spacing) {
                if visible_tick_count(start, end, spacing) < 2 {
                    continue;
                }
                let follower_length = self.follower_per_driver * (end - start);
                if !follower_length.is_finite()
                    || follower_length
                        < self.follower.data.span() * (1.0 - WINDOW_CONTAINMENT_TOLERANCE)
                {
                    continue;
                }
                let Some(follower) = self.best_follower(follower_length)? else {
                    continue;
                };

                let penalty = self.evaluator.evaluate(&self.driver, start, end, spacing)?;
                let total = penalty.total + follower.penalty.total;
                let key = self.spacing_key(driver_spacing, follower.solution.tick_spacing());
                // Equal totals may swap in a coarser pair without counting as progress.
                let (replaces, lowers_total) = match best.as_ref() {
                    None => (true, true),
                    Some(current) => {
                        let current_key = self.spacing_key(
                            current.driver.solution.tick_spacing(),
                            current.follower.solution.tick_spacing(),
                        );
                        (
                            ranks_above(total, key, current.total, current_key),
                            total < current.total,
                        )
                    }
                };
                if lowers_total {
                    trace!(
                        driver = ?self.driver.orientation,
                        driver_spacing = spacing,
                        follower_spacing = follower.solution.spacing(),
                        total,
                        "joint candidate improved"
                    );
                    improvements.push(total);
                    improved = true;
                }
                if replaces {
                    best = Some(PassBest {
                        driver: ScoredAxis {
                            solution: AxisSolution::new(start, end, driver_spacing),
                            penalty,
                        },
                        follower,
                        total,
                        improvements: ImprovementTrace::new(),
                    });
                }
            }

            if stall.observe(improved, best.is_some()) {
                break;
            }
        }

        let best = best.map(|mut best| {
            best.improvements = improvements;
            best
        });
        Ok(PassResult { best, iterations })
    }

    /// Best follower axis of exactly `length` data units.
    fn best_follower(&self, length: f64) -> TickResult<Option<ScoredAxis>> {
        let config = self.evaluator.config();
        let data = self.follower.data;
        let Some(ladder) = SpacingLadder::covering(length) else {
            return Ok(None);
        };

        let mut best: Option<ScoredAxis> = None;
        let mut stall = StallCounter::new(config.stall_limit);
        let mut iterations = 0u32;

        for follower_spacing in ladder {
            if iterations >= config.max_iterations {
                warn!(
                    iterations,
                    follower = ?self.follower.orientation,
                    length,
                    "follower search hit iteration bound"
                );
                return Err(TickError::NoFeasibleSolution { iterations });
            }
            iterations += 1;

            let spacing = follower_spacing.value();
            let slack = WINDOW_CONTAINMENT_TOLERANCE * length;
            let mut improved = false;
            for start in fixed_length_starts(data, length, spacing) {
                let end = start + length;
                if start > data.lo() + slack || end < data.hi() - slack {
                    continue;
                }
                let (start, end) = (start.min(data.lo()), end.max(data.hi()));
                if visible_tick_count(start, end, spacing) < 2 {
                    continue;
                }

                let penalty = self.evaluator.evaluate(&self.follower, start, end, spacing)?;
                let is_better = best
                    .as_ref()
                    .is_none_or(|current| penalty.total < current.penalty.total);
                if is_better {
                    best = Some(ScoredAxis {
                        solution: AxisSolution::new(start, end, follower_spacing),
                        penalty,
                    });
                    improved = true;
                }
            }

            if stall.observe(improved, best.is_some()) {
                break;
            }
        }

        Ok(best)
    }
}
