//! Tick placement: penalty evaluation, per-axis and joint searches, and the
//! [`place_ticks`] facade that dispatches between them.

mod config;
mod joint_axis;
mod label_format;
mod label_metrics;
mod penalty;
mod placement;
mod search_support;
mod single_axis;
mod validation;

pub use config::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_OPT_SPACING, DEFAULT_STALL_LIMIT, PenaltyWeights,
    TickPlacementConfig,
};
pub use joint_axis::{JointSearchOutcome, search_joint};
pub use label_format::{LabelFormat, adaptive_precision, format_general, tick_labels};
pub use label_metrics::{EstimatedLabelMetrics, LabelMetrics};
pub use penalty::{AxisFrame, PenaltyEvaluator, PenaltyVector};
pub use placement::{TickPlacement, place_ticks, place_ticks_with_metrics};
pub use search_support::ImprovementTrace;
pub use single_axis::{AxisSearchOutcome, search_axis};
