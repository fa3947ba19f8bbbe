//! axis-ticks: automatic axis-tick placement for plotting libraries.
//!
//! Given the data range of each axis and the device size of the axis box,
//! the crate picks tick spacings of the form `c * 10^k` (`c` in
//! `{1, 2, 2.5, 5}`) and extended axis ranges by a bounded search over a
//! penalty that weighs label overlap, on-device spacing, end alignment and
//! wasted area. An optional aspect ratio couples the two axes.
//!
//! ```
//! use axis_ticks::{DataRange, Geometry, TickPlacementConfig, place_ticks};
//!
//! let placement = place_ticks(
//!     DataRange::new(0.0, 10.0)?,
//!     DataRange::new(0.0, 5.0)?,
//!     Geometry::new(400.0, 300.0),
//!     None,
//!     &TickPlacementConfig::new().with_opt_spacing(50.0),
//! )?;
//! assert!(placement.x.start() <= 0.0 && placement.x.end() >= 10.0);
//! # Ok::<(), axis_ticks::TickError>(())
//! ```

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{
    LabelFormat, LabelMetrics, PenaltyWeights, TickPlacement, TickPlacementConfig, place_ticks,
    place_ticks_with_metrics,
};
pub use crate::core::{AspectRatio, AxisOrientation, AxisSolution, DataRange, Geometry, TickSpacing};
pub use error::{TickError, TickResult};
