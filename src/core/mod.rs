pub mod scale;
pub mod spacing;
pub mod types;

pub use scale::LinearScale;
pub use spacing::{SPACING_MANTISSAS, SpacingLadder, TickSpacing};
pub use types::{AspectRatio, AxisOrientation, AxisSolution, DataRange, Geometry};
