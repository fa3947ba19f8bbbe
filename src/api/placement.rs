use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AspectRatio, AxisOrientation, AxisSolution, DataRange, Geometry};
use crate::error::TickResult;

use super::joint_axis::search_joint;
use super::penalty::AxisFrame;
use super::single_axis::search_axis;
use super::{EstimatedLabelMetrics, LabelMetrics, TickPlacementConfig};

/// Final tick parameters for both axes of a box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickPlacement {
    pub x: AxisSolution,
    pub y: AxisSolution,
    /// Sum of both axes' penalty totals.
    pub total_penalty: f64,
}

impl TickPlacement {
    #[must_use]
    pub fn into_pair(self) -> (AxisSolution, AxisSolution) {
        (self.x, self.y)
    }
}

/// Places ticks on both axes, estimating label widths from the configured font size.
///
/// Without an aspect ratio the axes are searched independently; with one,
/// a joint search keeps `(x3 - x0) / width == aspect * (y3 - y0) / height`.
pub fn place_ticks(
    data_x: DataRange,
    data_y: DataRange,
    geometry: Geometry,
    aspect: Option<AspectRatio>,
    config: &TickPlacementConfig,
) -> TickResult<TickPlacement> {
    let metrics = EstimatedLabelMetrics::new(config.label_font_size);
    place_ticks_with_metrics(data_x, data_y, geometry, aspect, config, &metrics)
}

/// Same as [`place_ticks`] with caller-supplied font metrics.
pub fn place_ticks_with_metrics<M: LabelMetrics>(
    data_x: DataRange,
    data_y: DataRange,
    geometry: Geometry,
    aspect: Option<AspectRatio>,
    config: &TickPlacementConfig,
    metrics: &M,
) -> TickResult<TickPlacement> {
    let config = config.validate()?;
    let geometry = geometry.validate()?;

    let placement = match aspect {
        None => {
            let x = search_axis(
                &AxisFrame::new(data_x, geometry.width, AxisOrientation::Horizontal),
                &config,
                metrics,
            )?;
            let y = search_axis(
                &AxisFrame::new(data_y, geometry.height, AxisOrientation::Vertical),
                &config,
                metrics,
            )?;
            TickPlacement {
                x: x.solution,
                y: y.solution,
                total_penalty: x.penalty.total + y.penalty.total,
            }
        }
        Some(aspect) => {
            let joint = search_joint(data_x, data_y, geometry, aspect, &config, metrics)?;
            TickPlacement {
                x: joint.x,
                y: joint.y,
                total_penalty: joint.total,
            }
        }
    };

    debug!(
        x_start = placement.x.start(),
        x_end = placement.x.end(),
        x_spacing = placement.x.spacing(),
        y_start = placement.y.start(),
        y_end = placement.y.end(),
        y_spacing = placement.y.spacing(),
        aspect = aspect.map(AspectRatio::value),
        "ticks placed"
    );
    Ok(placement)
}

#[cfg(test)]
mod tests {
    use super::{place_ticks, place_ticks_with_metrics};
    use crate::api::{LabelMetrics, TickPlacementConfig};
    use crate::core::{AspectRatio, DataRange, Geometry};
    use crate::error::TickError;

    struct WideLabels;

    impl LabelMetrics for WideLabels {
        fn label_width(&self, _text: &str) -> f64 {
            120.0
        }

        fn line_height(&self) -> f64 {
            12.0
        }
    }

    fn range(lo: f64, hi: f64) -> DataRange {
        DataRange::new(lo, hi).expect("range")
    }

    #[test]
    fn invalid_config_is_rejected_before_searching() {
        let config = TickPlacementConfig::new().with_opt_spacing(-1.0);
        let result = place_ticks(
            range(0.0, 1.0),
            range(0.0, 1.0),
            Geometry::new(100.0, 100.0),
            None,
            &config,
        );
        assert!(matches!(result, Err(TickError::InvalidConfig(_))));
    }

    #[test]
    fn zero_height_is_invalid_geometry() {
        let result = place_ticks(
            range(0.0, 1.0),
            range(0.0, 1.0),
            Geometry::new(100.0, 0.0),
            Some(AspectRatio::new(1.0).expect("aspect")),
            &TickPlacementConfig::new(),
        );
        assert!(matches!(result, Err(TickError::InvalidGeometry(_))));
    }

    #[test]
    fn wide_labels_push_towards_coarser_x_spacing() {
        let config = TickPlacementConfig::new().with_opt_spacing(40.0);
        let narrow = place_ticks(
            range(0.0, 100.0),
            range(0.0, 1.0),
            Geometry::new(400.0, 300.0),
            None,
            &config,
        )
        .expect("narrow labels");
        let wide = place_ticks_with_metrics(
            range(0.0, 100.0),
            range(0.0, 1.0),
            Geometry::new(400.0, 300.0),
            None,
            &config,
            &WideLabels,
        )
        .expect("wide labels");

        assert!(wide.x.spacing() > narrow.x.spacing());
        assert_eq!(wide.y.spacing(), narrow.y.spacing());
    }
}
