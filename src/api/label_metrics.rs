use crate::core::AxisOrientation;

/// Font-metrics service used to estimate label overlap.
///
/// Implementations return lengths in the same device units as the axis
/// geometry. A text backend can implement this with real glyph extents;
/// [`EstimatedLabelMetrics`] is a deterministic stand-in.
pub trait LabelMetrics {
    fn label_width(&self, text: &str) -> f64;

    fn line_height(&self) -> f64;

    /// Length a label occupies along the axis it annotates.
    ///
    /// Horizontal-axis labels run parallel to the axis, so their width
    /// counts; vertical-axis labels are stacked, so one line height counts.
    fn label_extent(&self, text: &str, orientation: AxisOrientation) -> f64 {
        match orientation {
            AxisOrientation::Horizontal => self.label_width(text),
            AxisOrientation::Vertical => self.line_height(),
        }
    }
}

impl<M: LabelMetrics + ?Sized> LabelMetrics for &M {
    fn label_width(&self, text: &str) -> f64 {
        (**self).label_width(text)
    }

    fn line_height(&self) -> f64 {
        (**self).line_height()
    }
}

const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Backend-independent label metrics from a per-character advance table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedLabelMetrics {
    pub font_size: f64,
}

impl EstimatedLabelMetrics {
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self { font_size }
    }
}

impl Default for EstimatedLabelMetrics {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl LabelMetrics for EstimatedLabelMetrics {
    fn label_width(&self, text: &str) -> f64 {
        let units = text.chars().fold(0.0, |acc, ch| {
            acc + match ch {
                '0'..='9' => 0.56,
                '.' | ',' => 0.28,
                '-' | '+' => 0.58,
                'e' => 0.56,
                ' ' => 0.28,
                _ => 0.6,
            }
        });
        units * self.font_size
    }

    fn line_height(&self) -> f64 {
        self.font_size * LINE_HEIGHT_FACTOR
    }
}

#[cfg(test)]
mod tests {
    use super::{EstimatedLabelMetrics, LabelMetrics};
    use crate::core::AxisOrientation;

    #[test]
    fn estimated_width_grows_with_text_length() {
        let metrics = EstimatedLabelMetrics::new(10.0);
        let short = metrics.label_width("5");
        let long = metrics.label_width("-12.5");
        assert!(short > 0.0);
        assert!(long > short);
        assert_eq!(metrics.label_width(""), 0.0);
    }

    #[test]
    fn vertical_extent_ignores_text_width() {
        let metrics = EstimatedLabelMetrics::new(10.0);
        assert_eq!(
            metrics.label_extent("1", AxisOrientation::Vertical),
            metrics.label_extent("100000", AxisOrientation::Vertical)
        );
        assert_eq!(
            metrics.label_extent("100", AxisOrientation::Horizontal),
            metrics.label_width("100")
        );
    }

    #[test]
    fn references_forward_to_inner_metrics() {
        fn height_of<M: LabelMetrics>(metrics: M) -> f64 {
            metrics.line_height()
        }

        let metrics = EstimatedLabelMetrics::new(12.0);
        let by_ref: &dyn LabelMetrics = &metrics;
        assert_eq!(height_of(by_ref), metrics.line_height());
        assert_eq!(height_of(&metrics), metrics.line_height());
    }
}
