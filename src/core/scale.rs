use crate::error::{TickError, TickResult};

/// Affine map from an axis range in data units onto `[0, extent]` device units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> TickResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start >= domain_end {
            return Err(TickError::InvalidGeometry(format!(
                "axis range must be finite and increasing: start={domain_start}, end={domain_end}"
            )));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    /// Device units per data unit for an axis of length `extent`.
    pub fn device_per_data(self, extent: f64) -> TickResult<f64> {
        validate_extent(extent)?;
        Ok(extent / (self.domain_end - self.domain_start))
    }
}

pub(crate) fn validate_extent(extent: f64) -> TickResult<f64> {
    if !extent.is_finite() || extent <= 0.0 {
        return Err(TickError::InvalidGeometry(format!(
            "axis extent must be finite and > 0, got {extent}"
        )));
    }
    Ok(extent)
}
