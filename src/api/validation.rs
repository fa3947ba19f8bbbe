use crate::error::{TickError, TickResult};

use super::{LabelFormat, TickPlacementConfig};

pub(super) fn validate_tick_placement_config(
    config: TickPlacementConfig,
) -> TickResult<TickPlacementConfig> {
    for (name, weight) in [
        ("overlap", config.weights.overlap),
        ("spacing", config.weights.spacing),
        ("alignment", config.weights.alignment),
        ("area", config.weights.area),
    ] {
        if !weight.is_finite() || weight < 0.0 {
            return Err(TickError::InvalidConfig(format!(
                "penalty weight `{name}` must be finite and >= 0"
            )));
        }
    }

    if !config.opt_spacing.is_finite() || config.opt_spacing <= 0.0 {
        return Err(TickError::InvalidConfig("opt_spacing must be finite and > 0".to_owned()));
    }

    for (name, value) in [
        ("horizontal_label_separation", config.horizontal_label_separation),
        ("vertical_label_separation", config.vertical_label_separation),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(TickError::InvalidConfig(format!("{name} must be finite and >= 0")));
        }
    }

    if !config.label_font_size.is_finite() || config.label_font_size <= 0.0 {
        return Err(TickError::InvalidConfig("label_font_size must be finite and > 0".to_owned()));
    }

    match config.label_format {
        LabelFormat::General { significant_digits } => {
            if !(1..=17).contains(&significant_digits) {
                return Err(TickError::InvalidConfig(
                    "label significant digits must be between 1 and 17".to_owned(),
                ));
            }
        }
        LabelFormat::FixedDecimals { precision } => {
            if precision > 12 {
                return Err(TickError::InvalidConfig(
                    "label decimal precision must be <= 12".to_owned(),
                ));
            }
        }
        LabelFormat::Adaptive => {}
    }

    if config.stall_limit == 0 {
        return Err(TickError::InvalidConfig("stall_limit must be >= 1".to_owned()));
    }
    if config.max_iterations == 0 {
        return Err(TickError::InvalidConfig("max_iterations must be >= 1".to_owned()));
    }

    Ok(config)
}
