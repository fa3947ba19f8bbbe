use serde::{Deserialize, Serialize};

use crate::core::AxisSolution;

/// Numeric formatting policy for tick labels.
///
/// Only the rendered width of a label matters to tick placement, but the
/// placement must measure exactly the strings the caller will draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelFormat {
    /// C `%g` style: shortest of fixed/scientific with `significant_digits`.
    General { significant_digits: u8 },
    /// Fixed number of decimals.
    FixedDecimals { precision: u8 },
    /// Just enough decimals to distinguish adjacent ticks at the current spacing.
    Adaptive,
}

impl Default for LabelFormat {
    fn default() -> Self {
        Self::General {
            significant_digits: 6,
        }
    }
}

impl LabelFormat {
    #[must_use]
    pub fn format(self, value: f64, spacing: f64) -> String {
        match self {
            Self::General { significant_digits } => format_general(value, significant_digits),
            Self::FixedDecimals { precision } => format_fixed(value, usize::from(precision)),
            Self::Adaptive => format_fixed(value, adaptive_precision(spacing)),
        }
    }
}

/// Tick positions of `solution` paired with their label text.
#[must_use]
pub fn tick_labels(solution: AxisSolution, format: LabelFormat) -> Vec<(f64, String)> {
    let spacing = solution.spacing();
    solution
        .ticks()
        .into_iter()
        .map(|value| (value, format.format(value, spacing)))
        .collect()
}

/// Decimals needed so that multiples of `spacing` print exactly.
#[must_use]
pub fn adaptive_precision(spacing: f64) -> usize {
    if !spacing.is_finite() || spacing <= 0.0 {
        return 0;
    }
    // Mantissa 2.5 needs one decimal more than its decade.
    for precision in 0..=15 {
        let scaled = spacing * 10f64.powi(precision);
        if (scaled - scaled.round()).abs() <= 1e-9 * scaled.abs().max(1.0) {
            return precision as usize;
        }
    }
    15
}

fn format_fixed(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return "nan".to_owned();
    }
    normalize_negative_zero(format!("{value:.precision$}"))
}

/// Formats like C's `printf("%.*g", digits, value)`.
#[must_use]
pub fn format_general(value: f64, significant_digits: u8) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    let digits = usize::from(significant_digits.max(1));
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let mantissa = trim_fraction_zeros(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.abs());
    }

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    normalize_negative_zero(trim_fraction_zeros(&format!("{value:.decimals$}")).to_owned())
}

fn trim_fraction_zeros(text: &str) -> &str {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.')
}

fn normalize_negative_zero(text: String) -> String {
    let is_zero = text
        .trim_start_matches('-')
        .chars()
        .all(|ch| ch == '0' || ch == '.');
    if is_zero && text.starts_with('-') {
        text[1..].to_owned()
    } else {
        text
    }
}
