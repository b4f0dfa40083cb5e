use crate::model::RawMetrics;

/// `numerator / denominator * 100`, or `0.0` when the denominator is not
/// positive. The result is never NaN or infinite.
pub fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64 * 100.0
    } else {
        0.0
    }
}

/// Turnout and validity percentages of one category.
///
/// Values are not clamped: inconsistent source counts can push either one
/// above 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratios {
    /// emitidos / padron
    pub participacion: f64,
    /// validos / emitidos
    pub eficiencia: f64,
}

impl Ratios {
    pub fn from_raw(metrics: &RawMetrics) -> Self {
        Self {
            participacion: percentage(metrics.emitidos, metrics.padron),
            eficiencia: percentage(metrics.validos, metrics.emitidos),
        }
    }
}
