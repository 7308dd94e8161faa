//! Order statistics over original-scale reference distributions.
//!
//! Archetype targets are percentiles of small, often sparse samples, so the
//! quantile uses linear interpolation between the two nearest order
//! statistics. Non-finite inputs are the caller's responsibility to filter;
//! an empty sample yields `None` rather than a default.

/// Linearly interpolated quantile of `values` at fraction `q`.
///
/// `q` is clamped into `0.0..=1.0`. Returns `None` for an empty sample.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "quantile interpolation positions indices with bounded float maths"
)]
pub(crate) fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let clamped = q.clamp(0.0, 1.0);
    let position = (sorted.len() - 1) as f64 * clamped;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let lower_value = sorted.get(lower).copied()?;
    let upper_value = sorted.get(upper).copied()?;
    if lower == upper {
        return Some(lower_value);
    }
    let fraction = position - position.floor();
    Some(lower_value + (upper_value - lower_value) * fraction)
}

/// Median of `values`; `None` for an empty sample.
#[must_use]
pub(crate) fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}
