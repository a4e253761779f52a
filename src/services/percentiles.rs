//! Percentile helpers for already-sorted slices.
//!
//! - Empty input => `None`.
//! - `percentile <= 0` => first element.
//! - `percentile >= 100` => last element.
//! - Otherwise the position `p/100 * (len-1)` is located between two order
//!   statistics and the value is linearly interpolated between them.

/// Returns the linearly interpolated percentile of a slice sorted in
/// ascending order.
pub fn interpolated_sorted(sorted_values: &[f64], percentile: f64) -> Option<f64> {
    let last = sorted_values.len().checked_sub(1)?;
    if percentile <= 0.0 {
        return sorted_values.first().copied();
    }
    if percentile >= 100.0 {
        return sorted_values.get(last).copied();
    }

    let position = (percentile / 100.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    let low_value = *sorted_values.get(lower)?;
    let high_value = *sorted_values.get(upper)?;
    // rounding must not push the result past either neighbour
    let value = low_value + (high_value - low_value) * fraction;
    Some(value.max(low_value).min(high_value))
}
