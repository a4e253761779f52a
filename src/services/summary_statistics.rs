use thiserror::Error;

use crate::services::percentiles::interpolated_sorted;
use crate::services::simulation_types::YearlyStatistics;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatisticsError {
    #[error("cannot summarize an empty sample")]
    EmptySample,
}

/// Reduces one year's trial outcomes to summary statistics. The standard
/// deviation is the population form (divides by `n`).
pub fn summarize(values: &[f64]) -> Result<YearlyStatistics, StatisticsError> {
    if values.is_empty() {
        return Err(StatisticsError::EmptySample);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / count;
    let variance = sorted
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / count;

    let percentile = |p: f64| interpolated_sorted(&sorted, p).ok_or(StatisticsError::EmptySample);

    Ok(YearlyStatistics {
        mean,
        median: percentile(50.0)?,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        percentile_5: percentile(5.0)?,
        percentile_95: percentile(95.0)?,
    })
}
