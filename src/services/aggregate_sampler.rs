use tracing::debug;

use crate::domain::factor::{market_sizing_factor_names, revenue_driver_factor_names};
use crate::domain::model_variables::ModelVariables;
use crate::services::distribution_factory::FactorDistribution;
use crate::services::histogram::compute_histogram;
use crate::services::random_source::{RandomSource, StreamKind};
use crate::services::scheduler::{Deadline, WorkerPool};
use crate::services::simulation::SimulationError;
use crate::services::simulation_types::AggregateHistograms;

#[derive(Debug, Clone, Copy)]
pub struct SamplerSettings {
    /// Draws per contributor and factor.
    pub samples_per_contributor: usize,
    pub bins: usize,
    pub deadline: Deadline,
    pub random: RandomSource,
}

/// Draws `samples_per_contributor` values from every contributor's
/// distribution for each factor and concatenates them per factor, in
/// contributor order. Returns one pooled sample per factor, in `factors`
/// order.
pub fn pool_factor_samples(
    contributors: &[ModelVariables],
    factors: &[String],
    settings: &SamplerSettings,
    workers: &WorkerPool,
) -> Result<Vec<Vec<f64>>, SimulationError> {
    let per_contributor = workers.run_ordered(
        contributors.len(),
        &settings.deadline,
        |index| -> Result<Vec<Vec<f64>>, SimulationError> {
            let model_variables = &contributors[index];
            let mut rng = settings.random.stream(StreamKind::FactorSample, index as u64);
            factors
                .iter()
                .map(|factor| -> Result<Vec<f64>, SimulationError> {
                    let distribution = FactorDistribution::for_factor(model_variables, factor)?;
                    Ok(distribution.draw_n(settings.samples_per_contributor, &mut rng))
                })
                .collect()
        },
    )?;

    let mut pooled: Vec<Vec<f64>> = factors
        .iter()
        .map(|_| Vec::with_capacity(contributors.len() * settings.samples_per_contributor))
        .collect();
    for contributor_samples in per_contributor {
        for (pool, samples) in pooled.iter_mut().zip(contributor_samples) {
            pool.extend(samples);
        }
    }
    Ok(pooled)
}

fn histograms_for(
    contributors: &[ModelVariables],
    factors: Vec<String>,
    settings: &SamplerSettings,
    workers: &WorkerPool,
    into: &mut AggregateHistograms,
) -> Result<(), SimulationError> {
    let pooled = pool_factor_samples(contributors, &factors, settings, workers)?;
    let histograms = workers.run_ordered(pooled.len(), &settings.deadline, |index| {
        Ok::<_, SimulationError>(compute_histogram(&pooled[index], settings.bins))
    })?;
    for (factor, histogram) in factors.into_iter().zip(histograms) {
        debug!(factor = %factor, bins = histogram.y_values.len(), "factor histogram built");
        into.insert(factor, histogram);
    }
    Ok(())
}

/// Histograms of the pooled input distributions of a project. Market-sizing
/// factors are included only when cross-check contributors exist.
pub fn sample_aggregate_distributions(
    revenue_contributors: &[ModelVariables],
    cross_check_contributors: &[ModelVariables],
    settings: &SamplerSettings,
    workers: &WorkerPool,
) -> Result<AggregateHistograms, SimulationError> {
    if revenue_contributors.is_empty() {
        return Err(SimulationError::NoModelVariables);
    }

    let mut histograms = AggregateHistograms::new();
    histograms_for(
        revenue_contributors,
        revenue_driver_factor_names(),
        settings,
        workers,
        &mut histograms,
    )?;
    if !cross_check_contributors.is_empty() {
        histograms_for(
            cross_check_contributors,
            market_sizing_factor_names(),
            settings,
            workers,
            &mut histograms,
        )?;
    }
    Ok(histograms)
}
