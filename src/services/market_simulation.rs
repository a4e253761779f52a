use rand::Rng;
use tracing::debug;

use crate::domain::factor::{INITIAL_MARKET_SIZE, SIMULATED_YEARS, YOY_GROWTH_RATE};
use crate::domain::model_variables::ModelVariables;
use crate::services::distribution_factory::{DistributionError, FactorDistribution};
use crate::services::random_source::StreamKind;
use crate::services::scheduler::{Deadline, WorkerPool};
use crate::services::simulation::{
    DEADLINE_CHECK_INTERVAL, RunPlan, SimulationError, pick_contributor,
};
use crate::services::simulation_types::YearlyStatistics;
use crate::services::summary_statistics::summarize;

/// Trials per parallel work unit. Fixed so that seeded runs split the same way
/// regardless of pool size.
const TRIALS_PER_BATCH: usize = 2048;

/// One contributor's market-sizing distributions.
#[derive(Debug, Clone, Copy)]
pub struct MarketSizingBundle {
    initial_market_size: FactorDistribution,
    yoy_growth_rate: FactorDistribution,
}

impl MarketSizingBundle {
    pub fn from_model_variables(model_variables: &ModelVariables) -> Result<Self, DistributionError> {
        Ok(Self {
            initial_market_size: FactorDistribution::for_factor(model_variables, INITIAL_MARKET_SIZE)?,
            yoy_growth_rate: FactorDistribution::for_factor(model_variables, YOY_GROWTH_RATE)?,
        })
    }
}

pub fn validate_market_factors(model_variables: &ModelVariables) -> Result<(), DistributionError> {
    MarketSizingBundle::from_model_variables(model_variables).map(|_| ())
}

/// State threaded through the five years of a single trial: the contributor
/// chosen for the whole trial and the market size accumulated so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketTrial {
    pub contributor: usize,
    pub market_size: f64,
}

impl MarketTrial {
    pub fn start<R: Rng + ?Sized>(bundles: &[MarketSizingBundle], rng: &mut R) -> Self {
        let contributor = pick_contributor(bundles.len(), rng);
        let market_size = bundles[contributor].initial_market_size.draw(rng);
        Self {
            contributor,
            market_size,
        }
    }

    /// Applies one year of growth and returns the market size after it.
    pub fn advance_year<R: Rng + ?Sized>(&mut self, bundles: &[MarketSizingBundle], rng: &mut R) -> f64 {
        let growth_rate = bundles[self.contributor].yoy_growth_rate.draw(rng);
        self.market_size *= 1.0 + growth_rate;
        self.market_size
    }
}

/// Per-year samples, `years[y][t]` is trial `t`'s market size after year `y+1`.
pub type YearSamples = Vec<Vec<f64>>;

pub fn simulate_trials_with_rng<R: Rng + ?Sized>(
    bundles: &[MarketSizingBundle],
    trials: usize,
    deadline: &Deadline,
    rng: &mut R,
) -> Result<YearSamples, SimulationError> {
    if bundles.is_empty() {
        return Err(SimulationError::NoModelVariables);
    }

    let mut years: YearSamples = (0..SIMULATED_YEARS)
        .map(|_| Vec::with_capacity(trials))
        .collect();
    for trial_index in 0..trials {
        if trial_index % DEADLINE_CHECK_INTERVAL == 0 {
            deadline.check()?;
        }
        let mut trial = MarketTrial::start(bundles, rng);
        for samples in years.iter_mut() {
            samples.push(trial.advance_year(bundles, rng));
        }
    }
    Ok(years)
}

/// Runs the market-sizing model. Trials are batched across the worker pool;
/// years inside a trial stay sequential.
pub fn simulate_market(
    contributors: &[ModelVariables],
    plan: &RunPlan,
    workers: &WorkerPool,
) -> Result<Vec<YearlyStatistics>, SimulationError> {
    if contributors.is_empty() {
        return Err(SimulationError::NoModelVariables);
    }
    let bundles = contributors
        .iter()
        .map(MarketSizingBundle::from_model_variables)
        .collect::<Result<Vec<_>, _>>()?;

    let batches = plan.trials.div_ceil(TRIALS_PER_BATCH);
    let batch_samples = workers.run_ordered(batches, &plan.deadline, |batch| -> Result<YearSamples, SimulationError> {
        let first_trial = batch * TRIALS_PER_BATCH;
        let trials = TRIALS_PER_BATCH.min(plan.trials - first_trial);
        let mut rng = plan.random.stream(StreamKind::MarketBatch, batch as u64);
        simulate_trials_with_rng(&bundles, trials, &plan.deadline, &mut rng)
    })?;

    let mut years: YearSamples = (0..SIMULATED_YEARS)
        .map(|_| Vec::with_capacity(plan.trials))
        .collect();
    for batch in batch_samples {
        for (samples, batch_year) in years.iter_mut().zip(batch) {
            samples.extend(batch_year);
        }
    }

    let statistics = years
        .iter()
        .map(|samples| summarize(samples))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(batches, trials = plan.trials, "market sizing simulated");
    Ok(statistics)
}
