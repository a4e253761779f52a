use rand::Rng;
use tracing::debug;

use crate::domain::factor::{
    EXPECTED_DISCOUNT_PER_DEAL, NUM_PREMIUM_USERS_PER_DEAL, NUM_STANDARD_USERS_PER_DEAL,
    SIMULATED_YEARS, WILLINGNESS_TO_PAY_PREMIUM, WILLINGNESS_TO_PAY_STANDARD, num_deals_per_year,
};
use crate::domain::model_variables::ModelVariables;
use crate::services::distribution_factory::{DistributionError, FactorDistribution};
use crate::services::random_source::StreamKind;
use crate::services::scheduler::{Deadline, WorkerPool};
use crate::services::simulation::{
    DEADLINE_CHECK_INTERVAL, RunPlan, SimulationError, pick_contributor,
};
use crate::services::simulation_types::YearlyStatistics;
use crate::services::summary_statistics::summarize;

/// One contributor's six revenue-driver distributions for a single year.
#[derive(Debug, Clone, Copy)]
pub struct RevenueDriverBundle {
    wtp_standard: FactorDistribution,
    wtp_premium: FactorDistribution,
    standard_users: FactorDistribution,
    premium_users: FactorDistribution,
    deals: FactorDistribution,
    discount: FactorDistribution,
}

impl RevenueDriverBundle {
    pub fn for_year(model_variables: &ModelVariables, year: usize) -> Result<Self, DistributionError> {
        let build = |factor: &str| FactorDistribution::for_factor(model_variables, factor);
        Ok(Self {
            wtp_standard: build(WILLINGNESS_TO_PAY_STANDARD)?,
            wtp_premium: build(WILLINGNESS_TO_PAY_PREMIUM)?,
            standard_users: build(NUM_STANDARD_USERS_PER_DEAL)?,
            premium_users: build(NUM_PREMIUM_USERS_PER_DEAL)?,
            deals: build(&num_deals_per_year(year))?,
            discount: build(EXPECTED_DISCOUNT_PER_DEAL)?,
        })
    }

    /// Draws every factor once and combines them into a year's revenue.
    pub fn draw_revenue<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let wtp_standard = self.wtp_standard.draw(rng);
        let wtp_premium = self.wtp_premium.draw(rng);
        let standard_users = self.standard_users.draw(rng);
        let premium_users = self.premium_users.draw(rng);
        let deals = self.deals.draw(rng);
        let discount = self.discount.draw(rng);

        let deal_size = wtp_standard * standard_users + wtp_premium * premium_users;
        deal_size * deals * (1.0 - discount)
    }
}

/// Checks that a submission holds every revenue-driver factor for every year
/// and that each one builds.
pub fn validate_revenue_factors(model_variables: &ModelVariables) -> Result<(), DistributionError> {
    for year in 1..=SIMULATED_YEARS {
        RevenueDriverBundle::for_year(model_variables, year)?;
    }
    Ok(())
}

pub fn build_year_bundles(
    contributors: &[ModelVariables],
    year: usize,
) -> Result<Vec<RevenueDriverBundle>, DistributionError> {
    contributors
        .iter()
        .map(|model_variables| RevenueDriverBundle::for_year(model_variables, year))
        .collect()
}

/// Runs `trials` revenue trials for one year. Each trial picks a single
/// contributor and draws all six factors from that contributor's bundle.
pub fn simulate_year_with_rng<R: Rng + ?Sized>(
    bundles: &[RevenueDriverBundle],
    trials: usize,
    deadline: &Deadline,
    rng: &mut R,
) -> Result<Vec<f64>, SimulationError> {
    if bundles.is_empty() {
        return Err(SimulationError::NoModelVariables);
    }

    let mut revenues = Vec::with_capacity(trials);
    for trial in 0..trials {
        if trial % DEADLINE_CHECK_INTERVAL == 0 {
            deadline.check()?;
        }
        let bundle = &bundles[pick_contributor(bundles.len(), rng)];
        revenues.push(bundle.draw_revenue(rng));
    }
    Ok(revenues)
}

/// Simulates all five years in parallel, one work unit per year, and returns
/// their statistics in year order.
pub fn simulate_revenue(
    contributors: &[ModelVariables],
    plan: &RunPlan,
    workers: &WorkerPool,
) -> Result<Vec<YearlyStatistics>, SimulationError> {
    if contributors.is_empty() {
        return Err(SimulationError::NoModelVariables);
    }

    workers.run_ordered(SIMULATED_YEARS, &plan.deadline, |unit| -> Result<YearlyStatistics, SimulationError> {
        let year = unit + 1;
        let bundles = build_year_bundles(contributors, year)?;
        let mut rng = plan.random.stream(StreamKind::RevenueYear, unit as u64);
        let revenues = simulate_year_with_rng(&bundles, plan.trials, &plan.deadline, &mut rng)?;
        let statistics = summarize(&revenues)?;
        debug!(year, trials = plan.trials, mean = statistics.mean, "revenue year simulated");
        Ok(statistics)
    })
}
