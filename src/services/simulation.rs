use rand::Rng;
use thiserror::Error;

use crate::services::distribution_factory::DistributionError;
use crate::services::random_source::RandomSource;
use crate::services::scheduler::{Deadline, DeadlineExceeded};
use crate::services::summary_statistics::StatisticsError;

/// How many trials run between two deadline checks.
pub(crate) const DEADLINE_CHECK_INTERVAL: usize = 4096;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("no model variables have been submitted for this simulation")]
    NoModelVariables,
    #[error("trial count must be greater than zero, got {0}")]
    InvalidTrialCount(i64),
    #[error("trial count {requested} exceeds the configured maximum of {max}")]
    TrialLimitExceeded { requested: i64, max: usize },
    #[error(transparent)]
    Distribution(#[from] DistributionError),
    #[error(transparent)]
    Statistics(#[from] StatisticsError),
    #[error(transparent)]
    Deadline(#[from] DeadlineExceeded),
}

/// Validated parameters shared by every simulator invocation of one run.
#[derive(Debug, Clone, Copy)]
pub struct RunPlan {
    pub trials: usize,
    pub deadline: Deadline,
    pub random: RandomSource,
}

impl RunPlan {
    pub fn new(
        num_trials: i64,
        max_trials: usize,
        deadline: Deadline,
        random: RandomSource,
    ) -> Result<Self, SimulationError> {
        if num_trials <= 0 {
            return Err(SimulationError::InvalidTrialCount(num_trials));
        }
        let trials = usize::try_from(num_trials).map_err(|_| SimulationError::TrialLimitExceeded {
            requested: num_trials,
            max: max_trials,
        })?;
        if trials > max_trials {
            return Err(SimulationError::TrialLimitExceeded {
                requested: num_trials,
                max: max_trials,
            });
        }
        Ok(Self {
            trials,
            deadline,
            random,
        })
    }
}

/// Picks the contributor whose distributions drive one trial.
pub(crate) fn pick_contributor<R: Rng + ?Sized>(contributors: usize, rng: &mut R) -> usize {
    rng.gen_range(0..contributors)
}
