use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::factor::{FactorSpec, SIMULATED_YEARS};
use crate::domain::model_variables::ModelVariables;
use crate::domain::project::Project;
use crate::domain::simulation::{Simulation, Track};
use crate::services::aggregate_sampler::{SamplerSettings, sample_aggregate_distributions};
use crate::services::distribution_factory::DistributionError;
use crate::services::engine_config::{EngineConfig, EngineConfigError};
use crate::services::market_simulation::{simulate_market, validate_market_factors};
use crate::services::random_source::RandomSource;
use crate::services::revenue_simulation::{simulate_revenue, validate_revenue_factors};
use crate::services::scheduler::{Deadline, SchedulerError, WorkerPool};
use crate::services::simulation::{RunPlan, SimulationError};
use crate::services::simulation_types::{
    AggregateHistograms, CrossCheckReceipt, SimulationOutput, SubmissionReceipt,
};
use crate::services::store::{SimulationStore, StoreError};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Distribution(#[from] DistributionError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] EngineConfigError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// Whether a finished run replaced the stored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteOutcome {
    Written,
    Stale { stored_ticket: u64 },
}

/// One mutex per key, created on first use and dropped once nobody holds it.
#[derive(Default)]
struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    fn get(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        // a strong count of 1 means only the map still refers to the lock
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(key.to_string()).or_default().clone()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().len()
    }
}

fn initial_ticket() -> u64 {
    Utc::now()
        .timestamp_nanos_opt()
        .and_then(|nanos| u64::try_from(nanos).ok())
        .unwrap_or_default()
}

/// Runs simulations against a [`SimulationStore`] and keeps outputs and
/// project-derived fields up to date.
///
/// Simulations for different ids run independently. Output write-back is
/// serialized per simulation id, and every run takes a ticket when it starts so
/// that a slow, older run cannot overwrite the result of a newer one. These
/// guarantees hold within one engine; see [`SimulationStore`] for sharing a
/// store between processes.
pub struct SimulationEngine<S: SimulationStore> {
    store: S,
    config: EngineConfig,
    run_deadline: Duration,
    workers: WorkerPool,
    random: RandomSource,
    output_locks: KeyedLocks,
    project_locks: KeyedLocks,
    tickets: AtomicU64,
}

impl<S: SimulationStore> SimulationEngine<S> {
    pub fn new(store: S, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let run_deadline = config.run_deadline()?;
        let workers = WorkerPool::new(config.worker_threads)?;
        let random = RandomSource::new(config.seed);
        debug!(threads = workers.threads(), seeded = config.seed.is_some(), "simulation engine ready");
        Ok(Self {
            store,
            config,
            run_deadline,
            workers,
            random,
            output_locks: KeyedLocks::default(),
            project_locks: KeyedLocks::default(),
            tickets: AtomicU64::new(initial_ticket()),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst)
    }

    fn load_project(&self, project_id: &str) -> Result<Project, EngineError> {
        self.store
            .get_project(project_id)?
            .ok_or_else(|| EngineError::NotFound(format!("project {project_id}")))
    }

    fn simulation_for(project: &Project, track: Track) -> Result<Simulation, EngineError> {
        project
            .simulation(track)
            .ok_or_else(|| EngineError::NotFound(format!("{track} simulation of project {}", project.id)))
    }

    /// Stores a contributor's factors and reruns every simulation they feed.
    ///
    /// The submission goes to the admin track for the project's admin and to
    /// the normal track for everyone else. Contributors with cross-check
    /// access also feed the market-sizing model with the same factors. All
    /// factors are validated before anything is written.
    pub fn submit_factors(
        &self,
        contributor_id: &str,
        project_id: &str,
        factors: BTreeMap<String, FactorSpec>,
    ) -> Result<SubmissionReceipt, EngineError> {
        let project = self.load_project(project_id)?;
        let access = project.access_for(contributor_id).ok_or_else(|| {
            EngineError::NotFound(format!("contributor {contributor_id} in project {project_id}"))
        })?;
        let track = project.revenue_track_for(contributor_id);
        let revenue_simulation = Self::simulation_for(&project, track)?;
        let cross_check_simulation = if access.cross_check_access {
            Some(Self::simulation_for(&project, Track::CrossCheck)?)
        } else {
            None
        };

        let revenue_variables = ModelVariables::new(contributor_id, &revenue_simulation.id, factors.clone());
        validate_revenue_factors(&revenue_variables)?;
        let cross_check_variables = match &cross_check_simulation {
            Some(simulation) => {
                let variables = ModelVariables::new(contributor_id, &simulation.id, factors);
                validate_market_factors(&variables)?;
                Some(variables)
            }
            None => None,
        };

        info!(
            contributor_id,
            project_id,
            track = %track,
            cross_check = cross_check_variables.is_some(),
            "factors submitted"
        );
        self.store.upsert_model_variables(&revenue_variables)?;
        let output = self.run_simulation(&revenue_simulation)?;

        let cross_check = match (cross_check_simulation, cross_check_variables) {
            (Some(simulation), Some(variables)) => {
                self.store.upsert_model_variables(&variables)?;
                let output = self.run_simulation(&simulation)?;
                Some(CrossCheckReceipt {
                    simulation_id: simulation.id,
                    output,
                })
            }
            _ => None,
        };

        self.update_project(project_id, |project| {
            project
                .contributors
                .entry(contributor_id.to_string())
                .or_default()
                .form_submitted = true;
        })?;

        Ok(SubmissionReceipt {
            project_id: project_id.to_string(),
            contributor_id: contributor_id.to_string(),
            simulation_id: revenue_simulation.id,
            track,
            output,
            cross_check,
        })
    }

    /// Reruns one of a project's simulations from the stored submissions.
    pub fn run_track(&self, project_id: &str, track: Track) -> Result<SimulationOutput, EngineError> {
        let project = self.load_project(project_id)?;
        let simulation = Self::simulation_for(&project, track)?;
        self.run_simulation(&simulation)
    }

    /// The stored output of one of a project's simulations.
    pub fn output(&self, project_id: &str, track: Track) -> Result<SimulationOutput, EngineError> {
        let project = self.load_project(project_id)?;
        let simulation = Self::simulation_for(&project, track)?;
        self.store
            .get_output(&simulation.id)?
            .ok_or_else(|| EngineError::NotFound(format!("output of simulation {}", simulation.id)))
    }

    /// Histograms of the pooled input distributions of a project. Nothing is
    /// stored; every call samples afresh.
    pub fn aggregate_distributions(&self, project_id: &str) -> Result<AggregateHistograms, EngineError> {
        let project = self.load_project(project_id)?;
        let revenue_contributors = self.store.list_model_variables(&project.normal_sim_id)?;
        let cross_check_contributors = match project.cross_check_sim_id.as_deref() {
            Some(simulation_id) => self.store.list_model_variables(simulation_id)?,
            None => Vec::new(),
        };
        let settings = SamplerSettings {
            samples_per_contributor: self.config.aggregate_samples,
            bins: self.config.histogram_bins,
            deadline: Deadline::after(self.run_deadline),
            random: self.random,
        };
        let histograms = sample_aggregate_distributions(
            &revenue_contributors,
            &cross_check_contributors,
            &settings,
            &self.workers,
        )?;
        info!(
            project_id,
            factors = histograms.len(),
            elapsed_ms = settings.deadline.elapsed().as_millis() as u64,
            "aggregate distributions sampled"
        );
        Ok(histograms)
    }

    fn run_simulation(&self, simulation: &Simulation) -> Result<SimulationOutput, EngineError> {
        let ticket = self.next_ticket();
        let deadline = Deadline::after(self.run_deadline);
        let plan = RunPlan::new(simulation.num_trials, self.config.max_trials, deadline, self.random)?;
        let contributors = self.store.list_model_variables(&simulation.id)?;
        info!(
            simulation_id = %simulation.id,
            track = %simulation.track,
            trials = plan.trials,
            contributors = contributors.len(),
            "simulation run started"
        );

        let summary_statistics = match simulation.track {
            Track::Normal | Track::Admin => simulate_revenue(&contributors, &plan, &self.workers)?,
            Track::CrossCheck => simulate_market(&contributors, &plan, &self.workers)?,
        };
        let output = SimulationOutput {
            simulation_id: simulation.id.clone(),
            summary_statistics,
            run_ticket: ticket,
            computed_at: Utc::now(),
        };

        let lock = self.output_locks.get(&simulation.id);
        let _guard = lock.lock();
        match self.write_output(&output)? {
            WriteOutcome::Written => {
                if simulation.track.is_revenue_driver() {
                    self.publish_fifth_year(&simulation.project_id, &output)?;
                }
            }
            WriteOutcome::Stale { stored_ticket } => {
                warn!(
                    simulation_id = %simulation.id,
                    run_ticket = ticket,
                    stored_ticket,
                    "newer output already stored, discarding this run"
                );
            }
        }
        info!(
            simulation_id = %simulation.id,
            track = %simulation.track,
            elapsed_ms = deadline.elapsed().as_millis() as u64,
            "simulation run finished"
        );
        Ok(output)
    }

    /// Caller holds the output lock for `output.simulation_id`.
    fn write_output(&self, output: &SimulationOutput) -> Result<WriteOutcome, EngineError> {
        if let Some(stored) = self.store.get_output(&output.simulation_id)? {
            if stored.run_ticket > output.run_ticket {
                return Ok(WriteOutcome::Stale {
                    stored_ticket: stored.run_ticket,
                });
            }
        }
        self.store.put_output(output)?;
        Ok(WriteOutcome::Written)
    }

    fn publish_fifth_year(&self, project_id: &str, output: &SimulationOutput) -> Result<(), EngineError> {
        let Some(fifth_year) = output.year(SIMULATED_YEARS).copied() else {
            return Ok(());
        };
        self.update_project(project_id, |project| {
            project.revenue_mean_5th_year = Some(fifth_year.mean);
            project.revenue_std_5th_year = Some(fifth_year.std_dev);
        })
    }

    fn update_project<F>(&self, project_id: &str, update: F) -> Result<(), EngineError>
    where
        F: FnOnce(&mut Project),
    {
        let lock = self.project_locks.get(project_id);
        let _guard = lock.lock();
        let mut project = self.load_project(project_id)?;
        update(&mut project);
        self.store.save_project(&project)?;
        Ok(())
    }
}
