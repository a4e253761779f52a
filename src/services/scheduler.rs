//! Bounded worker pool that fans out independent units of work and hands the
//! results back in unit order.

use std::time::{Duration, Instant};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("failed to build worker pool: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("run exceeded its deadline of {budget:?}")]
pub struct DeadlineExceeded {
    pub budget: Duration,
}

/// Wall-clock budget for one run, measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget: Some(budget),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            started: Instant::now(),
            budget: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn check(&self) -> Result<(), DeadlineExceeded> {
        match self.budget {
            Some(budget) if self.started.elapsed() > budget => Err(DeadlineExceeded { budget }),
            _ => Ok(()),
        }
    }
}

pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// `threads = None` sizes the pool to the available CPUs.
    pub fn new(threads: Option<usize>) -> Result<Self, SchedulerError> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("sim-worker-{i}"));
        if let Some(threads) = threads.filter(|count| *count > 0) {
            builder = builder.num_threads(threads);
        }
        Ok(Self {
            pool: builder.build()?,
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `work(0..units)` on the pool. Results come back indexed by unit,
    /// whatever order the workers finished in. The first error wins and the
    /// deadline is checked before each unit starts and once all have finished.
    pub fn run_ordered<T, E, F>(&self, units: usize, deadline: &Deadline, work: F) -> Result<Vec<T>, E>
    where
        T: Send,
        E: Send + From<DeadlineExceeded>,
        F: Fn(usize) -> Result<T, E> + Sync + Send,
    {
        debug!(units, threads = self.threads(), "dispatching work units");
        let results = self.pool.install(|| {
            (0..units)
                .into_par_iter()
                .map(|unit| {
                    deadline.check()?;
                    work(unit)
                })
                .collect::<Result<Vec<T>, E>>()
        })?;
        deadline.check()?;
        Ok(results)
    }
}
