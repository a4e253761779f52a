use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_TRIALS: usize = 5_000_000;
pub const DEFAULT_RUN_DEADLINE: &str = "5m";
pub const DEFAULT_AGGREGATE_SAMPLES: usize = 100_000;
pub const DEFAULT_HISTOGRAM_BINS: usize = 100;

#[derive(Error, Debug)]
pub enum EngineConfigError {
    #[error("failed to read engine config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse engine config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid duration {0:?} (expected e.g. 500ms, 30s, 5m or 1h)")]
    InvalidDuration(String),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

/// Tunables for the simulation engine. Every field has a default so a config
/// file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub max_trials: usize,
    pub run_deadline: String,
    pub worker_threads: Option<usize>,
    pub aggregate_samples: usize,
    pub histogram_bins: usize,
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_trials: DEFAULT_MAX_TRIALS,
            run_deadline: DEFAULT_RUN_DEADLINE.to_string(),
            worker_threads: None,
            aggregate_samples: DEFAULT_AGGREGATE_SAMPLES,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn run_deadline(&self) -> Result<Duration, EngineConfigError> {
        parse_duration(&self.run_deadline)
            .ok_or_else(|| EngineConfigError::InvalidDuration(self.run_deadline.clone()))
    }

    pub fn validate(&self) -> Result<(), EngineConfigError> {
        if self.max_trials == 0 {
            return Err(EngineConfigError::NotPositive("max_trials"));
        }
        if self.aggregate_samples == 0 {
            return Err(EngineConfigError::NotPositive("aggregate_samples"));
        }
        if self.histogram_bins == 0 {
            return Err(EngineConfigError::NotPositive("histogram_bins"));
        }
        self.run_deadline().map(|_| ())
    }
}

pub fn load_engine_config_from_yaml_file<P: AsRef<Path>>(
    path: P,
) -> Result<EngineConfig, EngineConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| EngineConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EngineConfig =
        serde_yaml::from_str(&contents).map_err(|source| EngineConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

/// Parse a duration string like "5m", "1h", "30s" or "250ms". A bare number is
/// taken as seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.trim().parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.trim().parse().ok()?;
        Some(Duration::from_secs(n))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.trim().parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.trim().parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_secs(n))
    }
}
