use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::simulation::Track;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct YearlyStatistics {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub percentile_5: f64,
    pub percentile_95: f64,
}

/// Persisted result of one simulation run, one entry per simulated year.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationOutput {
    pub simulation_id: String,
    pub summary_statistics: Vec<YearlyStatistics>,
    /// Monotonic per-process ticket taken when the run started. A stored
    /// output is only replaced by a run holding a larger ticket.
    pub run_ticket: u64,
    pub computed_at: DateTime<Utc>,
}

impl SimulationOutput {
    pub fn year(&self, year: usize) -> Option<&YearlyStatistics> {
        year.checked_sub(1)
            .and_then(|index| self.summary_statistics.get(index))
    }
}

/// Histogram of one pooled factor sample. `x_values` are the bin edges and
/// hold one more entry than `y_values` unless the histogram is empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FactorHistogram {
    pub x_values: Vec<f64>,
    pub y_values: Vec<u64>,
}

impl FactorHistogram {
    pub fn is_empty(&self) -> bool {
        self.y_values.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        self.y_values.iter().sum()
    }
}

pub type AggregateHistograms = BTreeMap<String, FactorHistogram>;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CrossCheckReceipt {
    pub simulation_id: String,
    pub output: SimulationOutput,
}

/// What a factor submission produced.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub project_id: String,
    pub contributor_id: String,
    pub simulation_id: String,
    pub track: Track,
    pub output: SimulationOutput,
    pub cross_check: Option<CrossCheckReceipt>,
}
