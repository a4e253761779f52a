use std::fmt;

use serde::{Deserialize, Serialize};

/// Modeling pipeline a simulation belongs to.
///
/// `Normal` and `Admin` both run the revenue-driver model; `CrossCheck` runs
/// the market-sizing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Track {
    Normal,
    Admin,
    CrossCheck,
}

impl Track {
    pub fn is_revenue_driver(self) -> bool {
        matches!(self, Track::Normal | Track::Admin)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Track::Normal => "normal",
            Track::Admin => "admin",
            Track::CrossCheck => "cross-check",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    pub id: String,
    pub project_id: String,
    pub track: Track,
    pub num_trials: i64,
}
