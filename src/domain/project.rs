use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::simulation::{Simulation, Track};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorAccess {
    #[serde(default)]
    pub cross_check_access: bool,
    #[serde(default)]
    pub form_submitted: bool,
}

/// Project record as seen by the simulation engine. Creation and sharing are
/// handled elsewhere; the engine only writes the derived revenue fields and the
/// `form_submitted` flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub admin_contributor_id: String,
    pub normal_sim_id: String,
    #[serde(default)]
    pub admin_sim_id: Option<String>,
    #[serde(default)]
    pub cross_check_sim_id: Option<String>,
    pub num_trials: i64,
    #[serde(default)]
    pub contributors: BTreeMap<String, ContributorAccess>,
    #[serde(default)]
    pub revenue_mean_5th_year: Option<f64>,
    #[serde(default)]
    pub revenue_std_5th_year: Option<f64>,
}

impl Project {
    pub fn simulation_id(&self, track: Track) -> Option<&str> {
        match track {
            Track::Normal => Some(self.normal_sim_id.as_str()),
            Track::Admin => self.admin_sim_id.as_deref(),
            Track::CrossCheck => self.cross_check_sim_id.as_deref(),
        }
    }

    pub fn simulation(&self, track: Track) -> Option<Simulation> {
        self.simulation_id(track).map(|id| Simulation {
            id: id.to_string(),
            project_id: self.id.clone(),
            track,
            num_trials: self.num_trials,
        })
    }

    /// Revenue-driver track a contributor's submission is routed to.
    pub fn revenue_track_for(&self, contributor_id: &str) -> Track {
        if self.admin_contributor_id == contributor_id {
            Track::Admin
        } else {
            Track::Normal
        }
    }

    /// Access flags for a contributor. The admin is always a member, even
    /// when not listed explicitly.
    pub fn access_for(&self, contributor_id: &str) -> Option<ContributorAccess> {
        match self.contributors.get(contributor_id) {
            Some(access) => Some(access.clone()),
            None if self.admin_contributor_id == contributor_id => {
                Some(ContributorAccess::default())
            }
            None => None,
        }
    }
}
