use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::factor::FactorSpec;

/// All factor specs one contributor submitted for one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVariables {
    pub contributor_id: String,
    pub simulation_id: String,
    pub factors: BTreeMap<String, FactorSpec>,
}

impl ModelVariables {
    pub fn new(
        contributor_id: &str,
        simulation_id: &str,
        factors: BTreeMap<String, FactorSpec>,
    ) -> Self {
        Self {
            contributor_id: contributor_id.to_string(),
            simulation_id: simulation_id.to_string(),
            factors,
        }
    }

    pub fn factor(&self, name: &str) -> Option<&FactorSpec> {
        self.factors.get(name)
    }
}
