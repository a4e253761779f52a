use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::model_variables::ModelVariables;
use crate::domain::project::Project;
use crate::services::simulation_types::SimulationOutput;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid identifier {0:?} (allowed: letters, digits, '_', '.', '@', '-')")]
    InvalidIdentifier(String),
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Document storage the simulation engine reads from and writes to.
///
/// Implementations only need per-call atomicity; ordering of competing output
/// writes is handled by the engine. That ordering is enforced with in-process
/// locks, so a store must be written by a single engine process at a time.
/// Two processes sharing one store can still interleave their stale-output
/// checks and let an older output land last.
pub trait SimulationStore: Send + Sync {
    fn get_project(&self, project_id: &str) -> Result<Option<Project>, StoreError>;

    fn save_project(&self, project: &Project) -> Result<(), StoreError>;

    fn get_model_variables(
        &self,
        simulation_id: &str,
        contributor_id: &str,
    ) -> Result<Option<ModelVariables>, StoreError>;

    /// Creates or wholesale replaces a contributor's submission.
    fn upsert_model_variables(&self, model_variables: &ModelVariables) -> Result<(), StoreError>;

    /// All submissions for a simulation, ordered by contributor id.
    fn list_model_variables(&self, simulation_id: &str) -> Result<Vec<ModelVariables>, StoreError>;

    fn get_output(&self, simulation_id: &str) -> Result<Option<SimulationOutput>, StoreError>;

    /// Creates or fully replaces the output for `output.simulation_id`.
    fn put_output(&self, output: &SimulationOutput) -> Result<(), StoreError>;
}

/// Identifiers double as file names in the YAML store, so they are limited to
/// a conservative character set.
pub fn validate_identifier(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(id.to_string()))
    }
}
