use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

use crate::domain::model_variables::ModelVariables;
use crate::domain::project::Project;
use crate::services::simulation_types::SimulationOutput;
use crate::services::store::{SimulationStore, StoreError};

#[derive(Default)]
struct Documents {
    projects: HashMap<String, Project>,
    // simulation id -> contributor id -> submission
    model_variables: HashMap<String, BTreeMap<String, ModelVariables>>,
    outputs: HashMap<String, SimulationOutput>,
}

/// Process-local store, used for embedding and tests.
#[derive(Default)]
pub struct InMemoryStore {
    documents: RwLock<Documents>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(project: Project) -> Self {
        let store = Self::new();
        store
            .documents
            .write()
            .projects
            .insert(project.id.clone(), project);
        store
    }
}

impl SimulationStore for InMemoryStore {
    fn get_project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.documents.read().projects.get(project_id).cloned())
    }

    fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        self.documents
            .write()
            .projects
            .insert(project.id.clone(), project.clone());
        Ok(())
    }

    fn get_model_variables(
        &self,
        simulation_id: &str,
        contributor_id: &str,
    ) -> Result<Option<ModelVariables>, StoreError> {
        Ok(self
            .documents
            .read()
            .model_variables
            .get(simulation_id)
            .and_then(|by_contributor| by_contributor.get(contributor_id))
            .cloned())
    }

    fn upsert_model_variables(&self, model_variables: &ModelVariables) -> Result<(), StoreError> {
        self.documents
            .write()
            .model_variables
            .entry(model_variables.simulation_id.clone())
            .or_default()
            .insert(
                model_variables.contributor_id.clone(),
                model_variables.clone(),
            );
        Ok(())
    }

    fn list_model_variables(&self, simulation_id: &str) -> Result<Vec<ModelVariables>, StoreError> {
        Ok(self
            .documents
            .read()
            .model_variables
            .get(simulation_id)
            .map(|by_contributor| by_contributor.values().cloned().collect())
            .unwrap_or_default())
    }

    fn get_output(&self, simulation_id: &str) -> Result<Option<SimulationOutput>, StoreError> {
        Ok(self.documents.read().outputs.get(simulation_id).cloned())
    }

    fn put_output(&self, output: &SimulationOutput) -> Result<(), StoreError> {
        self.documents
            .write()
            .outputs
            .insert(output.simulation_id.clone(), output.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::uniform_revenue_variables;

    #[test]
    fn upsert_replaces_submission_wholesale() {
        let store = InMemoryStore::new();
        let first = uniform_revenue_variables("alice", "sim");
        store.upsert_model_variables(&first).unwrap();

        let mut second = first.clone();
        second.factors.retain(|name, _| name == "willingness_to_pay_standard");
        store.upsert_model_variables(&second).unwrap();

        let stored = store.get_model_variables("sim", "alice").unwrap().unwrap();
        assert_eq!(stored.factors.len(), 1);
    }

    #[test]
    fn list_model_variables_is_ordered_by_contributor() {
        let store = InMemoryStore::new();
        for contributor in ["carol", "alice", "bob"] {
            store
                .upsert_model_variables(&uniform_revenue_variables(contributor, "sim"))
                .unwrap();
        }
        store
            .upsert_model_variables(&uniform_revenue_variables("dave", "other"))
            .unwrap();

        let ids: Vec<String> = store
            .list_model_variables("sim")
            .unwrap()
            .into_iter()
            .map(|mv| mv.contributor_id)
            .collect();
        assert_eq!(ids, vec!["alice", "bob", "carol"]);
        assert!(store.list_model_variables("missing").unwrap().is_empty());
    }
}
