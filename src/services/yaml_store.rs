use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::domain::model_variables::ModelVariables;
use crate::domain::project::Project;
use crate::services::simulation_types::SimulationOutput;
use crate::services::store::{SimulationStore, StoreError, validate_identifier};

const PROJECTS_DIR: &str = "projects";
const MODEL_VARIABLES_DIR: &str = "model_variables";
const OUTPUTS_DIR: &str = "outputs";

/// Stores every document as a YAML file below `root`:
///
/// ```text
/// projects/<project_id>.yaml
/// model_variables/<simulation_id>/<contributor_id>.yaml
/// outputs/<simulation_id>.yaml
/// ```
///
/// Every write lands in its own temporary sibling file that is then renamed
/// over the target, so readers never see a partial document.
pub struct YamlDirectoryStore {
    root: PathBuf,
}

impl YamlDirectoryStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_path(&self, project_id: &str) -> Result<PathBuf, StoreError> {
        validate_identifier(project_id)?;
        Ok(self.root.join(PROJECTS_DIR).join(format!("{project_id}.yaml")))
    }

    fn model_variables_dir(&self, simulation_id: &str) -> Result<PathBuf, StoreError> {
        validate_identifier(simulation_id)?;
        Ok(self.root.join(MODEL_VARIABLES_DIR).join(simulation_id))
    }

    fn model_variables_path(
        &self,
        simulation_id: &str,
        contributor_id: &str,
    ) -> Result<PathBuf, StoreError> {
        validate_identifier(contributor_id)?;
        Ok(self
            .model_variables_dir(simulation_id)?
            .join(format!("{contributor_id}.yaml")))
    }

    fn output_path(&self, simulation_id: &str) -> Result<PathBuf, StoreError> {
        validate_identifier(simulation_id)?;
        Ok(self.root.join(OUTPUTS_DIR).join(format!("{simulation_id}.yaml")))
    }
}

fn is_yaml_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), StoreError> {
    let yaml = serde_yaml::to_string(document)?;
    let write_error = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(write_error)?;
    // each writer gets its own temp file, so concurrent writers never share one
    let mut temporary = NamedTempFile::new_in(parent).map_err(write_error)?;
    temporary.write_all(yaml.as_bytes()).map_err(write_error)?;
    temporary
        .persist(path)
        .map(|_| ())
        .map_err(|e| write_error(e.error))
}

impl SimulationStore for YamlDirectoryStore {
    fn get_project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        read_document(&self.project_path(project_id)?)
    }

    fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        write_document(&self.project_path(&project.id)?, project)
    }

    fn get_model_variables(
        &self,
        simulation_id: &str,
        contributor_id: &str,
    ) -> Result<Option<ModelVariables>, StoreError> {
        read_document(&self.model_variables_path(simulation_id, contributor_id)?)
    }

    fn upsert_model_variables(&self, model_variables: &ModelVariables) -> Result<(), StoreError> {
        let path = self.model_variables_path(
            &model_variables.simulation_id,
            &model_variables.contributor_id,
        )?;
        write_document(&path, model_variables)
    }

    fn list_model_variables(&self, simulation_id: &str) -> Result<Vec<ModelVariables>, StoreError> {
        let dir = self.model_variables_dir(simulation_id)?;
        let read_dir = match std::fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Read { path: dir, source }),
        };

        let mut files = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| StoreError::Read {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && is_yaml_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        let mut documents = Vec::with_capacity(files.len());
        for path in files {
            if let Some(document) = read_document(&path)? {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    fn get_output(&self, simulation_id: &str) -> Result<Option<SimulationOutput>, StoreError> {
        read_document(&self.output_path(simulation_id)?)
    }

    fn put_output(&self, output: &SimulationOutput) -> Result<(), StoreError> {
        write_document(&self.output_path(&output.simulation_id)?, output)
    }
}
