use std::collections::BTreeMap;
use std::io;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::factor::{FactorParams, FactorSpec};

#[derive(Error, Debug)]
pub enum FactorsYamlError {
    #[error("failed to read factors yaml: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse factors yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("factors yaml contains no factors")]
    Empty,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FactorRecord {
    distribution_type: String,
    min_val: Option<f64>,
    max_val: Option<f64>,
    mean: Option<f64>,
    stddev: Option<f64>,
    mode: Option<f64>,
}

/// Loads a factor submission: a mapping from factor name to its distribution
/// definition.
///
/// ```yaml
/// willingness_to_pay_standard:
///   distribution_type: triangular
///   min_val: 80
///   mode: 100
///   max_val: 150
/// ```
pub fn load_factors_from_yaml_file(
    path: &str,
) -> Result<BTreeMap<String, FactorSpec>, FactorsYamlError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_factors_from_yaml_str(&contents)
}

pub fn deserialize_factors_from_yaml_str(
    input: &str,
) -> Result<BTreeMap<String, FactorSpec>, FactorsYamlError> {
    let records: BTreeMap<String, FactorRecord> = serde_yaml::from_str(input)?;
    if records.is_empty() {
        return Err(FactorsYamlError::Empty);
    }
    Ok(records
        .into_iter()
        .map(|(name, record)| {
            let spec = FactorSpec {
                name: name.clone(),
                distribution_type: record.distribution_type,
                params: FactorParams {
                    min_val: record.min_val,
                    max_val: record.max_val,
                    mean: record.mean,
                    stddev: record.stddev,
                    mode: record.mode,
                },
            };
            (name, spec)
        })
        .collect())
}
