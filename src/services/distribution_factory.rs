use rand::Rng;
use rand_distr::{Distribution, Normal, Triangular, Uniform};
use thiserror::Error;

use crate::domain::factor::{DistributionType, FactorParams, FactorSpec};
use crate::domain::model_variables::ModelVariables;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    #[error("unsupported distribution type {distribution_type:?} for factor {factor}")]
    UnsupportedDistribution {
        factor: String,
        distribution_type: String,
    },
    #[error("invalid parameters for factor {factor}: {reason}")]
    InvalidParameter { factor: String, reason: String },
    #[error("factor {factor} is missing from the submission of {contributor}")]
    MissingFactor { contributor: String, factor: String },
}

impl DistributionError {
    fn invalid(factor: &str, reason: impl Into<String>) -> Self {
        DistributionError::InvalidParameter {
            factor: factor.to_string(),
            reason: reason.into(),
        }
    }
}

/// A sampleable distribution built from a [`FactorSpec`]. The variant is fixed
/// at construction; sampling has no side effects beyond advancing the RNG.
#[derive(Debug, Clone, Copy)]
pub enum FactorDistribution {
    /// Zero-width uniform or zero-spread normal.
    PointMass(f64),
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
    Triangular(Triangular<f64>),
}

impl FactorDistribution {
    pub fn from_spec(spec: &FactorSpec) -> Result<Self, DistributionError> {
        let kind = DistributionType::parse(&spec.distribution_type).ok_or_else(|| {
            DistributionError::UnsupportedDistribution {
                factor: spec.name.clone(),
                distribution_type: spec.distribution_type.clone(),
            }
        })?;
        match kind {
            DistributionType::Uniform => build_uniform(&spec.name, &spec.params),
            DistributionType::Normal => build_normal(&spec.name, &spec.params),
            DistributionType::Triangular => build_triangular(&spec.name, &spec.params),
        }
    }

    /// Looks up `factor` in a contributor's submission and builds it.
    pub fn for_factor(
        model_variables: &ModelVariables,
        factor: &str,
    ) -> Result<Self, DistributionError> {
        let spec = model_variables
            .factor(factor)
            .ok_or_else(|| DistributionError::MissingFactor {
                contributor: model_variables.contributor_id.clone(),
                factor: factor.to_string(),
            })?;
        Self::from_spec(spec)
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.sample(rng)
    }

    pub fn draw_n<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<f64> {
        (0..count).map(|_| self.sample(rng)).collect()
    }
}

impl Distribution<f64> for FactorDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            FactorDistribution::PointMass(value) => *value,
            FactorDistribution::Uniform(dist) => dist.sample(rng),
            FactorDistribution::Normal(dist) => dist.sample(rng),
            FactorDistribution::Triangular(dist) => dist.sample(rng),
        }
    }
}

fn required(factor: &str, value: Option<f64>, field: &str) -> Result<f64, DistributionError> {
    let value = value.ok_or_else(|| DistributionError::invalid(factor, format!("missing {field}")))?;
    if !value.is_finite() {
        return Err(DistributionError::invalid(
            factor,
            format!("{field} must be finite"),
        ));
    }
    Ok(value)
}

fn build_uniform(factor: &str, params: &FactorParams) -> Result<FactorDistribution, DistributionError> {
    let min_val = required(factor, params.min_val, "min_val")?;
    let max_val = required(factor, params.max_val, "max_val")?;
    if max_val < min_val {
        return Err(DistributionError::invalid(
            factor,
            format!("min_val {min_val} is greater than max_val {max_val}"),
        ));
    }
    if max_val == min_val {
        return Ok(FactorDistribution::PointMass(min_val));
    }
    if !(max_val - min_val).is_finite() {
        return Err(DistributionError::invalid(factor, "range is too wide"));
    }
    Ok(FactorDistribution::Uniform(Uniform::new_inclusive(
        min_val, max_val,
    )))
}

/// A normal factor given as a range is converted with `mean = (min+max)/2` and
/// `stddev = (max-min)/4`. The range takes precedence over explicit
/// `mean`/`stddev` when both bounds are present.
fn build_normal(factor: &str, params: &FactorParams) -> Result<FactorDistribution, DistributionError> {
    let (mean, stddev) = match (params.min_val, params.max_val) {
        (Some(_), Some(_)) => {
            let min_val = required(factor, params.min_val, "min_val")?;
            let max_val = required(factor, params.max_val, "max_val")?;
            if max_val < min_val {
                return Err(DistributionError::invalid(
                    factor,
                    format!("min_val {min_val} is greater than max_val {max_val}"),
                ));
            }
            if !(max_val - min_val).is_finite() {
                return Err(DistributionError::invalid(factor, "range is too wide"));
            }
            ((min_val + max_val) / 2.0, (max_val - min_val) / 4.0)
        }
        _ => (
            required(factor, params.mean, "mean")?,
            required(factor, params.stddev, "stddev")?,
        ),
    };
    if stddev < 0.0 {
        return Err(DistributionError::invalid(
            factor,
            format!("stddev {stddev} is negative"),
        ));
    }
    if stddev == 0.0 {
        return Ok(FactorDistribution::PointMass(mean));
    }
    Normal::new(mean, stddev)
        .map(FactorDistribution::Normal)
        .map_err(|e| DistributionError::invalid(factor, e.to_string()))
}

fn build_triangular(
    factor: &str,
    params: &FactorParams,
) -> Result<FactorDistribution, DistributionError> {
    let min_val = required(factor, params.min_val, "min_val")?;
    let max_val = required(factor, params.max_val, "max_val")?;
    let mode = required(factor, params.mode, "mode")?;
    if max_val <= min_val {
        return Err(DistributionError::invalid(
            factor,
            format!("min_val {min_val} must be strictly below max_val {max_val}"),
        ));
    }
    // sampling multiplies two range-sized terms
    let range = max_val - min_val;
    if !(range * range).is_finite() {
        return Err(DistributionError::invalid(factor, "range is too wide"));
    }
    if mode < min_val || mode > max_val {
        return Err(DistributionError::invalid(
            factor,
            format!("mode {mode} lies outside [{min_val}, {max_val}]"),
        ));
    }
    Triangular::new(min_val, max_val, mode)
        .map(FactorDistribution::Triangular)
        .map_err(|e| DistributionError::invalid(factor, e.to_string()))
}
