use serde::{Deserialize, Serialize};

pub const WILLINGNESS_TO_PAY_STANDARD: &str = "willingness_to_pay_standard";
pub const WILLINGNESS_TO_PAY_PREMIUM: &str = "willingness_to_pay_premium";
pub const NUM_STANDARD_USERS_PER_DEAL: &str = "num_standard_users_per_deal";
pub const NUM_PREMIUM_USERS_PER_DEAL: &str = "num_premium_users_per_deal";
pub const EXPECTED_DISCOUNT_PER_DEAL: &str = "expected_discount_per_deal";
pub const INITIAL_MARKET_SIZE: &str = "initial_market_size";
pub const YOY_GROWTH_RATE: &str = "yoy_growth_rate";

/// Number of simulated annual periods.
pub const SIMULATED_YEARS: usize = 5;

/// Name of the deal-count factor for `year` (1-based).
pub fn num_deals_per_year(year: usize) -> String {
    format!("num_deals_per_year_{year}")
}

/// Factors a revenue-driver contributor must supply, in reporting order.
pub fn revenue_driver_factor_names() -> Vec<String> {
    let mut names = vec![
        WILLINGNESS_TO_PAY_STANDARD.to_string(),
        WILLINGNESS_TO_PAY_PREMIUM.to_string(),
        NUM_STANDARD_USERS_PER_DEAL.to_string(),
        NUM_PREMIUM_USERS_PER_DEAL.to_string(),
    ];
    names.extend((1..=SIMULATED_YEARS).map(num_deals_per_year));
    names.push(EXPECTED_DISCOUNT_PER_DEAL.to_string());
    names
}

/// Factors a market-sizing contributor must supply, in reporting order.
pub fn market_sizing_factor_names() -> Vec<String> {
    vec![INITIAL_MARKET_SIZE.to_string(), YOY_GROWTH_RATE.to_string()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionType {
    Uniform,
    Normal,
    Triangular,
}

impl DistributionType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "uniform" => Some(Self::Uniform),
            "normal" => Some(Self::Normal),
            "triangular" => Some(Self::Triangular),
            _ => None,
        }
    }
}

/// Raw distribution parameters as submitted. Which fields are required depends
/// on the distribution type and is checked by the distribution factory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_val: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_val: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stddev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<f64>,
}

/// One contributor's distribution definition for a named factor.
///
/// `distribution_type` is kept as submitted so that an unknown type surfaces
/// as a factory error instead of a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSpec {
    pub name: String,
    pub distribution_type: String,
    #[serde(flatten)]
    pub params: FactorParams,
}

impl FactorSpec {
    pub fn uniform(name: &str, min_val: f64, max_val: f64) -> Self {
        Self {
            name: name.to_string(),
            distribution_type: "uniform".to_string(),
            params: FactorParams {
                min_val: Some(min_val),
                max_val: Some(max_val),
                ..FactorParams::default()
            },
        }
    }

    pub fn normal(name: &str, mean: f64, stddev: f64) -> Self {
        Self {
            name: name.to_string(),
            distribution_type: "normal".to_string(),
            params: FactorParams {
                mean: Some(mean),
                stddev: Some(stddev),
                ..FactorParams::default()
            },
        }
    }

    pub fn triangular(name: &str, min_val: f64, mode: f64, max_val: f64) -> Self {
        Self {
            name: name.to_string(),
            distribution_type: "triangular".to_string(),
            params: FactorParams {
                min_val: Some(min_val),
                max_val: Some(max_val),
                mode: Some(mode),
                ..FactorParams::default()
            },
        }
    }

    /// A uniform spec collapsed onto a single value.
    pub fn point_mass(name: &str, value: f64) -> Self {
        Self::uniform(name, value, value)
    }
}
