use std::collections::BTreeMap;

use crate::domain::factor::{
    EXPECTED_DISCOUNT_PER_DEAL, FactorSpec, INITIAL_MARKET_SIZE, NUM_PREMIUM_USERS_PER_DEAL,
    NUM_STANDARD_USERS_PER_DEAL, SIMULATED_YEARS, WILLINGNESS_TO_PAY_PREMIUM,
    WILLINGNESS_TO_PAY_STANDARD, YOY_GROWTH_RATE, num_deals_per_year,
};
use crate::domain::model_variables::ModelVariables;
use crate::domain::project::{ContributorAccess, Project};

fn factor_map(specs: Vec<FactorSpec>) -> BTreeMap<String, FactorSpec> {
    specs
        .into_iter()
        .map(|spec| (spec.name.clone(), spec))
        .collect()
}

/// Project "admin" administers; "alice" may cross-check, "bob" may not.
pub fn build_project(id: &str, num_trials: i64) -> Project {
    let mut contributors = BTreeMap::new();
    contributors.insert("admin".to_string(), ContributorAccess::default());
    contributors.insert(
        "alice".to_string(),
        ContributorAccess {
            cross_check_access: true,
            form_submitted: false,
        },
    );
    contributors.insert("bob".to_string(), ContributorAccess::default());
    Project {
        id: id.to_string(),
        name: format!("Project {id}"),
        admin_contributor_id: "admin".to_string(),
        normal_sim_id: format!("{id}_normal"),
        admin_sim_id: Some(format!("{id}_admin")),
        cross_check_sim_id: Some(format!("{id}_cross_check")),
        num_trials,
        contributors,
        revenue_mean_5th_year: None,
        revenue_std_5th_year: None,
    }
}

/// Revenue factors fixed at: 2 standard users, 1 premium user and
/// `10 * year` deals per year.
pub fn point_mass_revenue_factors(
    wtp_standard: f64,
    wtp_premium: f64,
    discount: f64,
) -> BTreeMap<String, FactorSpec> {
    let mut specs = vec![
        FactorSpec::point_mass(WILLINGNESS_TO_PAY_STANDARD, wtp_standard),
        FactorSpec::point_mass(WILLINGNESS_TO_PAY_PREMIUM, wtp_premium),
        FactorSpec::point_mass(NUM_STANDARD_USERS_PER_DEAL, 2.0),
        FactorSpec::point_mass(NUM_PREMIUM_USERS_PER_DEAL, 1.0),
        FactorSpec::point_mass(EXPECTED_DISCOUNT_PER_DEAL, discount),
    ];
    for year in 1..=SIMULATED_YEARS {
        specs.push(FactorSpec::point_mass(
            &num_deals_per_year(year),
            10.0 * year as f64,
        ));
    }
    factor_map(specs)
}

pub fn point_mass_revenue_variables(
    contributor_id: &str,
    simulation_id: &str,
    wtp_standard: f64,
    wtp_premium: f64,
    discount: f64,
) -> ModelVariables {
    ModelVariables::new(
        contributor_id,
        simulation_id,
        point_mass_revenue_factors(wtp_standard, wtp_premium, discount),
    )
}

pub fn uniform_revenue_variables(contributor_id: &str, simulation_id: &str) -> ModelVariables {
    let mut specs = vec![
        FactorSpec::uniform(WILLINGNESS_TO_PAY_STANDARD, 80.0, 120.0),
        FactorSpec::uniform(WILLINGNESS_TO_PAY_PREMIUM, 150.0, 250.0),
        FactorSpec::uniform(NUM_STANDARD_USERS_PER_DEAL, 5.0, 15.0),
        FactorSpec::uniform(NUM_PREMIUM_USERS_PER_DEAL, 1.0, 3.0),
        FactorSpec::uniform(EXPECTED_DISCOUNT_PER_DEAL, 0.0, 0.3),
    ];
    for year in 1..=SIMULATED_YEARS {
        let base = 10.0 * year as f64;
        specs.push(FactorSpec::uniform(
            &num_deals_per_year(year),
            base,
            base + 10.0,
        ));
    }
    ModelVariables::new(contributor_id, simulation_id, factor_map(specs))
}

pub fn market_variables(
    contributor_id: &str,
    initial_market_size: FactorSpec,
    yoy_growth_rate: FactorSpec,
) -> ModelVariables {
    ModelVariables::new(
        contributor_id,
        "cross_check",
        factor_map(vec![initial_market_size, yoy_growth_rate]),
    )
}

/// Point-mass revenue factors plus point-mass market-sizing factors, as a
/// contributor with cross-check access submits them.
pub fn point_mass_submission(
    wtp_standard: f64,
    initial_market_size: f64,
    growth_rate: f64,
) -> BTreeMap<String, FactorSpec> {
    let mut factors = point_mass_revenue_factors(wtp_standard, 0.0, 0.0);
    factors.extend(factor_map(vec![
        FactorSpec::point_mass(INITIAL_MARKET_SIZE, initial_market_size),
        FactorSpec::point_mass(YOY_GROWTH_RATE, growth_rate),
    ]));
    factors
}
