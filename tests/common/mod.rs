#![allow(dead_code)]

use assert_fs::prelude::*;

pub const PROJECT_YAML: &str = r#"
id: p1
name: Demo
admin_contributor_id: admin
normal_sim_id: p1_normal
admin_sim_id: p1_admin
cross_check_sim_id: p1_cross_check
num_trials: 400
contributors:
  alice:
    cross_check_access: true
  bob: {}
"#;

/// Point-mass revenue factors: deal size 2*100 + 1*300 = 500, 10*year deals,
/// 20% discount, so year `y` earns 4000*y.
pub const BOB_FACTORS_YAML: &str = r#"
willingness_to_pay_standard:
  distribution_type: uniform
  min_val: 100
  max_val: 100
willingness_to_pay_premium:
  distribution_type: uniform
  min_val: 300
  max_val: 300
num_standard_users_per_deal:
  distribution_type: uniform
  min_val: 2
  max_val: 2
num_premium_users_per_deal:
  distribution_type: uniform
  min_val: 1
  max_val: 1
expected_discount_per_deal:
  distribution_type: uniform
  min_val: 0.2
  max_val: 0.2
num_deals_per_year_1:
  distribution_type: uniform
  min_val: 10
  max_val: 10
num_deals_per_year_2:
  distribution_type: uniform
  min_val: 20
  max_val: 20
num_deals_per_year_3:
  distribution_type: uniform
  min_val: 30
  max_val: 30
num_deals_per_year_4:
  distribution_type: uniform
  min_val: 40
  max_val: 40
num_deals_per_year_5:
  distribution_type: uniform
  min_val: 50
  max_val: 50
"#;

pub const ALICE_FACTORS_YAML: &str = r#"
willingness_to_pay_standard:
  distribution_type: triangular
  min_val: 80
  mode: 100
  max_val: 150
willingness_to_pay_premium:
  distribution_type: normal
  min_val: 200
  max_val: 400
num_standard_users_per_deal:
  distribution_type: uniform
  min_val: 1
  max_val: 5
num_premium_users_per_deal:
  distribution_type: uniform
  min_val: 0
  max_val: 2
expected_discount_per_deal:
  distribution_type: uniform
  min_val: 0
  max_val: 0.3
num_deals_per_year_1:
  distribution_type: uniform
  min_val: 5
  max_val: 15
num_deals_per_year_2:
  distribution_type: uniform
  min_val: 10
  max_val: 25
num_deals_per_year_3:
  distribution_type: uniform
  min_val: 15
  max_val: 35
num_deals_per_year_4:
  distribution_type: uniform
  min_val: 20
  max_val: 45
num_deals_per_year_5:
  distribution_type: uniform
  min_val: 25
  max_val: 55
initial_market_size:
  distribution_type: uniform
  min_val: 1000000
  max_val: 1000000
yoy_growth_rate:
  distribution_type: uniform
  min_val: 0
  max_val: 0
"#;

/// A data directory holding the demo project.
pub fn data_dir_with_project() -> assert_fs::TempDir {
    let data_dir = assert_fs::TempDir::new().unwrap();
    data_dir.child("projects").create_dir_all().unwrap();
    data_dir
        .child("projects/p1.yaml")
        .write_str(PROJECT_YAML)
        .unwrap();
    data_dir
}

pub fn factors_file(name: &str, contents: &str) -> assert_fs::NamedTempFile {
    let file = assert_fs::NamedTempFile::new(name).unwrap();
    file.write_str(contents).unwrap();
    file
}

pub fn submit(data_dir: &assert_fs::TempDir, contributor: &str, factors: &assert_fs::NamedTempFile) {
    let mut cmd = assert_cmd::cargo_bin_cmd!("revenue-forecasts");
    cmd.args(["submit", "-p", "p1", "-c", contributor, "--seed", "7", "-f"])
        .arg(factors.path())
        .arg("--data-dir")
        .arg(data_dir.path());
    cmd.assert().success();
}
