mod common;

use assert_fs::prelude::*;
use common::{
    ALICE_FACTORS_YAML, BOB_FACTORS_YAML, data_dir_with_project, factors_file, submit,
};
use predicates::prelude::*;

#[test]
fn submit_writes_output_and_updates_project() {
    let data_dir = data_dir_with_project();
    let factors = factors_file("bob.yaml", BOB_FACTORS_YAML);
    let receipt = assert_fs::NamedTempFile::new("receipt.yaml").unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("revenue-forecasts");
    cmd.args(["submit", "-p", "p1", "-c", "bob", "-f"])
        .arg(factors.path())
        .arg("-o")
        .arg(receipt.path())
        .arg("--data-dir")
        .arg(data_dir.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("stored for normal simulation p1_normal"))
        .stdout(predicate::str::contains("5 | 20000.00 | 20000.00 | 0.00"));

    data_dir
        .child("model_variables/p1_normal/bob.yaml")
        .assert(predicate::path::exists());
    data_dir
        .child("outputs/p1_normal.yaml")
        .assert(predicate::str::contains("summary_statistics"));
    data_dir
        .child("projects/p1.yaml")
        .assert(predicate::str::contains("revenue_mean_5th_year: 20000.0"));
    receipt.assert(predicate::str::contains("simulation_id: p1_normal"));
}

#[test]
fn cross_check_contributor_also_runs_market_sizing() {
    let data_dir = data_dir_with_project();
    let factors = factors_file("alice.yaml", ALICE_FACTORS_YAML);

    let mut cmd = assert_cmd::cargo_bin_cmd!("revenue-forecasts");
    cmd.args(["submit", "-p", "p1", "-c", "alice", "--seed", "3", "-f"])
        .arg(factors.path())
        .arg("--data-dir")
        .arg(data_dir.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Simulation: p1_cross_check"))
        .stdout(predicate::str::contains("1 | 1000000.00 | 1000000.00 | 0.00"));

    data_dir
        .child("outputs/p1_cross_check.yaml")
        .assert(predicate::path::exists());
}

#[test]
fn unknown_contributor_is_rejected_without_writing() {
    let data_dir = data_dir_with_project();
    let factors = factors_file("mallory.yaml", BOB_FACTORS_YAML);

    let mut cmd = assert_cmd::cargo_bin_cmd!("revenue-forecasts");
    cmd.args(["submit", "-p", "p1", "-c", "mallory", "-f"])
        .arg(factors.path())
        .arg("--data-dir")
        .arg(data_dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("contributor mallory in project p1 not found"));

    data_dir
        .child("outputs/p1_normal.yaml")
        .assert(predicate::path::missing());
}

#[test]
fn unsupported_distribution_is_reported() {
    let data_dir = data_dir_with_project();
    let factors = factors_file(
        "bad.yaml",
        &BOB_FACTORS_YAML.replacen(
            "distribution_type: uniform\n  min_val: 100",
            "distribution_type: lognormal\n  min_val: 100",
            1,
        ),
    );

    let mut cmd = assert_cmd::cargo_bin_cmd!("revenue-forecasts");
    cmd.args(["submit", "-p", "p1", "-c", "bob", "-f"])
        .arg(factors.path())
        .arg("--data-dir")
        .arg(data_dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to submit factors"))
        .stderr(predicate::str::contains("lognormal"));
}

#[test]
fn trial_limit_is_enforced() {
    let data_dir = data_dir_with_project();
    let factors = factors_file("bob.yaml", BOB_FACTORS_YAML);

    let mut cmd = assert_cmd::cargo_bin_cmd!("revenue-forecasts");
    cmd.args(["submit", "-p", "p1", "-c", "bob", "--max-trials", "100", "-f"])
        .arg(factors.path())
        .arg("--data-dir")
        .arg(data_dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the configured maximum of 100"));
}

#[test]
fn run_and_report_use_stored_submissions() {
    let data_dir = data_dir_with_project();
    let factors = factors_file("bob.yaml", BOB_FACTORS_YAML);
    submit(&data_dir, "bob", &factors);

    let mut run = assert_cmd::cargo_bin_cmd!("revenue-forecasts");
    run.args(["run", "-p", "p1", "-t", "normal", "--data-dir"])
        .arg(data_dir.path());
    run.assert()
        .success()
        .stdout(predicate::str::contains("1 | 4000.00"));

    let mut report = assert_cmd::cargo_bin_cmd!("revenue-forecasts");
    report
        .args(["report", "-p", "p1", "--data-dir"])
        .arg(data_dir.path());
    report
        .assert()
        .success()
        .stdout(predicate::str::contains("Simulation: p1_normal"))
        .stdout(predicate::str::contains("3 | 12000.00"));

    let mut missing = assert_cmd::cargo_bin_cmd!("revenue-forecasts");
    missing
        .args(["report", "-p", "p1", "-t", "admin", "--data-dir"])
        .arg(data_dir.path());
    missing
        .assert()
        .failure()
        .stderr(predicate::str::contains("output of simulation p1_admin not found"));
}
