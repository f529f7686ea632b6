use assert_cmd::Command;
use predicates::prelude::*;

fn ratesim() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ratesim"));
    cmd.env("RATESYNC_LOG_STDERR", "0");
    cmd
}

#[test]
fn create_config_json_outputs_default_profile() {
    ratesim()
        .args(["create", "config-json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rate_control\""))
        .stdout(predicate::str::contains("\"feedback_gain\": 0.005"))
        .stdout(predicate::str::contains("\"capacity\": 4096"));
}

#[test]
fn default_run_prints_summary_and_graph() {
    ratesim()
        .assert()
        .success()
        .stdout(predicate::str::contains("Rate Control Simulator"))
        .stdout(predicate::str::contains("Results after 3000 frames:"))
        .stdout(predicate::str::contains("Final buffer: 50.0%"))
        .stdout(predicate::str::contains("<- target"));
}

#[test]
fn quiet_run_skips_graph() {
    ratesim()
        .args(["--quiet", "--frames", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Results after 100 frames:"))
        .stdout(predicate::str::contains("<- target").not());
}

#[test]
fn json_output_parses() {
    let output = ratesim()
        .args(["--json", "--frames", "50"])
        .output()
        .expect("run ratesim");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(value["result"]["fill_history"].as_array().map(Vec::len), Some(50));
    assert_eq!(value["equilibrium"]["reachable"], serde_json::Value::Bool(true));
    assert_eq!(value["profile"]["simulation"]["frames"], 50);
}

#[test]
fn strict_fails_when_buffer_drains() {
    // Believing the display runs at core speed leaves a drift the default
    // gain cannot cover.
    ratesim()
        .args(["--strict", "--quiet", "--measured-display", "60.10"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("UNREACHABLE"))
        .stdout(predicate::str::contains("samples/frame at the nearest bound"));
}

#[test]
fn strict_passes_on_default_scenario() {
    ratesim().args(["--strict", "--quiet"]).assert().success();
}

#[test]
fn invalid_clamp_is_rejected() {
    ratesim().args(["--clamp", "1.0"]).assert().failure();
}

#[test]
fn sweep_prints_one_row_per_gain() {
    ratesim()
        .args(["sweep", "--gains", "0.005,0.02", "--frames", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gain | final %"))
        .stdout(predicate::str::contains(" 0.0050 |"))
        .stdout(predicate::str::contains(" 0.0200 |"));
}

#[test]
fn measure_reports_synthetic_display() {
    ratesim()
        .args(["measure", "--hz", "59.71", "--jitter-us", "0", "--drop-probability", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synthetic display: 59.710 Hz"))
        .stdout(predicate::str::contains("Sync mode:"));
}

#[test]
fn measure_survives_extreme_refresh_rate() {
    ratesim()
        .args(["measure", "--hz", "1e-300", "--samples", "3", "--frames", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Measured:          not stable"));
}

#[test]
fn config_file_values_are_used_and_flags_override() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("profile.json");
    std::fs::write(
        &path,
        r#"{"rate_control": {"feedback_gain": 0.02}, "simulation": {"frames": 120}}"#,
    )
    .expect("write profile");

    ratesim()
        .args(["--quiet", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("d parameter: 0.02"))
        .stdout(predicate::str::contains("Results after 120 frames:"));

    ratesim()
        .args(["--quiet", "--frames", "30", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Results after 30 frames:"));
}

#[test]
fn missing_config_file_fails() {
    ratesim()
        .args(["--config", "/nonexistent/ratesim-profile.json"])
        .assert()
        .failure();
}
