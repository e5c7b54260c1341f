use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("covid").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("covid"))
        .stdout(predicate::str::contains("dashboard"));
}

#[test]
fn empty_country_code_is_rejected() {
    let mut cmd = Command::cargo_bin("covid").unwrap();
    // Unroutable base URL: parsing fails before any request is made.
    cmd.args(["--base-url", "http://127.0.0.1:9", "summary", "--country", " "]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn dashboard_survives_unreachable_api() {
    let mut cmd = Command::cargo_bin("covid").unwrap();
    cmd.args(["--base-url", "http://127.0.0.1:9", "dashboard", "--kind", "deaths"]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Initial load failed"))
        .stdout(predicate::str::contains("\"stat_kind\": \"deaths\""));
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn summary_online_us() {
    let mut cmd = Command::cargo_bin("covid").unwrap();
    cmd.args(["summary", "--country", "US"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Coronavirus Cases"));
}
