//! Integration tests for the `staycal` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to run the disabled, select, and
//! check subcommands against the listing fixture. Every run pins `--now` to
//! 2025-08-01 10:00 Lisbon time so results do not depend on the system clock.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

const NOW: &str = "2025-08-01T10:00:00";

/// Helper: path to the listing.json fixture.
fn listing_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/listing.json")
}

fn listing_json() -> String {
    std::fs::read_to_string(listing_path()).expect("listing.json fixture must exist")
}

fn staycal(args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("staycal").unwrap();
    cmd.args(args).args(["-c", listing_path(), "--now", NOW]);
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// disabled
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn disabled_lists_notice_and_blocked_days() {
    // 08-01: 15:00 check-in is inside the 24h notice. 08-11: blocked.
    staycal(&["disabled", "--from", "2025-08-01", "--to", "2025-08-12"])
        .assert()
        .success()
        .stdout("2025-08-01\n2025-08-11\n");
}

#[test]
fn disabled_json_output() {
    let output = staycal(&["disabled", "--from", "2025-08-01", "--to", "2025-08-12", "--json"])
        .output()
        .expect("disabled should run");
    assert!(output.status.success());

    let days: Vec<String> = serde_json::from_slice(&output.stdout).expect("stdout must be JSON");
    assert_eq!(days, vec!["2025-08-01", "2025-08-11"]);
}

#[test]
fn disabled_with_pending_check_in_applies_checkout_rules() {
    let output = staycal(&[
        "disabled",
        "--from",
        "2025-08-12",
        "--to",
        "2025-08-24",
        "--check-in",
        "2025-08-12",
        "--json",
    ])
    .output()
    .expect("disabled should run");
    assert!(output.status.success());

    let days: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    // 13th: one night only. 17th/24th: Sunday check-out. 21st/22nd: behind
    // the booking starting on the 20th, which itself is a fine check-out.
    assert_eq!(
        days,
        vec!["2025-08-13", "2025-08-17", "2025-08-21", "2025-08-22", "2025-08-24"]
    );
}

#[test]
fn disabled_accepts_utc_instant_for_now() {
    // 09:00 UTC is 10:00 in Lisbon in August.
    Command::cargo_bin("staycal")
        .unwrap()
        .args([
            "disabled",
            "--from",
            "2025-08-01",
            "--to",
            "2025-08-12",
            "-c",
            listing_path(),
            "--now",
            "2025-08-01T09:00:00Z",
        ])
        .assert()
        .success()
        .stdout("2025-08-01\n2025-08-11\n");
}

#[test]
fn config_from_stdin() {
    Command::cargo_bin("staycal")
        .unwrap()
        .args(["disabled", "--from", "2025-08-10", "--to", "2025-08-12", "--now", NOW])
        .write_stdin(listing_json())
        .assert()
        .success()
        .stdout("2025-08-11\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// select
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn select_jumps_past_blocked_day() {
    staycal(&["select", "--clicks", "2025-08-10,2025-08-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-08-10 -> check-in 2025-08-10"))
        .stdout(predicate::str::contains("emitted 2025-08-11 / -"))
        .stdout(predicate::str::contains("final: check-in 2025-08-11"));
}

#[test]
fn select_reports_ignored_clicks() {
    // Sunday check-out is restricted.
    staycal(&["select", "--clicks", "2025-08-12,2025-08-17"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-08-17 -> check-in 2025-08-12 (ignored)"));
}

#[test]
fn select_json_output() {
    let output = staycal(&["select", "--clicks", "2025-08-12, 2025-08-14", "--json"])
        .output()
        .expect("select should run");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["final"],
        serde_json::json!({"phase": "complete", "from": "2025-08-12", "to": "2025-08-14"})
    );
    assert_eq!(value["steps"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        value["steps"][1]["emitted"],
        serde_json::json!({"checkIn": "2025-08-12", "checkOut": "2025-08-14"})
    );
}

#[test]
fn select_with_seed_starts_complete() {
    staycal(&[
        "select",
        "--seed-in",
        "2025-08-12",
        "--seed-out",
        "2025-08-14",
        "--clicks",
        "2025-08-25",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("final: check-in 2025-08-25"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_bookable_range() {
    staycal(&["check", "--from", "2025-08-12", "--to", "2025-08-14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bookable: 2025-08-12 -> 2025-08-14 (2 nights)"));
}

#[test]
fn check_range_crossing_booking_fails() {
    staycal(&["check", "--from", "2025-08-10", "--to", "2025-08-15"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not bookable"))
        .stdout(predicate::str::contains("range crosses unavailable nights"));
}

#[test]
fn check_json_reports_each_rule() {
    let output = staycal(&["check", "--from", "2025-08-12", "--to", "2025-08-17", "--json"])
        .output()
        .expect("check should run");
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["nights"], 5);
    assert_eq!(value["checkInAvailable"], true);
    assert_eq!(value["validLength"], false);
    assert_eq!(value["freeOfBlockedNights"], true);
    assert_eq!(value["bookable"], false);
}

#[test]
fn check_blocked_check_in_fails() {
    // Only the check-in day (08-11) is blocked; the night of 08-12 is free.
    staycal(&["check", "--from", "2025-08-11", "--to", "2025-08-13"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not bookable: 2025-08-11 -> 2025-08-13"))
        .stdout(predicate::str::contains("check-in day is not available"));
}

#[test]
fn check_booked_check_in_fails() {
    Command::cargo_bin("staycal")
        .unwrap()
        .args(["check", "--from", "2025-08-10", "--to", "2025-08-12", "--now", NOW])
        .write_stdin(r#"{"calendar":{"bookedDates":["2025-08-10"]}}"#)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not bookable"))
        .stdout(predicate::str::contains("check-in day is not available"));
}

#[test]
fn check_past_range_fails() {
    staycal(&["check", "--from", "2020-01-01", "--to", "2020-01-03"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not bookable: 2020-01-01 -> 2020-01-03"))
        .stdout(predicate::str::contains("check-in day is not available"));
}

#[test]
fn check_out_beyond_window_fails() {
    // 90-day window from 08-01 ends on 10-30.
    staycal(&["check", "--from", "2025-10-29", "--to", "2025-10-31"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("check-out day is beyond the booking window"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn malformed_config_fails() {
    Command::cargo_bin("staycal")
        .unwrap()
        .args(["check", "--from", "2025-08-12", "--to", "2025-08-14", "--now", NOW])
        .write_stdin("{ this is not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse listing config"));
}

#[test]
fn malformed_day_fails() {
    staycal(&["check", "--from", "2025-13-40", "--to", "2025-08-14"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid day"));
}

#[test]
fn missing_config_file_fails() {
    Command::cargo_bin("staycal")
        .unwrap()
        .args(["check", "--from", "2025-08-12", "--to", "2025-08-14", "-c", "/nonexistent/listing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}
