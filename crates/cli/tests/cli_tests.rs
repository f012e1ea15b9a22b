//! CLI integration tests

use std::process::Command;

fn run_ocp(args: &[&str]) -> std::process::Output {
    let mut command = Command::new("cargo");
    command.args(["run", "-p", "occupancy-cli", "--quiet", "--"]);
    command.args(args);
    command.output().expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = run_ocp(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Occupancy prediction"),
        "Should show app description"
    );
    assert!(stdout.contains("range"), "Should show range command");
    assert!(stdout.contains("day"), "Should show day command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = run_ocp(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("ocp"), "Should show binary name");
}

/// Wrong argument count prints usage and exits 1
#[test]
fn test_range_missing_arguments_exits_one() {
    let output = run_ocp(&["range", "2024-01-01"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1), "usage errors exit with 1");
    assert!(stderr.contains("Usage"), "Should print a usage message");
}

/// Unknown subcommands are usage errors too
#[test]
fn test_unknown_subcommand_exits_one() {
    let output = run_ocp(&["forecast"]);
    assert_eq!(output.status.code(), Some(1));
}

/// A malformed schedule fails fast without writing output
#[test]
fn test_malformed_schedule_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("predictions.csv");

    let output = run_ocp(&[
        "range",
        "2024-01-01",
        "2024-01-02",
        "{not valid json",
        "--output",
        out_path.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("schedule parse error"),
        "Should report the schedule error, got: {stderr}"
    );
    assert!(!out_path.exists(), "No output file on failure");
}

/// Day subcommand help documents its arguments
#[test]
fn test_day_help() {
    let output = run_ocp(&["day", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("HHMM"), "Should document HHMM encoding");
    assert!(
        stdout.contains("--window-length"),
        "Should document window length"
    );
    assert!(
        stdout.contains("--tail-policy"),
        "Should document tail policy"
    );
}
