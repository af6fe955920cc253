//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_questkeep"))
        .env("QUESTKEEP_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("JSON output")
}

#[test]
fn test_xp_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(dir.path(), &["xp", "threshold", "3"]);
    assert_eq!(out["threshold"], 2250);
}

#[test]
fn test_xp_resolve() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(dir.path(), &["xp", "resolve", "3400", "1"]);
    assert_eq!(out["level"], 3);
    assert_eq!(out["points"], 900);
    assert_eq!(out["threshold"], 2250);
}

#[test]
fn test_xp_resolve_rejects_negative_points() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["xp", "resolve", "-5", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("points"), "stderr: {stderr}");
}

#[test]
fn test_xp_award() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(dir.path(), &["xp", "award", "900", "1", "250"]);
    assert_eq!(out["level"], 2);
    assert_eq!(out["points"], 150);
    assert_eq!(out["levels_gained"], 1);
}

#[test]
fn test_timer_status_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(out["type"], "StateSnapshot");
    assert_eq!(out["mode"], "work");
    assert_eq!(out["remaining_secs"], 1500);
    assert_eq!(out["running"], false);
}

#[test]
fn test_timer_mode_persists() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(dir.path(), &["timer", "mode", "longBreak"]);
    assert_eq!(out["type"], "ModeSelected");
    assert_eq!(out["to"], "longBreak");

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["mode"], "longBreak");
    assert_eq!(status["total_secs"], 900);
}

#[test]
fn test_timer_duration_applies_to_active_mode() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(dir.path(), &["timer", "duration", "work", "50"]);
    assert_eq!(out["applied"], true);

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["remaining_secs"], 3000);
}

#[test]
fn test_timer_duration_out_of_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["timer", "duration", "work", "0"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_set_get() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "timer.work_minutes", "45"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("ok"));

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "timer.work_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "45");

    // a fresh timer picks up the configured duration
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["total_secs"], 2700);
}

#[test]
fn test_config_and_saved_timer_stay_in_sync() {
    let dir = tempfile::tempdir().unwrap();
    // saves a timer cycle with the default durations
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["total_secs"], 1500);

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "timer.work_minutes", "40"]);
    assert_eq!(code, 0);
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["total_secs"], 2400);
    assert_eq!(status["remaining_secs"], 2400);

    run_json(dir.path(), &["timer", "duration", "work", "50"]);
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "timer.work_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "50");

    // an unchanged config does not rewind a later status
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["total_secs"], 3000);
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "timer.nap", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_stats_empty() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_json(dir.path(), &["stats", "all"]);
    assert_eq!(out["total_intervals"], 0);
    let recent = run_json(dir.path(), &["stats", "recent"]);
    assert_eq!(recent, serde_json::json!([]));
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("questkeep"));
}
