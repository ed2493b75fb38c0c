//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! and verify outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "focustray-cli", "--"])
        .args(args)
        .env("FOCUSTRAY_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_config_list_outputs_json() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("config list output is not JSON");
    assert!(parsed.get("work_minutes").is_some());
}

#[test]
fn test_config_get_known_key() {
    let (stdout, _, code) = run_cli(&["config", "get", "break_minutes"]);
    assert_eq!(code, 0, "config get failed");
    assert!(stdout.trim().parse::<u32>().is_ok());
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "no_such_key"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_set_rejects_inverted_bounds() {
    let (_, _, code) = run_cli(&["config", "set", "prompt_min_minutes", "99"]);
    assert_ne!(code, 0, "inverted prompt bounds were accepted");
}

#[test]
fn test_sessions_today_outputs_count() {
    let (stdout, _, code) = run_cli(&["sessions", "today"]);
    assert_eq!(code, 0, "sessions today failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("sessions today output is not JSON");
    assert!(parsed.get("completed_today").is_some());
}
