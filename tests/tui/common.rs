//! Common test utilities for headless tests.

use std::process::Command;

/// Runs retail-dash with the given arguments and returns
/// (exit code, stdout, stderr).
pub fn run_headless(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_retail-dash"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

/// Runs a headless script against the sample database with JSON output.
pub fn run_mock_json(events: &str) -> (i32, serde_json::Value) {
    let (code, stdout, stderr) = run_headless(&[
        "--headless",
        "--mock-db",
        "--events",
        events,
        "--output",
        "json",
    ]);
    let json = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid JSON output ({e}). stderr: {stderr}"));
    (code, json)
}
