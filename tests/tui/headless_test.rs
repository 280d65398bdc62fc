//! Integration tests for headless mode.

use super::common::{run_headless, run_mock_json};

#[test]
fn test_headless_basic_execution() {
    let (code, stdout, _) = run_headless(&["--headless", "--mock-db", "--events", "key:up"]);

    assert_eq!(code, 0, "Expected exit code 0");
    assert!(stdout.contains("1 events in"), "Should summarize the run");
    assert!(stdout.contains("Guvi Queries"));
    assert!(stdout.contains("Own Queries"));
}

#[test]
fn test_headless_assertion_fail() {
    let (code, json) = run_mock_json("assert:contains:goodbye");

    assert_eq!(code, 1, "Should exit with code 1 on assertion failure");
    assert_eq!(json["assertions"]["passed"], 0);
    assert_eq!(json["assertions"]["failed"], 1);
}

#[test]
fn test_headless_requires_events_or_script() {
    let (code, stdout, stderr) = run_headless(&["--headless", "--mock-db"]);

    assert_eq!(code, 2, "Should be rejected as a usage error");
    let combined = format!("{}{}", stdout, stderr);
    assert!(
        combined.contains("--events") && combined.contains("--script"),
        "Should name the missing arguments. Got: {}",
        combined
    );
}

#[test]
fn test_headless_frames_output() {
    let (code, stdout, _) = run_headless(&[
        "--headless",
        "--mock-db",
        "--events",
        "key:down,key:enter",
        "--output",
        "frames",
    ]);

    assert_eq!(code, 0);
    assert!(stdout.contains("--- frame 0: start ---"));
    assert!(stdout.contains("--- frame 1: key:down ---"));
    assert!(stdout.contains("--- frame 2: key:enter ---"));
}

#[test]
fn test_selecting_catalog_lists_queries() {
    let (code, json) = run_mock_json(
        "key:down,key:enter,\
         assert:state:catalog=Own Queries,assert:state:stage=query,\
         assert:contains:7. Find the Low-Revenue",
    );

    assert_eq!(code, 0, "{json}");
    assert_eq!(json["assertions"]["passed"], 3);
    assert_eq!(json["state"]["focus"], "Queries");
}

#[test]
fn test_highest_profit_category_single_row() {
    // Guvi Queries, query 9
    let mut events = vec!["key:enter"];
    events.extend(std::iter::repeat("key:down").take(8));
    events.push("key:enter");
    events.push("assert:state:query=9");
    events.push("assert:state:row_count=1");
    events.push("assert:contains:1 row returned");
    let (code, json) = run_mock_json(&events.join(","));

    assert_eq!(code, 0, "{json}");
    assert_eq!(json["state"]["stage"], "chart");
    assert_eq!(json["state"]["chart"], serde_json::Value::Null);
}

#[test]
fn test_chart_selection_renders_figure() {
    let (code, json) = run_mock_json(
        "key:enter,key:down,key:down,key:enter,\
         key:down,key:enter,assert:state:chart=Bar Chart,assert:contains:Bar Chart",
    );

    assert_eq!(code, 0, "{json}");
    assert_eq!(json["assertions"]["passed"], 2);
}

#[test]
fn test_heatmap_on_single_numeric_column_warns() {
    // Guvi query 3 has one numeric column; heatmap is the last chart kind
    let mut events = vec!["key:enter", "key:down", "key:down", "key:enter"];
    events.extend(std::iter::repeat("key:down").take(7));
    events.push("key:enter");
    let (code, json) = run_mock_json(&events.join(","));

    assert_eq!(code, 0);
    let notices = json["notices"].as_array().unwrap();
    assert!(notices.iter().any(|n| n["level"] == "warning"
        && n["message"] == "Not enough numeric columns for Heatmap."));
}

#[test]
fn test_export_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_headless(&[
        "--headless",
        "--mock-db",
        "--export-dir",
        dir.path().to_str().unwrap(),
        "--events",
        "key:enter,key:down,key:down,key:enter,key:e",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}\nstderr: {stderr}");
    let path = dir
        .path()
        .join("3. Calculate the total discount given for each category.csv");
    let csv = std::fs::read_to_string(&path).unwrap();
    assert!(csv.starts_with("category,total_discount\n"));
    assert!(stdout.contains("[info] Saved"));
}

#[test]
fn test_unreachable_database_halts() {
    let (code, stdout, _) = run_headless(&[
        "--headless",
        "postgres://nobody@127.0.0.1:1/nothing",
        "--events",
        "key:enter,assert:state:stage=halted",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0, "{stdout}");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["notices"][0]["level"], "error");
    let message = json["notices"][0]["message"].as_str().unwrap();
    assert!(message.starts_with("Failed to connect to the database: "));
    assert!(!message.contains("Connection error:"), "{message}");
}
