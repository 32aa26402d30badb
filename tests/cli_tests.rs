//! Integration tests for the itinerary-atlas CLI (offline commands only)

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_itinerary-atlas");

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Run the binary with an isolated (absent) config file
fn run(args: &[&str], stdin: Option<&str>) -> Output {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");

    let mut child = Command::new(BIN)
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");

    {
        let mut pipe = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).unwrap();
        }
    }

    child.wait_with_output().unwrap()
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("itinerary-atlas"));
    assert!(stdout.contains("schedule"));
    assert!(stdout.contains("analyze"));
}

#[test]
fn test_schedule_from_file_as_json() {
    let path = fixture("kyoto_itinerary.md");
    let output = run(&["schedule", path.to_str().unwrap(), "--format", "json"], None);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let days: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0]["dayNumber"], 1);
    assert_eq!(days[0]["activities"][0]["timeRange"], "9:00 AM - 11:00 AM");
    assert_eq!(days[0]["activities"][0]["cost"]["currencySymbol"], "¥");
}

#[test]
fn test_schedule_from_stdin_as_text() {
    let output = run(
        &["schedule"],
        Some("**Day 1:** Arrival\n9:00 AM - Visit Eiffel Tower Cost: ₹500\n"),
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("📅 Day 1"));
    assert!(stdout.contains("⏰ 9:00 AM Visit Eiffel Tower (₹500)"));
}

#[test]
fn test_offline_places() {
    let path = fixture("kyoto_itinerary.md");
    let output = run(
        &["places", path.to_str().unwrap(), "--destination", "Kyoto", "--offline", "--format", "json"],
        None,
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let places: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(places[0]["name"], "Kyoto");
    assert_eq!(places[0]["category"], "destination");
    assert_eq!(places.as_array().unwrap().len(), 6);
}

#[test]
fn test_prompt() {
    let output = run(&["prompt", "--destination", "  Lisbon ", "--days", "4"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Destination: Lisbon\n"));
    assert!(stdout.contains("Duration: 4 days"));
}

#[test]
fn test_prompt_rejects_bad_input() {
    let output = run(&["prompt", "--destination", "Lisbon", "--days", "45"], None);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot exceed 30"));

    let output = run(&["prompt", "--destination", "<script>", "--days", "3"], None);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[geocoding]\nconcurrency = 9\n").unwrap();

    let output = Command::new(BIN)
        .arg("--config")
        .arg(&config)
        .args(["schedule"])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("concurrency"));
}

/// Run the binary against a geocoding endpoint nothing listens on
fn run_with_dead_provider(args: &[&str], stdin: &str) -> Output {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        "[geocoding]\nbase_url = \"http://127.0.0.1:9\"\ntimeout_seconds = 2\nrequests_per_second = 50\n",
    )
    .unwrap();

    let mut child = Command::new(BIN)
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_places_fails_when_provider_is_down() {
    let output = run_with_dead_provider(
        &["places", "--destination", "Paris", "--format", "json"],
        "**Day 1:** Visit Louvre Museum",
    );

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("geocoding lookups failed"));
}

#[test]
fn test_analyze_reports_provider_outage() {
    let output = run_with_dead_provider(
        &["analyze", "--destination", "Paris"],
        "**Day 1:** Visit Louvre Museum",
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["days"].as_array().unwrap().len(), 1);
    assert_eq!(view["lookups"]["failed"], view["lookups"]["attempted"]);
    assert!(String::from_utf8_lossy(&output.stderr).contains("geocoding lookups failed"));
}
