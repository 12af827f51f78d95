//! CLI integration tests

use std::io::Write;
use std::process::Command;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/car_price_model.json");

fn carprice() -> Command {
    Command::new(env!("CARGO_BIN_EXE_carprice"))
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = carprice()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Car Price Predictor"), "Should show app name");
    for command in ["predict", "classes", "importances", "model", "inspect"] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = carprice()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("carprice"), "Should show binary name");
}

/// Test predict command help lists every car attribute
#[test]
fn test_predict_help() {
    let output = carprice()
        .args(["predict", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict help should succeed");
    for flag in [
        "--brand",
        "--year",
        "--km-driven",
        "--fuel",
        "--seller-type",
        "--transmission",
        "--owner",
        "--mileage",
        "--engine",
        "--max-power",
        "--seats",
    ] {
        assert!(stdout.contains(flag), "Should show {} option", flag);
    }
}

/// Test inspecting a valid artifact offline
#[test]
fn test_inspect_fixture_json() {
    let output = carprice()
        .args(["--format", "json", "inspect", FIXTURE])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Inspect should succeed");
    let info: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Inspect should print JSON");
    assert_eq!(info["algorithm"], "random_forest");
    assert_eq!(info["n_estimators"], 3);
    assert_eq!(info["transmissions"], serde_json::json!(["Automatic", "Manual"]));
}

/// Test inspecting an artifact with a missing encoder
#[test]
fn test_inspect_corrupt_artifact_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let fixture = std::fs::read_to_string(FIXTURE).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&fixture).unwrap();
    value.as_object_mut().unwrap().remove("le_fuel");
    file.write_all(value.to_string().as_bytes()).unwrap();

    let output = carprice()
        .args(["inspect", file.path().to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "Inspect should fail");
    assert!(stderr.contains("le_fuel"), "Should name the missing entry");
}

/// Test that an unreachable server is reported as an error
#[test]
fn test_predict_without_server_fails() {
    let output = carprice()
        .args([
            "--api-url",
            "http://127.0.0.1:9",
            "predict",
            "--brand",
            "Maruti",
            "--year",
            "2020",
            "--km-driven",
            "40000",
            "--fuel",
            "Diesel",
            "--seller-type",
            "Dealer",
            "--transmission",
            "Manual",
            "--mileage",
            "18",
            "--engine",
            "1200",
            "--max-power",
            "90",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Predict should fail without a server");
}
