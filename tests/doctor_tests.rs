//! End-to-end tests for the doctor command.

mod fixtures;

use fixtures::{write_script, TestEnv};
use std::process::Command;

/// Path to the keybar binary
fn keybar_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keybar")
}

fn fake_smtk_with_version(env: &TestEnv) -> std::path::PathBuf {
    write_script(
        env.root.path(),
        "showmethekey-cli",
        "#!/bin/sh\necho 'showmethekey-cli 1.12.0'\nexit 0\n",
    )
}

#[test]
fn test_doctor_ready_when_everything_is_present() {
    let env = TestEnv::new();
    let smtk = fake_smtk_with_version(&env);

    let mut command = Command::new(keybar_bin());
    env.apply(&mut command);
    let output = command
        .env("KEYBAR_SMTK_BIN", &smtk)
        .args(["doctor"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("keybar Environment Status"));
    assert!(stdout.contains("OpenTabletDriver CLI"));
    assert!(stdout.contains("showmethekey-cli"));
    assert!(stdout.contains("1.12.0"));
    assert!(stdout.contains("All dependencies are ready"));
}

#[test]
fn test_doctor_json_reports_missing_tool() {
    let env = TestEnv::new();

    let mut command = Command::new(keybar_bin());
    env.apply(&mut command);
    let output = command
        .env(
            "KEYBAR_SMTK_BIN",
            "/nonexistent/keybar-test/showmethekey-cli",
        )
        .args(["doctor", "--json"])
        .output()
        .expect("Failed to execute command");

    // Missing dependency: non-zero exit, still valid JSON on stdout.
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "missing_dependencies");
    assert!(json["failed"].as_u64().unwrap() >= 1);

    let deps = json["dependencies"].as_array().unwrap();
    let smtk = deps
        .iter()
        .find(|d| d["name"] == "showmethekey-cli")
        .expect("smtk entry present");
    assert_eq!(smtk["status"], "missing");
    assert!(smtk["installation_hint"].as_str().is_some());
}

#[test]
fn test_doctor_flags_empty_preset_directory() {
    let env = TestEnv::new();
    let smtk = fake_smtk_with_version(&env);

    // Drain the preset directory.
    for entry in std::fs::read_dir(env.presets_dir()).unwrap() {
        std::fs::remove_file(entry.unwrap().path()).unwrap();
    }

    let mut command = Command::new(keybar_bin());
    env.apply(&mut command);
    let output = command
        .env("KEYBAR_SMTK_BIN", &smtk)
        .args(["doctor", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    let deps = json["dependencies"].as_array().unwrap();
    let presets = deps
        .iter()
        .find(|d| d["name"] == "Preset directory")
        .expect("preset dir entry present");
    assert_eq!(presets["status"], "missing");
    assert!(presets["message"]
        .as_str()
        .unwrap()
        .contains("No preset files"));
}
