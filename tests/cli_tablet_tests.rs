//! End-to-end tests for `keybar tablet` commands.

mod fixtures;

use fixtures::TestEnv;
use std::process::Command;

/// Path to the keybar binary
fn keybar_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keybar")
}

#[test]
fn test_status_human_readable() {
    let env = TestEnv::new();
    let mut command = Command::new(keybar_bin());
    env.apply(&mut command);
    let output = command
        .args(["tablet", "status"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "status should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tablet: Wacom CTL-472"));
    assert!(stdout.contains("Current Preset: artist"));
    assert!(stdout.contains("Output Mode: Artist Mode"));
}

#[test]
fn test_status_json_block() {
    let env = TestEnv::new();
    let mut command = Command::new(keybar_bin());
    env.apply(&mut command);
    let output = command
        .args(["tablet", "status", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let block: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("stdout should be one JSON block");

    assert!(block["text"].as_str().unwrap().contains("artist"));
    assert_eq!(block["class"], "normal");
    let tooltip = block["tooltip"].as_str().unwrap();
    assert!(tooltip.contains("Tablet: Wacom CTL-472"));
    assert!(tooltip.contains("<b>artist</b>"));
}

#[test]
fn test_list_presets_numbered() {
    let env = TestEnv::new();
    let mut command = Command::new(keybar_bin());
    env.apply(&mut command);
    let output = command
        .args(["tablet", "list"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Available presets:"));
    assert!(stdout.contains("1. artist"));
    assert!(stdout.contains("2. gaming"));
}

#[test]
fn test_next_cycles_to_following_preset() {
    let env = TestEnv::new();
    let mut command = Command::new(keybar_bin());
    env.apply(&mut command);
    let output = command
        .args(["tablet", "next"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Switched to preset: gaming"));
}

#[test]
fn test_apply_known_preset() {
    let env = TestEnv::new();
    let mut command = Command::new(keybar_bin());
    env.apply(&mut command);
    let output = command
        .args(["tablet", "apply", "gaming"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Applied preset: gaming"));
}

#[test]
fn test_apply_unknown_preset_fails() {
    let env = TestEnv::new();
    let mut command = Command::new(keybar_bin());
    env.apply(&mut command);
    let output = command
        .args(["tablet", "apply", "no-such-preset"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown preset"));
}

#[test]
fn test_missing_daemon_binary_exits_one() {
    let env = TestEnv::new();
    let mut command = Command::new(keybar_bin());
    env.apply(&mut command);
    let output = command
        .env("KEYBAR_OTD_BIN", "/nonexistent/keybar-test/otd")
        .args(["tablet", "next"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("OpenTabletDriver not found"),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_status_json_never_says_unknown() {
    let env = TestEnv::new();
    // Remove the preset that matches; the matcher must still pick one.
    std::fs::remove_file(env.presets_dir().join("artist.json")).unwrap();

    let mut command = Command::new(keybar_bin());
    env.apply(&mut command);
    let output = command
        .args(["tablet", "status", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let block: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    let text = block["text"].as_str().unwrap();
    assert!(!text.to_lowercase().contains("unknown"));
    assert!(text.contains("gaming"));
}
