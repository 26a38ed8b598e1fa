//! End-to-end tests for `keybar` help output.

use std::process::Command;

/// Path to the keybar binary
fn keybar_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keybar")
}

#[test]
fn test_help_lists_subcommands() {
    let output = Command::new(keybar_bin())
        .args(["--help"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tablet"));
    assert!(stdout.contains("keys"));
    assert!(stdout.contains("doctor"));
}

#[test]
fn test_version_flag() {
    let output = Command::new(keybar_bin())
        .args(["--version"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_fails() {
    let output = Command::new(keybar_bin())
        .args(["frobnicate"])
        .output()
        .expect("Failed to execute command");

    assert_ne!(output.status.code(), Some(0));
}

#[test]
fn test_keys_stream_help_documents_flags() {
    let output = Command::new(keybar_bin())
        .args(["keys", "stream", "--help"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--timeout", "--max-units", "--mode", "--wpm", "--rtl", "--json"] {
        assert!(stdout.contains(flag), "help should document {flag}");
    }
}
