//! Dependency checking for the status-bar helpers.
//!
//! Detects the external CLIs both helpers shell out to and validates the
//! preset directory. All methods are non-panicking and return structured
//! results; a missing tool yields `ToolStatus::Missing` with an
//! installation hint, execution trouble yields `ToolStatus::Unknown`.

use crate::constants::{OTD_BIN, OTD_BIN_ENV, SMTK_BIN, SMTK_BIN_ENV};
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Status of a single dependency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// Dependency is present and working
    Available,
    /// Dependency is not found or not working
    Missing,
    /// Could not determine status (timeout, error)
    Unknown,
}

/// Result of checking a single dependency.
#[derive(Debug, Clone)]
pub struct DependencyStatus {
    /// Name of the dependency (e.g. "OpenTabletDriver CLI")
    pub name: String,
    /// Status of the dependency
    pub status: ToolStatus,
    /// Version string if detected
    pub version: Option<String>,
    /// Human-readable message about the status
    pub message: String,
}

impl DependencyStatus {
    /// Creates a new dependency status.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: ToolStatus,
        version: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            version,
            message: message.into(),
        }
    }

    /// Creates a status for an available dependency.
    #[must_use]
    pub fn available(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Available, None, message)
    }

    /// Creates a status for an available dependency with a version.
    #[must_use]
    pub fn available_with_version(name: impl Into<String>, version: impl Into<String>) -> Self {
        let version_str = version.into();
        Self::new(
            name,
            ToolStatus::Available,
            Some(version_str.clone()),
            format!("Found version {version_str}"),
        )
    }

    /// Creates a status for a missing dependency.
    #[must_use]
    pub fn missing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Missing, None, message)
    }

    /// Creates a status for an unknown dependency state.
    #[must_use]
    pub fn unknown(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, ToolStatus::Unknown, None, message)
    }
}

/// Checker for the helpers' external dependencies.
#[derive(Debug, Default)]
pub struct DependencyChecker;

impl DependencyChecker {
    /// Creates a new dependency checker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Checks all dependencies and returns their status.
    ///
    /// # Arguments
    ///
    /// * `presets_dir` - Path to the OpenTabletDriver preset directory
    pub fn check_all(&self, presets_dir: Option<&Path>) -> Vec<DependencyStatus> {
        vec![
            self.check_otd_cli(),
            self.check_smtk_cli(),
            self.check_presets_dir(presets_dir),
        ]
    }

    /// Checks if the OpenTabletDriver CLI is installed.
    ///
    /// `otd` has no version flag, so this is a presence probe via `--help`.
    pub fn check_otd_cli(&self) -> DependencyStatus {
        let binary = std::env::var(OTD_BIN_ENV).unwrap_or_else(|_| OTD_BIN.to_string());
        match run_probe(&binary, &["--help"]) {
            Ok(_) => DependencyStatus::available(
                "OpenTabletDriver CLI",
                format!("Found '{binary}' in PATH"),
            ),
            Err(e) => {
                if is_command_not_found(&e) {
                    DependencyStatus::missing(
                        "OpenTabletDriver CLI",
                        "Not found in PATH. Install OpenTabletDriver and its otd tool",
                    )
                } else {
                    DependencyStatus::unknown(
                        "OpenTabletDriver CLI",
                        format!("Error checking: {e}"),
                    )
                }
            }
        }
    }

    /// Checks if showmethekey-cli is installed and parses its version.
    pub fn check_smtk_cli(&self) -> DependencyStatus {
        let binary = std::env::var(SMTK_BIN_ENV).unwrap_or_else(|_| SMTK_BIN.to_string());
        match run_probe(&binary, &["--version"]) {
            Ok(output) => {
                if let Some(version) = parse_version_simple(&output) {
                    DependencyStatus::available_with_version("showmethekey-cli", version)
                } else {
                    DependencyStatus::available(
                        "showmethekey-cli",
                        format!("Found '{binary}' in PATH"),
                    )
                }
            }
            Err(e) => {
                if is_command_not_found(&e) {
                    DependencyStatus::missing(
                        "showmethekey-cli",
                        "Not found in PATH. Install showmethekey",
                    )
                } else {
                    DependencyStatus::unknown("showmethekey-cli", format!("Error checking: {e}"))
                }
            }
        }
    }

    /// Checks that the preset directory exists and holds preset files.
    pub fn check_presets_dir(&self, path: Option<&Path>) -> DependencyStatus {
        let Some(presets_dir) = path else {
            return DependencyStatus::missing(
                "Preset directory",
                "Path not configured. Set presets_dir in config.toml",
            );
        };

        if !presets_dir.exists() {
            return DependencyStatus::missing(
                "Preset directory",
                format!("Directory does not exist: {}", presets_dir.display()),
            );
        }

        if !presets_dir.is_dir() {
            return DependencyStatus::missing(
                "Preset directory",
                format!("Path is not a directory: {}", presets_dir.display()),
            );
        }

        let preset_count = std::fs::read_dir(presets_dir)
            .map(|entries| {
                entries
                    .flatten()
                    .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
                    .count()
            })
            .unwrap_or(0);

        if preset_count == 0 {
            DependencyStatus::missing(
                "Preset directory",
                format!(
                    "No preset files (*.json) in {}. Save a preset from OpenTabletDriver first",
                    presets_dir.display()
                ),
            )
        } else {
            DependencyStatus::available(
                "Preset directory",
                format!("{preset_count} presets at {}", presets_dir.display()),
            )
        }
    }
}

/// Runs a command to probe for presence/version.
fn run_probe(command: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(command)
        .args(args)
        .output()
        .context(format!("Failed to execute '{command}'"))?;

    // Some tools print version information to stderr.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let result = if stdout.trim().is_empty() {
        stderr.to_string()
    } else {
        stdout.to_string()
    };

    Ok(result)
}

/// Parses a simple version string out of probe output.
///
/// Examples:
/// - "1.12.0" -> Some("1.12.0")
/// - "showmethekey-cli 1.12.0" -> Some("1.12.0")
fn parse_version_simple(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .find(|word| {
            let parts: Vec<&str> = word.split('.').collect();
            parts.len() >= 2
                && parts
                    .iter()
                    .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        })
        .map(String::from)
}

/// Checks if an error indicates a command was not found.
fn is_command_not_found(error: &anyhow::Error) -> bool {
    let error_msg = format!("{error:#}").to_lowercase();
    error_msg.contains("not found")
        || error_msg.contains("no such file")
        || error_msg.contains("cannot find")
        || error_msg.contains("os error 2") // ENOENT on Unix
}
