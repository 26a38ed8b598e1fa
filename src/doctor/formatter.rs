//! Output formatting for dependency check results.
//!
//! Terminal output uses clear visual indicators (OK/MISSING/UNKNOWN rows
//! with installation hints); JSON output mirrors the same data for
//! scripting.

use crate::doctor::{DependencyStatus, ToolStatus};
use serde::Serialize;
use std::fmt::Write;

/// Output format for doctor results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Terminal,
    /// Machine-readable JSON output
    Json,
}

/// JSON output structure for doctor results.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Overall health status
    pub status: String,
    /// Number of successful checks
    pub passed: usize,
    /// Number of failed checks
    pub failed: usize,
    /// Number of unknown checks
    pub unknown: usize,
    /// Individual dependency results
    pub dependencies: Vec<JsonDependency>,
}

/// JSON representation of a single dependency check.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDependency {
    /// Dependency name
    pub name: String,
    /// Status (available, missing, unknown)
    pub status: String,
    /// Version string if detected
    pub version: Option<String>,
    /// Status message
    pub message: String,
    /// Installation instructions if missing
    pub installation_hint: Option<String>,
}

/// Formatter for dependency check results.
#[derive(Debug)]
pub struct DoctorFormatter {
    format: OutputFormat,
}

impl DoctorFormatter {
    /// Creates a formatter with terminal output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: OutputFormat::Terminal,
        }
    }

    /// Creates a formatter with the given output format.
    #[must_use]
    pub fn with_format(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats check results for display or parsing.
    #[must_use]
    pub fn format_results(&self, statuses: &[DependencyStatus]) -> String {
        match self.format {
            OutputFormat::Terminal => Self::format_terminal(statuses),
            OutputFormat::Json => Self::format_json(statuses),
        }
    }

    fn counts(statuses: &[DependencyStatus]) -> (usize, usize, usize) {
        let passed = statuses
            .iter()
            .filter(|s| s.status == ToolStatus::Available)
            .count();
        let failed = statuses
            .iter()
            .filter(|s| s.status == ToolStatus::Missing)
            .count();
        let unknown = statuses
            .iter()
            .filter(|s| s.status == ToolStatus::Unknown)
            .count();
        (passed, failed, unknown)
    }

    fn format_terminal(statuses: &[DependencyStatus]) -> String {
        let mut output = String::new();

        output.push_str("keybar Environment Status\n");
        output.push_str("═════════════════════════\n\n");

        let (passed, failed, unknown) = Self::counts(statuses);

        for status in statuses {
            let (symbol, status_text) = match status.status {
                ToolStatus::Available => ("✓", "OK"),
                ToolStatus::Missing => ("✗", "MISSING"),
                ToolStatus::Unknown => ("⚠", "UNKNOWN"),
            };

            // Format: ✓ showmethekey-cli ...... OK (v1.12.0)
            let name_width: usize = 22;
            let dots = ".".repeat(name_width.saturating_sub(status.name.len()));
            let _ = write!(output, "{} {}{} {}", symbol, status.name, dots, status_text);

            if let Some(version) = &status.version {
                let _ = write!(output, " (v{})", version);
            }
            output.push('\n');

            if status.status == ToolStatus::Missing {
                if let Some(hint) = installation_hint(&status.name) {
                    output.push_str("    Install: ");
                    output.push_str(hint);
                    output.push('\n');
                }
            }

            if status.status == ToolStatus::Available {
                output.push('\n');
            } else {
                let indented = status
                    .message
                    .lines()
                    .map(|line| format!("    {}", line))
                    .collect::<Vec<_>>()
                    .join("\n");
                output.push_str(&indented);
                output.push_str("\n\n");
            }
        }

        output.push_str("─────────────────────────\n");
        let _ = write!(output, "Summary: {} passed", passed);
        if failed > 0 {
            let _ = write!(output, ", {} failed", failed);
        }
        if unknown > 0 {
            let _ = write!(output, ", {} unknown", unknown);
        }
        output.push('\n');

        if failed == 0 && unknown == 0 {
            output.push_str("\n✓ All dependencies are ready!\n");
        } else if failed > 0 {
            output.push_str("\n✗ Missing required dependencies\n");
            output.push_str("  Install missing tools and run 'doctor' again.\n");
        } else {
            output.push_str("\n⚠ Some checks could not be completed\n");
            output.push_str("  Review warnings above and verify your setup.\n");
        }

        output
    }

    fn format_json(statuses: &[DependencyStatus]) -> String {
        let (passed, failed, unknown) = Self::counts(statuses);

        let overall_status = if failed == 0 && unknown == 0 {
            "ready"
        } else if failed > 0 {
            "missing_dependencies"
        } else {
            "warnings"
        };

        let dependencies: Vec<JsonDependency> = statuses
            .iter()
            .map(|s| JsonDependency {
                name: s.name.clone(),
                status: match s.status {
                    ToolStatus::Available => "available".to_string(),
                    ToolStatus::Missing => "missing".to_string(),
                    ToolStatus::Unknown => "unknown".to_string(),
                },
                version: s.version.clone(),
                message: s.message.clone(),
                installation_hint: if s.status == ToolStatus::Missing {
                    installation_hint(&s.name).map(String::from)
                } else {
                    None
                },
            })
            .collect();

        let json_output = JsonOutput {
            status: overall_status.to_string(),
            passed,
            failed,
            unknown,
            dependencies,
        };

        serde_json::to_string_pretty(&json_output).unwrap_or_else(|_| {
            r#"{"status":"error","message":"Failed to serialize JSON output"}"#.to_string()
        })
    }
}

impl Default for DoctorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Installation instructions for a missing dependency.
fn installation_hint(name: &str) -> Option<&'static str> {
    match name {
        "OpenTabletDriver CLI" => {
            Some("https://opentabletdriver.net - package 'opentabletdriver' on most distros")
        }
        "showmethekey-cli" => {
            Some("package 'showmethekey' (Arch/Fedora) or flathub 'one.alynx.showmethekey'")
        }
        "Preset directory" => {
            Some("open OpenTabletDriver, configure the tablet, then 'Presets > Save'")
        }
        _ => None,
    }
}
