//! Doctor command for dependency checking.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::doctor::{DependencyChecker, DoctorFormatter, OutputFormat, ToolStatus};
use clap::Args;

/// Check external dependencies of both helpers
#[derive(Debug, Clone, Args)]
pub struct DoctorArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl DoctorArgs {
    /// Execute the doctor command.
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let presets_dir = config.presets_dir().ok();

        let checker = DependencyChecker::new();
        let statuses = checker.check_all(presets_dir.as_deref());

        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Terminal
        };

        let formatter = DoctorFormatter::with_format(format);
        println!("{}", formatter.format_results(&statuses));

        let has_missing = statuses.iter().any(|s| s.status == ToolStatus::Missing);
        if has_missing {
            Err(CliError::missing_dependency("Some dependencies are missing"))
        } else {
            Ok(())
        }
    }
}
