//! Tablet preset commands: status, list, cycle, apply.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::models::PresetLibrary;
use crate::services::{Direction, OtdClient, OtdError, PresetSwitcher};
use clap::{Args, Subcommand};

/// Tablet preset switcher backed by OpenTabletDriver
#[derive(Debug, Clone, Args)]
pub struct TabletArgs {
    #[command(subcommand)]
    command: Option<TabletCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum TabletCommand {
    /// Show the current tablet status
    Status(StatusArgs),
    /// List all available presets
    List,
    /// Switch to the next preset
    Next,
    /// Switch to the previous preset
    Prev,
    /// Apply a preset by name
    Apply(ApplyArgs),
}

/// Arguments for the status command
#[derive(Debug, Clone, Args)]
struct StatusArgs {
    /// Output a status-bar JSON block instead of plain text
    #[arg(long)]
    json: bool,
}

/// Arguments for the apply command
#[derive(Debug, Clone, Args)]
struct ApplyArgs {
    /// Preset name (file stem under the preset directory)
    #[arg(value_name = "NAME")]
    name: String,
}

impl TabletArgs {
    /// Execute the selected tablet command.
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        let presets_dir = config
            .presets_dir()
            .map_err(|e| CliError::io(format!("Failed to resolve preset directory: {e}")))?;
        let mut switcher =
            PresetSwitcher::new(OtdClient::new(), PresetLibrary::new(presets_dir));

        match self.command.as_ref().unwrap_or(&TabletCommand::Status(StatusArgs { json: false })) {
            TabletCommand::Status(args) => Self::status(&mut switcher, args.json),
            TabletCommand::List => Self::list(&switcher),
            TabletCommand::Next => Self::cycle(&mut switcher, Direction::Next),
            TabletCommand::Prev => Self::cycle(&mut switcher, Direction::Prev),
            TabletCommand::Apply(args) => Self::apply(&mut switcher, &args.name),
        }
    }

    fn status(switcher: &mut PresetSwitcher, json: bool) -> CliResult<()> {
        if json {
            let block = switcher.status_block();
            let line = block
                .to_json()
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
            println!("{line}");
        } else {
            for line in switcher.human_status() {
                println!("{line}");
            }
        }
        Ok(())
    }

    fn list(switcher: &PresetSwitcher) -> CliResult<()> {
        let presets = switcher.list_presets();
        if presets.is_empty() {
            println!("No presets found");
            return Ok(());
        }
        println!("Available presets:");
        for (index, preset) in presets.iter().enumerate() {
            println!("  {}. {preset}", index + 1);
        }
        Ok(())
    }

    fn cycle(switcher: &mut PresetSwitcher, direction: Direction) -> CliResult<()> {
        match switcher.cycle(direction) {
            Some(preset) => {
                println!("Switched to preset: {preset}");
                Ok(())
            }
            None => {
                let which = match direction {
                    Direction::Next => "next",
                    Direction::Prev => "previous",
                };
                Err(Self::switch_error(
                    switcher,
                    format!("Failed to switch to {which} preset"),
                ))
            }
        }
    }

    fn apply(switcher: &mut PresetSwitcher, name: &str) -> CliResult<()> {
        if !switcher.list_presets().iter().any(|p| p == name) {
            return Err(CliError::validation(format!("Unknown preset: {name}")));
        }
        if switcher.apply(name) {
            println!("Applied preset: {name}");
            Ok(())
        } else {
            Err(Self::switch_error(
                switcher,
                format!("Failed to apply preset: {name}"),
            ))
        }
    }

    /// Maps a failed switch to the right error kind: a missing daemon
    /// binary must exit as a dependency failure.
    fn switch_error(switcher: &PresetSwitcher, fallback: String) -> CliError {
        match switcher.last_error() {
            Some(error) if error == OtdError::NotFound.to_string() => {
                CliError::missing_dependency(error.to_string())
            }
            Some(error) => CliError::validation(format!("{fallback}: {error}")),
            None => CliError::validation(fallback),
        }
    }
}
