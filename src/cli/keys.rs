//! Keystroke display commands: the stream loop and password-mode control.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::constants::SMTK_BIN;
use crate::keys::accumulator::AccumulatorOptions;
use crate::keys::password::{ControlChannel, PasswordCommand};
use crate::keys::render::RenderOptions;
use crate::keys::stream::{self, StreamOptions};
use crate::keys::DisplayMode;
use crate::models::StatusBlock;
use clap::{Args, Subcommand};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Keystroke display fed by showmethekey-cli
#[derive(Debug, Clone, Args)]
pub struct KeysArgs {
    #[command(subcommand)]
    command: KeysCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum KeysCommand {
    /// Run the keystroke display loop
    Stream(StreamArgs),
    /// Toggle password obfuscation on a running stream instance
    Password(PasswordArgs),
}

/// Arguments for the stream command
#[derive(Debug, Clone, Args)]
struct StreamArgs {
    /// Seconds before the display vanishes (0 disables, supports decimals)
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<f64>,

    /// Maximum accumulated key units before removing the oldest
    #[arg(long, value_name = "COUNT")]
    max_units: Option<usize>,

    /// Minimum display width per single keypress
    #[arg(long, value_name = "COUNT")]
    min_units: Option<usize>,

    /// Display mode
    #[arg(long, value_enum)]
    mode: Option<DisplayMode>,

    /// Enable WPM tracking with the given die time in seconds
    #[arg(long, value_name = "SECONDS")]
    wpm: Option<f64>,

    /// Show the latest keystroke on the right instead of the left
    #[arg(long)]
    rtl: bool,

    /// Color the newest unit by typing speed (needs --json and --wpm)
    #[arg(long)]
    gauge: bool,

    /// Emit status-bar JSON with pango markup instead of plain text
    #[arg(long)]
    json: bool,
}

/// Arguments for the password command
#[derive(Debug, Clone, Args)]
struct PasswordArgs {
    /// Desired state
    #[arg(value_enum, default_value = "toggle")]
    state: PasswordCommand,

    /// Print a status-bar JSON acknowledgement block
    #[arg(long)]
    json: bool,
}

impl KeysArgs {
    /// Execute the selected keys command.
    pub fn execute(&self, config: &Config) -> CliResult<()> {
        match &self.command {
            KeysCommand::Stream(args) => args.execute(config),
            KeysCommand::Password(args) => args.execute(),
        }
    }
}

impl StreamArgs {
    /// Merges CLI flags over config-file defaults.
    fn options(&self, config: &Config) -> StreamOptions {
        let defaults = &config.keys;

        let timeout = self.timeout.unwrap_or(defaults.timeout);
        let wpm = self.wpm.unwrap_or(defaults.wpm);
        let json = self.json;
        let wpm_enabled = wpm > 0.0;

        StreamOptions {
            timeout: (timeout > 0.0).then(|| Duration::from_secs_f64(timeout)),
            accumulator: AccumulatorOptions {
                max_units: self.max_units.unwrap_or(defaults.max_units),
                min_units: self.min_units.unwrap_or(defaults.min_units),
                mode: self.mode.unwrap_or(defaults.mode),
            },
            render: RenderOptions {
                rtl: self.rtl || defaults.rtl,
                // The gauge needs markup output and a speed source.
                gauge: (self.gauge || defaults.gauge) && json && wpm_enabled,
            },
            wpm_die_time: wpm_enabled.then(|| Duration::from_secs_f64(wpm)),
            json,
        }
    }

    fn execute(&self, config: &Config) -> CliResult<()> {
        // Diagnostics go to stderr; stdout belongs to the bar.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();

        stream::run(self.options(config)).map_err(|e| {
            let message = format!("{e:#}");
            if message.contains("not found") {
                CliError::missing_dependency(message)
            } else {
                CliError::io(message)
            }
        })
    }
}

impl PasswordArgs {
    fn execute(&self) -> CliResult<()> {
        let channel = ControlChannel::new();
        match channel.send(self.state) {
            Ok(()) => {
                if self.json {
                    // Immediate feedback for bar click handlers; the real
                    // state follows from the stream instance itself.
                    let block = match self.state {
                        PasswordCommand::Off => StatusBlock::text("\u{2328}\u{fe0f}"),
                        _ => StatusBlock::text("\u{1f512} ( &gt; _ &lt; )"),
                    };
                    let line = block
                        .to_json()
                        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
                    println!("{line}");
                } else {
                    let action = match self.state {
                        PasswordCommand::On => "Enabling",
                        PasswordCommand::Off => "Disabling",
                        PasswordCommand::Toggle => "Toggling",
                    };
                    println!("{action} password mode...");
                }
                Ok(())
            }
            Err(e) => Err(CliError::validation(format!(
                "{e:#} (is '{SMTK_BIN}' being streamed by keybar?)"
            ))),
        }
    }
}
