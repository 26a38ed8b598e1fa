//! keybar - status-bar helpers for tablet presets and keystroke display.

use clap::{Parser, Subcommand};
use keybar::cli::{DoctorArgs, KeysArgs, TabletArgs};
use keybar::config::Config;

/// Status-bar helpers for OpenTabletDriver presets and live keystrokes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tablet preset switcher backed by OpenTabletDriver
    Tablet(TabletArgs),
    /// Keystroke display fed by showmethekey-cli
    Keys(KeysArgs),
    /// Check external dependencies of both helpers
    Doctor(DoctorArgs),
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {e:#}");
        eprintln!("Continuing with defaults.");
        Config::default()
    });

    let result = match &cli.command {
        Commands::Tablet(args) => args.execute(&config),
        Commands::Keys(args) => args.execute(&config),
        Commands::Doctor(args) => args.execute(&config),
    };

    if let Err(error) = result {
        eprintln!("Error: {error}");
        std::process::exit(error.exit_code().code());
    }
}
