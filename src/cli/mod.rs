//! CLI command handlers.
//!
//! Each subcommand is a clap `Args` struct with an `execute` method, so
//! commands stay scriptable and testable without going through main.

pub mod common;
pub mod doctor;
pub mod keys;
pub mod tablet;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use doctor::DoctorArgs;
pub use keys::KeysArgs;
pub use tablet::TabletArgs;
