//! Application-wide constants.

/// The display name of the application (human-readable).
pub const APP_NAME: &str = "keybar";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "keybar";

/// External CLI that exposes OpenTabletDriver settings and preset commands.
pub const OTD_BIN: &str = "otd";

/// External CLI that streams raw key events as JSON lines.
pub const SMTK_BIN: &str = "showmethekey-cli";

/// Environment variable overriding the `otd` binary path (used by tests).
pub const OTD_BIN_ENV: &str = "KEYBAR_OTD_BIN";

/// Environment variable overriding the `showmethekey-cli` binary path.
pub const SMTK_BIN_ENV: &str = "KEYBAR_SMTK_BIN";
