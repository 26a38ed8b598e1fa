//! Configuration management for the application.
//!
//! Configuration is TOML in the platform config directory; every field is
//! optional and CLI flags override whatever the file sets.

use crate::keys::DisplayMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Preset directory override; defaults to the OpenTabletDriver
    /// location under the user config directory
    pub presets_dir: Option<PathBuf>,
}

/// Defaults for the keystroke display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Seconds of inactivity before the buffer clears (0 disables)
    #[serde(default)]
    pub timeout: f64,
    /// Maximum accumulated key units
    #[serde(default = "default_max_units")]
    pub max_units: usize,
    /// Minimum display width of a single-key unit
    #[serde(default = "default_min_units")]
    pub min_units: usize,
    /// Display mode (compose, compact, raw)
    #[serde(default)]
    pub mode: DisplayMode,
    /// WPM die time in seconds (0 disables WPM tracking)
    #[serde(default)]
    pub wpm: f64,
    /// Latest unit on the right instead of the left
    #[serde(default)]
    pub rtl: bool,
    /// Color the newest unit by typing speed
    #[serde(default)]
    pub gauge: bool,
}

fn default_max_units() -> usize {
    3
}

fn default_min_units() -> usize {
    1
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            timeout: 0.0,
            max_units: default_max_units(),
            min_units: default_min_units(),
            mode: DisplayMode::default(),
            wpm: 0.0,
            rtl: false,
            gauge: false,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/keybar/config.toml`
/// - macOS: `~/Library/Application Support/keybar/config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Keystroke display defaults
    #[serde(default)]
    pub keys: KeysConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the configuration directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let base = dirs::config_dir().context("Could not determine config directory")?;
        Ok(base.join("keybar"))
    }

    /// Gets the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Loads configuration from disk, or defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Saves configuration to disk, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Resolves the preset directory: explicit override, or the standard
    /// OpenTabletDriver location under the user config directory.
    pub fn presets_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.paths.presets_dir {
            return Ok(dir.clone());
        }
        let base = dirs::config_dir().context("Could not determine config directory")?;
        Ok(base.join("OpenTabletDriver").join("Presets"))
    }
}
