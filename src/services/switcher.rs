//! Preset switching operations: list, match, apply, cycle.

use crate::models::{Preset, PresetLibrary, StatusBlock, TabletSettings};
use crate::services::format;
use crate::services::matcher::find_matching_preset;
use crate::services::otd::OtdClient;

/// Cycle direction for click handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the next preset (wraps to the first)
    Next,
    /// Towards the previous preset (wraps to the last)
    Prev,
}

/// High-level tablet preset operations over the daemon and preset files.
#[derive(Debug)]
pub struct PresetSwitcher {
    client: OtdClient,
    library: PresetLibrary,
}

impl PresetSwitcher {
    /// Creates a switcher over the given client and preset library.
    #[must_use]
    pub fn new(client: OtdClient, library: PresetLibrary) -> Self {
        Self { client, library }
    }

    /// Sorted preset names.
    #[must_use]
    pub fn list_presets(&self) -> Vec<String> {
        self.library.list()
    }

    /// Last user-visible daemon error, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.client.last_error()
    }

    /// Loads every listed preset, skipping unreadable files.
    fn loaded_presets(&mut self) -> Vec<Preset> {
        self.list_presets()
            .iter()
            .filter_map(|name| self.library.load(name).cloned())
            .collect()
    }

    /// Label when matching is impossible: the first word of the output
    /// mode, or a static placeholder with no presets at all.
    fn fallback_label(settings: Option<&TabletSettings>) -> String {
        settings
            .and_then(|s| s.output_mode.as_deref())
            .and_then(|mode| mode.split_whitespace().next())
            .map_or_else(|| "No Presets".to_string(), String::from)
    }

    /// Name of the preset that best matches the live settings.
    pub fn current_preset(&mut self) -> Option<String> {
        let settings = self.client.current_settings()?.clone();
        let presets = self.loaded_presets();
        find_matching_preset(&settings, &presets).map(|p| p.name.clone())
    }

    /// Applies a preset by name.
    pub fn apply(&mut self, name: &str) -> bool {
        self.client.apply_preset(name)
    }

    /// Cycles to the adjacent preset and applies it.
    ///
    /// Returns the applied preset name, or `None` when there is nothing to
    /// cycle to or the daemon rejected the switch.
    pub fn cycle(&mut self, direction: Direction) -> Option<String> {
        let names = self.list_presets();
        if names.is_empty() {
            return None;
        }

        let current = self.current_preset()?;
        let position = names.iter().position(|n| *n == current);

        let target_index = match direction {
            Direction::Next => position.map_or(0, |i| (i + 1) % names.len()),
            Direction::Prev => {
                position.map_or(names.len() - 1, |i| (i + names.len() - 1) % names.len())
            }
        };

        let target = names[target_index].clone();
        if self.apply(&target) {
            Some(target)
        } else {
            None
        }
    }

    /// Full status block for the bar.
    pub fn status_block(&mut self) -> StatusBlock {
        let names = self.list_presets();
        if names.is_empty() {
            return format::no_presets_block();
        }

        let Some(settings) = self.client.current_settings().cloned() else {
            return format::poll_failed_block(self.client.last_error());
        };

        let presets = self.loaded_presets();
        let current = find_matching_preset(&settings, &presets)
            .map_or_else(|| Self::fallback_label(Some(&settings)), |p| p.name.clone());

        format::tablet_block(&settings, &current, &names)
    }

    /// Human-readable status lines for terminal use.
    pub fn human_status(&mut self) -> Vec<String> {
        let Some(settings) = self.client.current_settings().cloned() else {
            let mut lines = vec!["Failed to get current settings".to_string()];
            if let Some(error) = self.client.last_error() {
                lines.push(format!("Error: {error}"));
            }
            return lines;
        };

        let presets = self.loaded_presets();
        let current = find_matching_preset(&settings, &presets)
            .map_or_else(|| Self::fallback_label(Some(&settings)), |p| p.name.clone());

        vec![
            format!(
                "Tablet: {}",
                settings.tablet_name.as_deref().unwrap_or("Unknown Tablet")
            ),
            format!("Current Preset: {current}"),
            format!(
                "Output Mode: {}",
                settings.output_mode.as_deref().unwrap_or("Unknown")
            ),
        ]
    }
}
