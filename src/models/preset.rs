//! Preset files and the in-process preset cache.
//!
//! Presets live as JSON files under the OpenTabletDriver config directory
//! (`…/OpenTabletDriver/Presets/<name>.json`). Only a small slice of the
//! document matters for matching: the output-mode plugin path and the
//! enabled pen/express-key binding values.

use serde::Deserialize;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Matching-relevant data extracted from one preset file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preset {
    /// Preset name (file stem)
    pub name: String,
    /// Output-mode plugin path, if the profile declares one
    pub output_mode_path: Option<String>,
    /// Enabled pen-button binding values
    pub pen_bindings: HashSet<String>,
    /// Enabled express-key binding values
    pub express_bindings: HashSet<String>,
    /// Enabled tip binding value
    pub tip_binding: Option<String>,
}

// Wire format of the preset JSON. Field names follow the OTD schema, only
// the subset needed for matching is declared; everything else is ignored.

#[derive(Debug, Deserialize)]
struct PresetDoc {
    #[serde(rename = "Profiles", default)]
    profiles: Vec<ProfileDoc>,
}

#[derive(Debug, Deserialize)]
struct ProfileDoc {
    #[serde(rename = "OutputMode", default)]
    output_mode: Option<OutputModeDoc>,
    #[serde(rename = "Bindings", default)]
    bindings: Option<BindingsDoc>,
}

#[derive(Debug, Deserialize)]
struct OutputModeDoc {
    #[serde(rename = "Path", default)]
    path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct BindingsDoc {
    #[serde(rename = "TipButton", default)]
    tip_button: Option<ButtonDoc>,
    #[serde(rename = "PenButtons", default)]
    pen_buttons: Vec<Option<ButtonDoc>>,
    #[serde(rename = "AuxButtons", default)]
    aux_buttons: Vec<Option<ButtonDoc>>,
}

#[derive(Debug, Deserialize, Default)]
struct ButtonDoc {
    #[serde(rename = "Enable", default)]
    enable: bool,
    #[serde(rename = "Settings", default)]
    settings: Vec<SettingDoc>,
}

#[derive(Debug, Deserialize)]
struct SettingDoc {
    #[serde(rename = "Property", default)]
    property: String,
    #[serde(rename = "Value", default)]
    value: Option<serde_json::Value>,
}

impl ButtonDoc {
    /// First non-empty setting value whose property is in `properties`.
    fn value_for(&self, properties: &[&str]) -> Option<String> {
        if !self.enable {
            return None;
        }
        self.settings
            .iter()
            .filter(|s| properties.contains(&s.property.as_str()))
            .filter_map(|s| s.value.as_ref().and_then(serde_json::Value::as_str))
            .find(|v| !v.is_empty())
            .map(String::from)
    }
}

impl Preset {
    /// Parses a preset from its JSON source.
    ///
    /// Returns `None` for malformed JSON or a document without profiles;
    /// a broken preset file must never take down the status loop.
    #[must_use]
    pub fn from_json(name: &str, source: &str) -> Option<Self> {
        let doc: PresetDoc = serde_json::from_str(source).ok()?;
        let profile = doc.profiles.into_iter().next()?;

        let output_mode_path = profile
            .output_mode
            .and_then(|m| m.path)
            .filter(|p| !p.is_empty());

        let bindings = profile.bindings.unwrap_or_default();

        let pen_bindings = bindings
            .pen_buttons
            .iter()
            .flatten()
            .filter_map(|b| b.value_for(&["Button", "Key", "Keys"]))
            .collect();

        let express_bindings = bindings
            .aux_buttons
            .iter()
            .flatten()
            .filter_map(|b| b.value_for(&["Key", "Keys"]))
            .collect();

        let tip_binding = bindings
            .tip_button
            .and_then(|b| b.value_for(&["Button", "Key"]));

        Some(Self {
            name: name.to_string(),
            output_mode_path,
            pen_bindings,
            express_bindings,
            tip_binding,
        })
    }
}

/// Preset directory access with a process-lifetime parse cache.
#[derive(Debug)]
pub struct PresetLibrary {
    presets_dir: PathBuf,
    cache: HashMap<String, Option<Preset>>,
}

impl PresetLibrary {
    /// Creates a library rooted at the given presets directory.
    #[must_use]
    pub fn new(presets_dir: impl Into<PathBuf>) -> Self {
        Self {
            presets_dir: presets_dir.into(),
            cache: HashMap::new(),
        }
    }

    /// The directory this library reads from.
    #[must_use]
    pub fn presets_dir(&self) -> &Path {
        &self.presets_dir
    }

    /// Lists available preset names (sorted `*.json` stems).
    ///
    /// A missing directory yields an empty list, not an error.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.presets_dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        names.sort();
        names
    }

    /// Loads a preset by name, caching the result (hit or miss) for the
    /// rest of the process.
    pub fn load(&mut self, name: &str) -> Option<&Preset> {
        if !self.cache.contains_key(name) {
            let path = self.presets_dir.join(format!("{name}.json"));
            let parsed = fs::read_to_string(&path)
                .ok()
                .and_then(|source| Preset::from_json(name, &source));
            self.cache.insert(name.to_string(), parsed);
        }
        self.cache.get(name).and_then(Option::as_ref)
    }
}
