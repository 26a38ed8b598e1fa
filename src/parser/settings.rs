//! Parser for `otd getallsettings` textual output.
//!
//! The daemon prints one profile block per attached tablet:
//!
//! ```text
//! --- Profile for 'Wacom CTL-472' ---
//! Output Mode: 'Artist Mode'
//! Tip Binding: 'Key Binding: { Key: Left Click }'@0.85
//! Pen Bindings: 'Pen Binding: { Button: Pen Button 1 }', 'Pen Binding: { Button: Pen Button 2 }'
//! Express Key Bindings: 'Key Binding: { Key: B }', 'Multi-Key Binding: { Keys: LeftControl+Z }'
//! Display area: 1920x1080@(960,540)
//! Tablet area: 152x95@(76,47.5)
//! ```
//!
//! Only the first profile block is consumed; multi-tablet setups show the
//! primary tablet in the bar.

use crate::models::{Binding, TabletSettings};
use regex::Regex;
use std::sync::LazyLock;

static KEY_BINDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Key Binding: \{ Key: (.+?) \}").unwrap());
static MULTI_KEY_BINDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Multi-Key Binding: \{ Keys: (.+?) \}").unwrap());
static PEN_BUTTON_BINDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Button: (Pen Button [^}]+?) \}").unwrap());
static ARTIST_MODE_BINDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Linux Artist Mode: \{ (.+?) \}").unwrap());

/// Marker every complete settings dump contains; its absence means the
/// daemon answered before a tablet was attached.
pub const PROFILE_MARKER: &str = "--- Profile for";

/// Maps the human-readable output-mode name to the plugin path stored in
/// preset files.
#[must_use]
pub fn output_mode_path(mode_name: &str) -> Option<&'static str> {
    match mode_name {
        "Artist Mode" => Some("OpenTabletDriver.Desktop.Output.LinuxArtistMode"),
        "Absolute Mode" => Some("OpenTabletDriver.Desktop.Output.AbsoluteMode"),
        "Relative Mode" => Some("OpenTabletDriver.Desktop.Output.RelativeMode"),
        _ => None,
    }
}

/// Parses one binding string into its structured form.
///
/// Returns `None` for shapes the matcher does not use (e.g. mouse scroll
/// plugins); those still show up verbatim in the tooltip.
#[must_use]
pub fn parse_binding(binding: &str) -> Option<Binding> {
    if let Some(caps) = ARTIST_MODE_BINDING.captures(binding) {
        let inner = &caps[1];
        return inner
            .split_once("Button: ")
            .map(|(_, button)| Binding::ArtistButton {
                button: button.trim().to_string(),
            });
    }
    if let Some(caps) = MULTI_KEY_BINDING.captures(binding) {
        return Some(Binding::MultiKey {
            keys: caps[1].to_string(),
        });
    }
    if binding.contains("Button: Pen Button") {
        if let Some(caps) = PEN_BUTTON_BINDING.captures(binding) {
            return Some(Binding::PenButton {
                button: caps[1].to_string(),
            });
        }
    }
    if let Some(caps) = KEY_BINDING.captures(binding) {
        return Some(Binding::Key {
            key: caps[1].to_string(),
        });
    }
    None
}

/// Splits a quoted, comma-separated binding list line into raw strings.
///
/// `'a', 'b'` → `["a", "b"]`; the literal `None` yields an empty list.
fn split_binding_list(list: &str) -> Vec<String> {
    let list = list.trim();
    if list.is_empty() || list == "None" {
        return Vec::new();
    }
    list.split("', '")
        .map(|part| part.trim().trim_matches('\'').to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Parses a full `otd getallsettings` dump into [`TabletSettings`].
///
/// Unknown lines are ignored so new daemon versions do not break the bar.
#[must_use]
pub fn parse_settings(output: &str) -> TabletSettings {
    let mut settings = TabletSettings::default();

    for line in output.lines() {
        let line = line.trim();

        if line.starts_with("--- Profile for '") && line.ends_with("' ---") {
            // Second profile block: stop at the first one.
            if settings.tablet_name.is_some() {
                break;
            }
            settings.tablet_name = Some(line[17..line.len() - 5].to_string());
        } else if line.starts_with("Output Mode: '") && line.ends_with('\'') {
            let mode = line[14..line.len() - 1].to_string();
            settings.output_mode_path = output_mode_path(&mode).map(String::from);
            settings.output_mode = Some(mode);
        } else if let Some(rest) = line.strip_prefix("Tip Binding: ") {
            settings.tip_binding = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("Pen Bindings: ") {
            settings.pen_bindings = split_binding_list(rest);
            settings.parsed_pen_bindings = settings
                .pen_bindings
                .iter()
                .filter_map(|b| parse_binding(b))
                .collect();
        } else if let Some(rest) = line.strip_prefix("Express Key Bindings: ") {
            settings.express_bindings = split_binding_list(rest);
            settings.parsed_express_bindings = settings
                .express_bindings
                .iter()
                .filter_map(|b| parse_binding(b))
                .collect();
        } else if let Some(rest) = line.strip_prefix("Display area: ") {
            settings.display_area = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("Tablet area: ") {
            settings.tablet_area = Some(rest.to_string());
        }
    }

    settings
}
