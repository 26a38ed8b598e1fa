//! Key-name cleaning and combination formatting.
//!
//! Raw evdev-style names (`KEY_LEFTSHIFT`, `BTN_LEFT`) become display
//! glyphs, and the set of currently pressed keys becomes one combination
//! string per the selected display mode.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// How pressed keys are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Show the full combination (modifiers + key)
    #[default]
    Compose,
    /// Show the resulting character only
    Compact,
    /// Show uncleaned key names
    Raw,
}

/// Modifier names, without their `KEY_` prefix.
const MODIFIER_KEYS: &[&str] = &[
    "LEFTSHIFT",
    "RIGHTSHIFT",
    "LEFTCTRL",
    "RIGHTCTRL",
    "LEFTALT",
    "RIGHTALT",
    "LEFTMETA",
    "RIGHTMETA",
];

/// Glyph for a special key name (prefix already stripped), if any.
fn special_glyph(name: &str) -> Option<&'static str> {
    let glyph = match name {
        "LEFTSHIFT" | "RIGHTSHIFT" => "\u{21e7}",
        "LEFTCTRL" | "RIGHTCTRL" => "\u{2303}",
        "LEFTALT" | "RIGHTALT" => "\u{2325}",
        "LEFTMETA" | "RIGHTMETA" => "\u{f349} ",
        "CAPSLOCK" => "\u{21ea}",
        "ENTER" => "\u{23ce}",
        "SPACE" => "\u{2423}",
        "TAB" => "\u{21e5}",
        "BACKSPACE" => "\u{232b}",
        "DELETE" => "\u{2326}",
        "ESC" => "\u{238b}",
        "HOME" => "\u{2196}",
        "END" => "\u{2198}",
        "PAGEUP" => "\u{21de}",
        "PAGEDOWN" => "\u{21df}",
        "INSERT" => "\u{2380}",
        "LEFT" => "\u{2190}",
        "RIGHT" => "\u{2192}",
        "UP" => "\u{2191}",
        "DOWN" => "\u{2193}",
        "APOSTROPHE" => "'",
        "GRAVE" => "`",
        "MINUS" => "-",
        "EQUAL" => "=",
        "LEFTBRACE" => "[",
        "RIGHTBRACE" => "]",
        "BACKSLASH" => "\\",
        "SEMICOLON" => ";",
        "COMMA" => ",",
        "DOT" => ".",
        "SLASH" => "/",
        "BTN_LEFT" => "\u{25c0}",
        "BTN_RIGHT" => "\u{25b6}",
        "BTN_MIDDLE" => "\u{25cf}",
        "BTN_SIDE" => "\u{25c4}",
        "BTN_EXTRA" => "\u{25ba}",
        "BTN_FORWARD" => "\u{2b9e}",
        "BTN_BACK" => "\u{2b9c}",
        _ => return None,
    };
    Some(glyph)
}

/// Shifted variants of the digit row, used in compact mode.
fn shifted_digit(name: &str) -> Option<&'static str> {
    let shifted = match name {
        "1" => "!",
        "2" => "@",
        "3" => "#",
        "4" => "$",
        "5" => "%",
        "6" => "^",
        "7" => "&",
        "8" => "*",
        "9" => "(",
        "0" => ")",
        _ => return None,
    };
    Some(shifted)
}

/// True when the raw name (with prefix) is a modifier key.
#[must_use]
pub fn is_modifier(key_name: &str) -> bool {
    MODIFIER_KEYS.contains(&strip_prefix(key_name))
}

/// Strips the `KEY_`/`BTN_` prefix; `BTN_*` keeps its prefix so mouse
/// buttons stay distinguishable in the glyph table.
fn strip_prefix(key_name: &str) -> &str {
    key_name.strip_prefix("KEY_").unwrap_or(key_name)
}

/// True while either shift key is down.
#[must_use]
pub fn shift_pressed(pressed: &HashSet<String>) -> bool {
    pressed.contains("KEY_LEFTSHIFT") || pressed.contains("KEY_RIGHTSHIFT")
}

/// Cleans one raw key name for display.
#[must_use]
pub fn clean_key_name(
    key_name: &str,
    mode: DisplayMode,
    pressed: &HashSet<String>,
    caps_lock: bool,
) -> String {
    if key_name.is_empty() {
        return String::new();
    }

    let clean = strip_prefix(key_name);
    if mode == DisplayMode::Raw {
        return clean.to_string();
    }

    if let Some(glyph) = special_glyph(clean) {
        return glyph.to_string();
    }

    let mut chars = clean.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            // Letter case follows shift XOR caps lock.
            return if shift_pressed(pressed) ^ caps_lock {
                c.to_ascii_uppercase().to_string()
            } else {
                c.to_ascii_lowercase().to_string()
            };
        }
        if shift_pressed(pressed) && mode == DisplayMode::Compact {
            if let Some(shifted) = shifted_digit(clean) {
                return shifted.to_string();
            }
        }
        return clean.to_string();
    }

    if let Some(keypad) = clean.strip_prefix("KP") {
        return keypad.to_string();
    }

    title_case(clean)
}

/// "PLAYPAUSE" → "Playpause", matching how uncommon keys are shown.
fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
        None => String::new(),
    }
}

/// Formats the currently pressed keys into one combination string.
///
/// Returns an empty string when nothing is pressed. In compose mode a
/// single-key combination is space-padded to `min_units` characters so
/// the bar module keeps a stable minimum width.
#[must_use]
pub fn format_combination(
    pressed: &HashSet<String>,
    mode: DisplayMode,
    caps_lock: bool,
    min_units: usize,
) -> String {
    if pressed.is_empty() {
        return String::new();
    }

    let mut modifiers = BTreeSet::new();
    let mut regular_keys = Vec::new();
    for key in pressed {
        if is_modifier(key) {
            modifiers.insert(clean_key_name(key, mode, pressed, caps_lock));
        } else {
            regular_keys.push(key.as_str());
        }
    }

    if mode == DisplayMode::Raw {
        let mut all: Vec<String> = pressed
            .iter()
            .map(|key| clean_key_name(key, mode, pressed, caps_lock))
            .collect();
        all.sort();
        return all.join(" + ");
    }

    let mut clean_regular: Vec<String> = regular_keys
        .iter()
        .map(|key| clean_key_name(key, mode, pressed, caps_lock))
        .collect();
    clean_regular.sort();

    let combination = if mode == DisplayMode::Compact {
        match clean_regular.len() {
            0 => modifiers.into_iter().collect::<Vec<_>>().join(" + "),
            1 => clean_regular.remove(0),
            _ => {
                let mut all: Vec<String> = modifiers.into_iter().collect();
                all.extend(clean_regular);
                all.join(" + ")
            }
        }
    } else {
        match clean_regular.len() {
            0 => modifiers.into_iter().collect::<Vec<_>>().join(" + "),
            1 => {
                if modifiers.is_empty() {
                    clean_regular.remove(0)
                } else {
                    let mut all: Vec<String> = modifiers.into_iter().collect();
                    all.push(clean_regular.remove(0));
                    all.join(" + ")
                }
            }
            _ => {
                let mut all: Vec<String> = modifiers.into_iter().collect();
                all.extend(clean_regular);
                all.join(" + ")
            }
        }
    };

    if mode == DisplayMode::Compose
        && !combination.contains(" + ")
        && combination.chars().count() < min_units
    {
        let pad = min_units - combination.chars().count();
        return combination + &" ".repeat(pad);
    }

    combination
}
