//! Tablet settings snapshot and binding structures.
//!
//! A [`TabletSettings`] value is derived from one textual dump of
//! `otd getallsettings` and carries everything the matcher and the tooltip
//! formatter need: the active output mode, the tip binding, and the ordered
//! pen/express-key binding lists in both raw and structured form.

use serde::Serialize;

/// Structured view of one binding string.
///
/// OpenTabletDriver prints bindings in a handful of textual shapes
/// (`Key Binding: { Key: D }`, `Multi-Key Binding: { Keys: Ctrl+Z }`,
/// `Pen Binding: { Button: Pen Button 1 }`, artist-mode wrappers). The
/// matcher only cares about the payload, so each shape collapses to a
/// variant carrying the value that presets store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Binding {
    /// Single key binding
    Key {
        /// Key value, e.g. "D"
        key: String,
    },
    /// Multi-key chord binding
    MultiKey {
        /// Chord value, e.g. "LeftControl+Z"
        keys: String,
    },
    /// Physical pen button binding
    PenButton {
        /// Button value, e.g. "Pen Button 1"
        button: String,
    },
    /// Artist-mode pen button binding
    ArtistButton {
        /// Button value inside the artist-mode wrapper
        button: String,
    },
}

impl Binding {
    /// The express-key value of this binding, if it is key-like.
    #[must_use]
    pub fn key_value(&self) -> Option<&str> {
        match self {
            Self::Key { key } => Some(key),
            Self::MultiKey { keys } => Some(keys),
            _ => None,
        }
    }

    /// The pen-button value of this binding, if it is button-like.
    #[must_use]
    pub fn button_value(&self) -> Option<&str> {
        match self {
            Self::PenButton { button } | Self::ArtistButton { button } => Some(button),
            _ => None,
        }
    }
}

/// Current tablet settings parsed from one `otd getallsettings` snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabletSettings {
    /// Tablet name from the profile header
    pub tablet_name: Option<String>,
    /// Human-readable output mode name, e.g. "Artist Mode"
    pub output_mode: Option<String>,
    /// Dotted plugin path for the output mode, e.g.
    /// "OpenTabletDriver.Desktop.Output.AbsoluteMode"
    pub output_mode_path: Option<String>,
    /// Raw tip binding string, including an optional "@threshold" suffix
    pub tip_binding: Option<String>,
    /// Raw pen binding strings in declaration order
    pub pen_bindings: Vec<String>,
    /// Raw express-key binding strings in declaration order
    pub express_bindings: Vec<String>,
    /// Display area line, kept verbatim for the tooltip
    pub display_area: Option<String>,
    /// Tablet area line, kept verbatim for the tooltip
    pub tablet_area: Option<String>,
    /// Structured pen bindings (unparseable strings are dropped)
    pub parsed_pen_bindings: Vec<Binding>,
    /// Structured express-key bindings (unparseable strings are dropped)
    pub parsed_express_bindings: Vec<Binding>,
}

impl TabletSettings {
    /// True when the snapshot carries enough data to be displayed.
    ///
    /// A snapshot without a tablet name or output mode means the daemon
    /// answered but had no tablet attached; callers treat that as a failed
    /// poll rather than rendering empty fields.
    #[must_use]
    pub fn is_meaningful(&self) -> bool {
        self.tablet_name.is_some() && self.output_mode.is_some()
    }

    /// Express-key values for set matching (single keys and chords).
    #[must_use]
    pub fn express_key_values(&self) -> Vec<&str> {
        self.parsed_express_bindings
            .iter()
            .filter_map(Binding::key_value)
            .collect()
    }

    /// Pen-button values for set matching.
    #[must_use]
    pub fn pen_button_values(&self) -> Vec<&str> {
        self.parsed_pen_bindings
            .iter()
            .filter_map(Binding::button_value)
            .collect()
    }
}
