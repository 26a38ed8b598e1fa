//! Parsers for the textual and JSON output of the external daemons.

pub mod key_event;
pub mod settings;

pub use key_event::{parse_event_line, KeyEvent, KeyState, BLOCKED_KEYS};
pub use settings::{output_mode_path, parse_binding, parse_settings, PROFILE_MARKER};
