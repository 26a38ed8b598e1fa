//! Parser for `showmethekey-cli` JSON event lines.
//!
//! Each line on the child's stdout is one JSON object; the fields used
//! here are `key_name` ("KEY_A", "BTN_LEFT", …) and `state_name`
//! ("PRESSED"/"RELEASED"). Anything else on the stream (banners, partial
//! lines, unknown events) is skipped without stopping the loop.

use serde::Deserialize;

/// Key names that are dropped entirely because the upstream daemon
/// reports broken press/release pairs for them.
pub const BLOCKED_KEYS: &[&str] = &["KEY_CAMERA"];

/// Press/release state of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Key went down
    Pressed,
    /// Key went up
    Released,
}

/// One usable key event from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Raw key name with its `KEY_`/`BTN_` prefix
    pub key_name: String,
    /// Press or release
    pub state: KeyState,
}

impl KeyEvent {
    /// True for mouse-button events (`BTN_*`).
    #[must_use]
    pub fn is_button(&self) -> bool {
        self.key_name.starts_with("BTN_")
    }
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    key_name: String,
    #[serde(default)]
    state_name: String,
}

/// Parses one stream line into an event.
///
/// Returns `None` for non-JSON lines, malformed JSON, non-key events,
/// unknown states, and blocklisted keys.
#[must_use]
pub fn parse_event_line(line: &str) -> Option<KeyEvent> {
    let line = line.trim();
    if !line.starts_with('{') {
        return None;
    }

    let raw: RawEvent = serde_json::from_str(line).ok()?;
    if !raw.key_name.starts_with("KEY_") && !raw.key_name.starts_with("BTN_") {
        return None;
    }
    if BLOCKED_KEYS.contains(&raw.key_name.as_str()) {
        return None;
    }

    let state = match raw.state_name.as_str() {
        "PRESSED" => KeyState::Pressed,
        "RELEASED" => KeyState::Released,
        _ => return None,
    };

    Some(KeyEvent {
        key_name: raw.key_name,
        state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pressed_event() {
        let event = parse_event_line(
            r#"{"event_name":"KEYBOARD_KEY","key_name":"KEY_A","state_name":"PRESSED"}"#,
        )
        .unwrap();
        assert_eq!(event.key_name, "KEY_A");
        assert_eq!(event.state, KeyState::Pressed);
        assert!(!event.is_button());
    }

    #[test]
    fn test_parse_button_event() {
        let event =
            parse_event_line(r#"{"key_name":"BTN_LEFT","state_name":"RELEASED"}"#).unwrap();
        assert!(event.is_button());
        assert_eq!(event.state, KeyState::Released);
    }

    #[test]
    fn test_garbage_lines_are_skipped() {
        assert!(parse_event_line("").is_none());
        assert!(parse_event_line("starting up...").is_none());
        assert!(parse_event_line("{ truncated").is_none());
        assert!(parse_event_line(r#"{"key_name":"REL_X","state_name":"PRESSED"}"#).is_none());
        assert!(parse_event_line(r#"{"key_name":"KEY_A","state_name":"HELD"}"#).is_none());
    }

    #[test]
    fn test_blocked_key_is_dropped() {
        assert!(
            parse_event_line(r#"{"key_name":"KEY_CAMERA","state_name":"PRESSED"}"#).is_none()
        );
    }
}
