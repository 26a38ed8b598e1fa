//! Typing-speed tracking with inactivity-bounded sessions.
//!
//! Keystrokes accumulate into the open session until the gap since the
//! last press exceeds the die time; the session then closes into the
//! history and a new one starts. Current WPM reads the open session,
//! average WPM aggregates closed sessions only. The standard 5 characters
//! per word applies.

use std::time::{Duration, Instant};

/// Characters per word for WPM math.
const CHARS_PER_WORD: f64 = 5.0;

/// Sessions shorter than this report 0 current WPM.
const MIN_SESSION: Duration = Duration::from_secs(1);

/// One closed typing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingSession {
    /// Time between the first and last keypress of the session
    pub duration: Duration,
    /// Printable characters typed
    pub chars: u32,
}

/// Point-in-time snapshot of the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmStats {
    /// WPM of the open session
    pub current_wpm: f64,
    /// WPM across all closed sessions
    pub average_wpm: f64,
    /// Characters per second of the open session
    pub chars_per_second: f64,
    /// Closed session count
    pub session_count: usize,
    /// Characters in the open session
    pub current_chars: u32,
}

impl WpmStats {
    /// Tooltip lines for the bar.
    #[must_use]
    pub fn tooltip(&self) -> String {
        if self.session_count == 0 && self.current_wpm == 0.0 {
            return "Average WPM: 0\nCharacters: 0\nSessions: 0".to_string();
        }
        format!(
            "Average WPM: {:.1}\nCharacters: {}\nSessions: {}",
            self.average_wpm, self.current_chars, self.session_count
        )
    }
}

/// Words-per-minute tracker.
#[derive(Debug)]
pub struct WpmTracker {
    die_time: Duration,
    current_chars: u32,
    session_start: Option<Instant>,
    last_keypress: Option<Instant>,
    last_key: Option<String>,
    sessions: Vec<TypingSession>,
}

impl WpmTracker {
    /// Creates a tracker that closes sessions after `die_time` of
    /// inactivity.
    #[must_use]
    pub fn new(die_time: Duration) -> Self {
        Self {
            die_time,
            current_chars: 0,
            session_start: None,
            last_keypress: None,
            last_key: None,
            sessions: Vec::new(),
        }
    }

    /// Records one key press at the current time.
    pub fn record(&mut self, key_name: &str, printable: bool) {
        self.record_at(key_name, printable, Instant::now());
    }

    /// Records one key press at an explicit time (tests drive this).
    pub fn record_at(&mut self, key_name: &str, printable: bool, now: Instant) {
        // A key held down auto-repeats as identical presses; refresh the
        // clock but count nothing.
        if self.last_key.as_deref() == Some(key_name) {
            self.last_keypress = Some(now);
            return;
        }

        let gap_expired = self
            .last_keypress
            .is_none_or(|last| now.duration_since(last) > self.die_time);

        if gap_expired {
            self.close_session();
            self.session_start = Some(now);
            self.current_chars = 0;
        }

        if printable {
            self.current_chars += 1;
        }
        self.last_keypress = Some(now);
        self.last_key = Some(key_name.to_string());
    }

    /// Moves the open session into the history, if it counted anything.
    fn close_session(&mut self) {
        if let (Some(start), Some(last)) = (self.session_start, self.last_keypress) {
            if self.current_chars > 0 {
                let duration = last.duration_since(start);
                if duration > Duration::ZERO {
                    self.sessions.push(TypingSession {
                        duration,
                        chars: self.current_chars,
                    });
                }
            }
        }
    }

    /// WPM of the open session as of now.
    #[must_use]
    pub fn current_wpm(&self) -> f64 {
        self.current_wpm_at(Instant::now())
    }

    /// WPM of the open session at an explicit time.
    #[must_use]
    pub fn current_wpm_at(&self, now: Instant) -> f64 {
        let Some(start) = self.session_start else {
            return 0.0;
        };
        if self.current_chars == 0 {
            return 0.0;
        }
        let elapsed = now.duration_since(start);
        if elapsed < MIN_SESSION {
            return 0.0;
        }
        let words = f64::from(self.current_chars) / CHARS_PER_WORD;
        words / (elapsed.as_secs_f64() / 60.0)
    }

    /// Average WPM across closed sessions; 0 with no history.
    #[must_use]
    pub fn average_wpm(&self) -> f64 {
        if self.sessions.is_empty() {
            return 0.0;
        }
        let mut total_words = 0.0;
        let mut total_minutes = 0.0;
        for session in &self.sessions {
            total_words += f64::from(session.chars) / CHARS_PER_WORD;
            total_minutes += session.duration.as_secs_f64() / 60.0;
        }
        if total_minutes > 0.0 {
            total_words / total_minutes
        } else {
            0.0
        }
    }

    /// Closed sessions recorded so far.
    #[must_use]
    pub fn sessions(&self) -> &[TypingSession] {
        &self.sessions
    }

    /// Snapshot of all statistics at an explicit time.
    #[must_use]
    pub fn stats_at(&self, now: Instant) -> WpmStats {
        let current_wpm = self.current_wpm_at(now);
        let chars_per_second = if current_wpm > 0.0 {
            let elapsed = self
                .session_start
                .map_or(0.0, |start| now.duration_since(start).as_secs_f64());
            if elapsed > 0.0 {
                f64::from(self.current_chars) / elapsed
            } else {
                0.0
            }
        } else {
            0.0
        };

        WpmStats {
            current_wpm,
            average_wpm: self.average_wpm(),
            chars_per_second,
            session_count: self.sessions.len(),
            current_chars: self.current_chars,
        }
    }

    /// Snapshot as of now.
    #[must_use]
    pub fn stats(&self) -> WpmStats {
        self.stats_at(Instant::now())
    }
}

/// Navigation keys excluded from the printable set.
const NAVIGATION_KEYS: &[&str] = &[
    "LEFT", "RIGHT", "UP", "DOWN", "HOME", "END", "PAGEUP", "PAGEDOWN", "INSERT", "DELETE",
];

/// Control keys excluded from the printable set.
const CONTROL_KEYS: &[&str] = &[
    "ESC",
    "BACKSPACE",
    "PAUSE",
    "SCROLLLOCK",
    "NUMLOCK",
    "PRINT",
    "SYSRQ",
    "BREAK",
];

/// Modifier keys excluded from the printable set.
const MODIFIER_KEYS: &[&str] = &[
    "LEFTSHIFT",
    "RIGHTSHIFT",
    "LEFTCTRL",
    "RIGHTCTRL",
    "LEFTALT",
    "RIGHTALT",
    "LEFTMETA",
    "RIGHTMETA",
    "CAPSLOCK",
];

/// Symbol keys that produce a printable character.
const PRINTABLE_SYMBOLS: &[&str] = &[
    "SPACE",
    "APOSTROPHE",
    "GRAVE",
    "MINUS",
    "EQUAL",
    "LEFTBRACE",
    "RIGHTBRACE",
    "BACKSLASH",
    "SEMICOLON",
    "COMMA",
    "DOT",
    "SLASH",
    "ENTER",
    "TAB",
];

/// Whether a raw key name counts as one typed character.
#[must_use]
pub fn is_printable_key(key_name: &str) -> bool {
    let Some(clean) = key_name.strip_prefix("KEY_") else {
        return false;
    };

    if MODIFIER_KEYS.contains(&clean)
        || NAVIGATION_KEYS.contains(&clean)
        || CONTROL_KEYS.contains(&clean)
    {
        return false;
    }

    // Function keys: F1..F24
    if let Some(rest) = clean.strip_prefix('F') {
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
    }

    let mut chars = clean.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() || c.is_ascii_digit() {
            return true;
        }
    }

    PRINTABLE_SYMBOLS.contains(&clean)
}

/// Gauge color for the current typing speed, as a hex string.
///
/// Under 30 WPM the text stays uncolored. The ramp runs white → light
/// blue → light green → green → yellow → red, capped at 140 WPM.
#[must_use]
pub fn wpm_color(current_wpm: f64) -> Option<String> {
    if current_wpm < 30.0 {
        return None;
    }

    let (r, g, b) = if current_wpm < 50.0 {
        let t = (current_wpm - 30.0) / 20.0;
        (255.0 - t * 100.0, 255.0 - t * 50.0, 255.0)
    } else if current_wpm < 70.0 {
        let t = (current_wpm - 50.0) / 20.0;
        (155.0 - t * 55.0, 205.0 + t * 50.0, 255.0 - t * 155.0)
    } else if current_wpm < 90.0 {
        let t = (current_wpm - 70.0) / 20.0;
        (100.0 - t * 50.0, 255.0, 100.0 - t * 50.0)
    } else if current_wpm < 110.0 {
        let t = (current_wpm - 90.0) / 20.0;
        (50.0 + t * 205.0, 255.0, 50.0 - t * 50.0)
    } else {
        let t = ((current_wpm - 110.0) / 30.0).min(1.0);
        (255.0, 255.0 - t * 255.0, 0.0)
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (r, g, b) = (r as u8, g as u8, b as u8);
    Some(format!("#{r:02x}{g:02x}{b:02x}"))
}
