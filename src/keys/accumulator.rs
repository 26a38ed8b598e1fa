//! Rolling buffer of recent key combinations.
//!
//! Each press either bumps the newest unit's repeat count, replaces it
//! (when a compound combination subsumes or overlaps it), or pushes a new
//! unit, evicting the oldest past the configured maximum. The whole buffer
//! decays after a period of inactivity, driven by an external timer tick.

use crate::keys::symbols::{format_combination, DisplayMode};
use crate::parser::{KeyEvent, KeyState};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// One displayed key combination with its repeat count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyUnit {
    /// Formatted combination string
    pub combo: String,
    /// Consecutive repeat count
    pub count: u32,
}

/// Accumulator options.
#[derive(Debug, Clone, Copy)]
pub struct AccumulatorOptions {
    /// Maximum retained units; older ones are evicted
    pub max_units: usize,
    /// Minimum display width of a single-key unit
    pub min_units: usize,
    /// Rendering mode for combinations
    pub mode: DisplayMode,
}

impl Default for AccumulatorOptions {
    fn default() -> Self {
        Self {
            max_units: 3,
            min_units: 1,
            mode: DisplayMode::Compose,
        }
    }
}

/// Stateful accumulator over the key event stream.
#[derive(Debug)]
pub struct KeyAccumulator {
    options: AccumulatorOptions,
    pressed: HashSet<String>,
    caps_lock: bool,
    units: Vec<KeyUnit>,
    last_activity: Option<Instant>,
}

impl KeyAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new(options: AccumulatorOptions) -> Self {
        Self {
            options,
            pressed: HashSet::new(),
            caps_lock: false,
            units: Vec::new(),
            last_activity: None,
        }
    }

    /// Units, most recent first.
    #[must_use]
    pub fn units(&self) -> &[KeyUnit] {
        &self.units
    }

    /// True when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn current_combination(&self) -> String {
        format_combination(
            &self.pressed,
            self.options.mode,
            self.caps_lock,
            self.options.min_units,
        )
    }

    /// Feeds one event; returns true when the displayed buffer changed.
    pub fn handle_event(&mut self, event: &KeyEvent, now: Instant) -> bool {
        match event.state {
            KeyState::Pressed => self.handle_press(event, now),
            KeyState::Released => self.handle_release(event, now),
        }
    }

    fn handle_press(&mut self, event: &KeyEvent, now: Instant) -> bool {
        self.pressed.insert(event.key_name.clone());
        if event.key_name == "KEY_CAPSLOCK" {
            self.caps_lock = !self.caps_lock;
        }

        let combination = self.current_combination();
        if combination.is_empty() {
            return false;
        }

        enum Action {
            Increment,
            Replace,
            Push,
        }

        let action = match self.units.first() {
            Some(head) if head.combo == combination => Action::Increment,
            Some(head) => {
                let head_is_single = !head.combo.contains(" + ");
                let combo_is_compound = combination.contains(" + ");
                if head_is_single && combo_is_compound {
                    // A held key grew into a chord: swallow the single.
                    let parts: Vec<&str> = combination.split(" + ").collect();
                    if parts.contains(&head.combo.as_str()) {
                        Action::Replace
                    } else {
                        Action::Push
                    }
                } else if !head_is_single && combo_is_compound {
                    let head_parts: HashSet<&str> = head.combo.split(" + ").collect();
                    let combo_parts: HashSet<&str> = combination.split(" + ").collect();
                    if head_parts.intersection(&combo_parts).next().is_some() {
                        Action::Replace
                    } else {
                        Action::Push
                    }
                } else {
                    Action::Push
                }
            }
            None => Action::Push,
        };

        match action {
            Action::Increment => {
                if let Some(head) = self.units.first_mut() {
                    head.count += 1;
                }
            }
            Action::Replace => {
                if let Some(head) = self.units.first_mut() {
                    *head = KeyUnit {
                        combo: combination,
                        count: 1,
                    };
                }
            }
            Action::Push => {
                self.units.insert(
                    0,
                    KeyUnit {
                        combo: combination,
                        count: 1,
                    },
                );
                self.units.truncate(self.options.max_units);
            }
        }

        self.last_activity = Some(now);
        true
    }

    fn handle_release(&mut self, event: &KeyEvent, now: Instant) -> bool {
        self.pressed.remove(&event.key_name);
        if self.pressed.is_empty() {
            return false;
        }

        // Keys still held after a release only matter when they form a
        // compound; a lone leftover key would repeat as its own press.
        let combination = self.current_combination();
        if combination.is_empty() || !combination.contains(" + ") {
            return false;
        }

        let unit = KeyUnit {
            combo: combination,
            count: 1,
        };
        if let Some(head) = self.units.first_mut() {
            *head = unit;
        } else {
            self.units.insert(0, unit);
            self.units.truncate(self.options.max_units);
        }

        self.last_activity = Some(now);
        true
    }

    /// Clears the buffer when inactivity reached `timeout`; returns true
    /// when something was cleared. Timer threads call this every tick.
    pub fn clear_if_idle(&mut self, timeout: Duration, now: Instant) -> bool {
        if self.units.is_empty() {
            return false;
        }
        let Some(last) = self.last_activity else {
            return false;
        };
        if now.duration_since(last) >= timeout {
            self.units.clear();
            true
        } else {
            false
        }
    }
}
