//! Password obfuscation mode and its control channel.
//!
//! While enabled, keystrokes are replaced by a small animation so nothing
//! typed ever reaches the bar. A separate `keybar keys password` process
//! flips the mode on a running stream instance through a file-based
//! control channel in the runtime directory: the stream writes a pid
//! presence file on startup, the sender checks it and drops a command
//! file, and the stream's timer tick picks the command up.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// Tooltip shown while obfuscation is active.
pub const PASSWORD_TOOLTIP: &str = "Password mode active - keystrokes are hidden \u{1f512}";

const ANIMATION_FRAMES: usize = 8;

/// Three 8-frame animation stories; one is picked per activation.
const ANIMATION_SETS: [[&str; ANIMATION_FRAMES]; 3] = [
    // Cat catching a butterfly
    [
        "( =^\u{ff65}\u{3c9}\u{ff65}^)  \u{1f98b}",
        "( =^\u{ff65}\u{3c9}\u{ff65}^) \u{1f98b}",
        "\u{e05}(=^\u{ff65}\u{3c9}\u{ff65}^=)\u{e05} \u{1f98b}",
        "\u{e05}(=^\u{ff65}\u{3c9}\u{ff65}^=)\u{1f98b}",
        "( =^\u{ff65}\u{3c9}\u{ff65}^) \u{2728}",
        "( \u{2f6}\u{1d54} \u{1d55} \u{1d54}\u{2f6} ) \u{2728}",
        "( =^\u{ff65}\u{3c9}\u{ff65}^) \u{1f338}",
        "( \u{2d8}\u{3c9}\u{2d8})\u{ff7d}\u{ff94}\u{ff67} \u{1f4a4}",
    ],
    // Dancing celebration
    [
        "\u{266a} \u{30fd}(\u{b0}\u{3007}\u{b0})\u{ff89} \u{266a}",
        "\u{266b} \u{669}(\u{25d5}\u{203f}\u{25d5})\u{6f6} \u{266b}",
        "\u{1f3b5} \u{ff3c}(^o^)\u{ff0f} \u{1f3b5}",
        "\u{2728} (\u{ff89}\u{25d5}\u{30ee}\u{25d5})\u{ff89}*:\u{ff65}\u{ff9f}\u{2727}",
        "\u{1f31f} \u{266a}(\u{b4}\u{25bd}\u{ff40}) \u{1f31f}",
        "\u{1f4ab} ~(\u{2d8}\u{25be}\u{2d8})~ \u{1f4ab}",
        "\u{1f3b6} \u{10da}(\u{2579}\u{25e1}\u{2579}\u{10da}) \u{1f3b6}",
        "\u{2728} (\u{2d8}\u{25be}\u{2d8})~ \u{2728} zzz",
    ],
    // Love story
    [
        "( \u{2f6}\u{1d54} \u{1d55} \u{1d54}\u{2f6} )",
        "( \u{2f6}\u{1d54} \u{1d55} \u{1d54}\u{2f6} ) \u{1f49d}",
        "( \u{2d8} \u{b3}\u{2d8}) \u{1f495}",
        "( \u{2d8} \u{b3}\u{2d8})\u{2665} \u{1f495}",
        "\u{1f495} \u{2665} \u{1f495}",
        "\u{2728}\u{1f496}\u{2728}",
        "( \u{25d5} \u{3c9} \u{25d5} ) \u{1f496}",
        "( \u{2d8}\u{25be}\u{2d8})~ \u{1f495}\u{1f4a4}",
    ],
];

const SET_NAMES: [&str; 3] = ["catching butterflies", "dancing party", "love story"];

/// Text colors cycled across animation frames.
const FRAME_COLORS: [&str; 6] = [
    "#ff69b4", "#ffd700", "#98fb98", "#87ceeb", "#dda0dd", "#f0e68c",
];

/// Animation state for password mode.
#[derive(Debug, Default)]
pub struct PasswordMode {
    enabled: bool,
    frame_index: usize,
    /// Rotates on every activation so repeated toggles vary the story.
    activations: usize,
}

impl PasswordMode {
    /// Creates the mode, disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether keystrokes are currently hidden.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Applies one control command.
    pub fn apply(&mut self, command: PasswordCommand) {
        let target = match command {
            PasswordCommand::On => true,
            PasswordCommand::Off => false,
            PasswordCommand::Toggle => !self.enabled,
        };
        if target && !self.enabled {
            self.activations += 1;
            self.frame_index = 0;
        }
        self.enabled = target;
    }

    /// Advances the animation by one keypress.
    pub fn advance(&mut self) {
        self.frame_index += 1;
    }

    /// The current animation frame text.
    #[must_use]
    pub fn frame(&self) -> String {
        let set_index = self.activations.saturating_sub(1) % ANIMATION_SETS.len();
        let frames = &ANIMATION_SETS[set_index];
        let art = frames[self.frame_index % ANIMATION_FRAMES];
        if self.frame_index == 0 {
            format!("{art} ({})", SET_NAMES[set_index])
        } else {
            art.to_string()
        }
    }

    /// The current frame wrapped in pango markup with a cycling color.
    #[must_use]
    pub fn frame_markup(&self) -> String {
        let color = FRAME_COLORS[self.frame_index % FRAME_COLORS.len()];
        format!(
            "<span weight=\"bold\" size=\"large\" color=\"{color}\">{}</span>",
            self.frame()
        )
    }
}

/// Command accepted over the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PasswordCommand {
    /// Enable obfuscation
    On,
    /// Disable obfuscation
    Off,
    /// Flip the current state
    Toggle,
}

impl FromStr for PasswordCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "on" | "1" => Ok(Self::On),
            "off" | "0" => Ok(Self::Off),
            "toggle" => Ok(Self::Toggle),
            other => bail!("unknown password command: {other}"),
        }
    }
}

impl PasswordCommand {
    fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Toggle => "toggle",
        }
    }
}

/// File-based control channel between the sender CLI and the stream loop.
#[derive(Debug, Clone)]
pub struct ControlChannel {
    dir: PathBuf,
}

impl ControlChannel {
    /// Channel in the default runtime directory.
    #[must_use]
    pub fn new() -> Self {
        let base = dirs::runtime_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("keybar");
        Self { dir: base }
    }

    /// Channel rooted at an explicit directory (tests).
    #[must_use]
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn pid_path(&self) -> PathBuf {
        self.dir.join("keys.pid")
    }

    fn command_path(&self) -> PathBuf {
        self.dir.join("keys.ctl")
    }

    /// Registers the calling stream instance as alive.
    pub fn register(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create runtime dir: {}", self.dir.display()))?;
        fs::write(self.pid_path(), std::process::id().to_string())
            .context("Failed to write presence file")?;
        Ok(())
    }

    /// Removes the presence file and any stale command; best effort.
    pub fn unregister(&self) {
        let _ = fs::remove_file(self.pid_path());
        let _ = fs::remove_file(self.command_path());
    }

    /// True when a registered instance still has a live process.
    #[must_use]
    pub fn instance_alive(&self) -> bool {
        let Ok(pid) = fs::read_to_string(self.pid_path()) else {
            return false;
        };
        let pid = pid.trim();
        if pid.is_empty() {
            return false;
        }
        PathBuf::from("/proc").join(pid).exists()
    }

    /// Delivers a command to the running instance.
    ///
    /// Fails when no live instance is registered; the write is a temp
    /// file renamed into place so the receiver never sees a torn command.
    pub fn send(&self, command: PasswordCommand) -> Result<()> {
        if !self.instance_alive() {
            bail!("No running keybar keys instance found");
        }
        let tmp = self.dir.join(".keys.ctl.tmp");
        fs::write(&tmp, command.as_str()).context("Failed to write command file")?;
        fs::rename(&tmp, self.command_path()).context("Failed to publish command file")?;
        Ok(())
    }

    /// Takes the pending command, if any. Invalid contents are discarded.
    pub fn poll(&self) -> Option<PasswordCommand> {
        let path = self.command_path();
        let content = fs::read_to_string(&path).ok()?;
        let _ = fs::remove_file(&path);
        content.parse().ok()
    }
}

impl Default for ControlChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cycles_state() {
        let mut mode = PasswordMode::new();
        assert!(!mode.enabled());
        mode.apply(PasswordCommand::Toggle);
        assert!(mode.enabled());
        mode.apply(PasswordCommand::Toggle);
        assert!(!mode.enabled());
        mode.apply(PasswordCommand::Off);
        assert!(!mode.enabled());
        mode.apply(PasswordCommand::On);
        assert!(mode.enabled());
    }

    #[test]
    fn test_first_frame_names_the_story() {
        let mut mode = PasswordMode::new();
        mode.apply(PasswordCommand::On);
        assert!(mode.frame().contains("(catching butterflies)"));
        mode.advance();
        assert!(!mode.frame().contains("catching butterflies"));
    }

    #[test]
    fn test_activation_rotates_story_sets() {
        let mut mode = PasswordMode::new();
        mode.apply(PasswordCommand::On);
        let first = mode.frame();
        mode.apply(PasswordCommand::Off);
        mode.apply(PasswordCommand::On);
        let second = mode.frame();
        assert_ne!(first, second);
    }

    #[test]
    fn test_frames_wrap_around() {
        let mut mode = PasswordMode::new();
        mode.apply(PasswordCommand::On);
        mode.advance();
        let frame_1 = mode.frame();
        for _ in 0..ANIMATION_FRAMES - 1 {
            mode.advance();
        }
        mode.advance();
        assert_eq!(mode.frame(), frame_1);
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!("on".parse::<PasswordCommand>().unwrap(), PasswordCommand::On);
        assert_eq!("1".parse::<PasswordCommand>().unwrap(), PasswordCommand::On);
        assert_eq!("0".parse::<PasswordCommand>().unwrap(), PasswordCommand::Off);
        assert_eq!(
            "toggle".parse::<PasswordCommand>().unwrap(),
            PasswordCommand::Toggle
        );
        assert!("shout".parse::<PasswordCommand>().is_err());
    }

    #[test]
    fn test_channel_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let channel = ControlChannel::at(dir.path().join("keybar"));

        // No instance registered: sending must fail.
        assert!(channel.send(PasswordCommand::Toggle).is_err());

        channel.register().unwrap();
        assert!(channel.instance_alive());
        channel.send(PasswordCommand::Toggle).unwrap();
        assert_eq!(channel.poll(), Some(PasswordCommand::Toggle));
        // Command is consumed.
        assert!(channel.poll().is_none());

        channel.unregister();
        assert!(!channel.instance_alive());
    }
}
