//! Client for the `otd` command-line daemon interface.
//!
//! All tablet operations go through one [`OtdClient`]. The client retries
//! transient failures with a fixed backoff, treats a missing executable as
//! fatal without retry, and caches the settings snapshot so
//! `otd getallsettings` runs at most once per process invocation.

use crate::constants::{OTD_BIN, OTD_BIN_ENV};
use crate::models::TabletSettings;
use crate::parser::{parse_settings, PROFILE_MARKER};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Attempts for the settings query; it backs the whole status display, so
/// it is more persistent than other commands.
const SETTINGS_RETRIES: u32 = 5;
/// Attempts for every other command.
const DEFAULT_RETRIES: u32 = 3;
/// Per-attempt timeout for the settings query.
const SETTINGS_TIMEOUT: Duration = Duration::from_secs(15);
/// Per-attempt timeout for every other command.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Pause between attempts after a timeout or non-zero exit.
const RETRY_BACKOFF: Duration = Duration::from_secs(6);
/// Shorter pause after an unexpected I/O error.
const ERROR_BACKOFF: Duration = Duration::from_secs(3);
/// Poll interval while waiting on a running child.
const WAIT_TICK: Duration = Duration::from_millis(50);

/// Terminal failure of an `otd` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtdError {
    /// The executable is not installed; never retried.
    NotFound,
    /// All attempts failed; carries the user-visible reason.
    Failed(String),
}

impl fmt::Display for OtdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "OpenTabletDriver not found - is it installed?"),
            Self::Failed(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for OtdError {}

/// Why a single attempt failed (decides the backoff and the final message).
enum AttemptError {
    Timeout,
    NonZero(String),
    MissingMarker,
    Io(String),
}

/// Stateful `otd` wrapper with retry, backoff and a settings cache.
#[derive(Debug)]
pub struct OtdClient {
    binary: PathBuf,
    retry_backoff: Duration,
    error_backoff: Duration,
    last_error: Option<String>,
    settings_fetched: bool,
    cached_settings: Option<TabletSettings>,
}

impl OtdClient {
    /// Creates a client resolving the binary from the environment override
    /// or the default name.
    #[must_use]
    pub fn new() -> Self {
        let binary = std::env::var_os(OTD_BIN_ENV)
            .map_or_else(|| PathBuf::from(OTD_BIN), PathBuf::from);
        Self {
            binary,
            retry_backoff: RETRY_BACKOFF,
            error_backoff: ERROR_BACKOFF,
            last_error: None,
            settings_fetched: false,
            cached_settings: None,
        }
    }

    /// Creates a client for a specific binary path.
    #[must_use]
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        let mut client = Self::new();
        client.binary = binary.into();
        client
    }

    /// Overrides the retry backoffs (tests use zero to avoid sleeping).
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self.error_backoff = backoff;
        self
    }

    /// Last user-visible error string, for tooltips.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current tablet settings, polling the daemon on first use.
    ///
    /// The result of the first poll, success or failure, is cached for the
    /// remainder of the process; later calls never spawn the command again.
    pub fn current_settings(&mut self) -> Option<&TabletSettings> {
        if !self.settings_fetched {
            self.settings_fetched = true;
            self.cached_settings = self.fetch_settings();
        }
        self.cached_settings.as_ref()
    }

    /// Applies a preset by name. Returns false when the command failed.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        self.run(&["applypreset", name]).is_ok()
    }

    fn fetch_settings(&mut self) -> Option<TabletSettings> {
        let output = self.run(&["getallsettings"]).ok()?;
        let settings = parse_settings(&output);
        if settings.is_meaningful() {
            Some(settings)
        } else {
            self.last_error =
                Some("OpenTabletDriver returned incomplete tablet information".to_string());
            None
        }
    }

    /// Runs one `otd` command with the retry policy for its kind.
    pub fn run(&mut self, args: &[&str]) -> Result<String, OtdError> {
        self.last_error = None;

        let is_settings_query = args.first() == Some(&"getallsettings");
        let (retries, timeout) = if is_settings_query {
            (SETTINGS_RETRIES, SETTINGS_TIMEOUT)
        } else {
            (DEFAULT_RETRIES, DEFAULT_TIMEOUT)
        };

        let mut last_attempt = None;
        for attempt in 0..retries {
            if attempt > 0 {
                let backoff = match last_attempt {
                    Some(AttemptError::Io(_)) => self.error_backoff,
                    _ => self.retry_backoff,
                };
                thread::sleep(backoff);
            }

            match self.run_once(args, timeout) {
                Ok(output) => {
                    // An incomplete settings dump is as useless as a failed
                    // one; retry until the profile marker shows up.
                    if is_settings_query
                        && (output.is_empty() || !output.contains(PROFILE_MARKER))
                    {
                        last_attempt = Some(AttemptError::MissingMarker);
                        continue;
                    }
                    return Ok(output);
                }
                Err(AttemptError::Io(msg)) if is_not_found(&msg) => {
                    self.last_error = Some(OtdError::NotFound.to_string());
                    return Err(OtdError::NotFound);
                }
                Err(e) => last_attempt = Some(e),
            }
        }

        let reason = match last_attempt {
            Some(AttemptError::Timeout) => {
                format!("OpenTabletDriver timeout after {retries} attempts")
            }
            Some(AttemptError::NonZero(stderr)) => {
                let detail = if stderr.is_empty() {
                    "Unknown error".to_string()
                } else {
                    stderr
                };
                format!("OpenTabletDriver command failed: {detail}")
            }
            Some(AttemptError::MissingMarker) => {
                "OpenTabletDriver returned incomplete settings".to_string()
            }
            Some(AttemptError::Io(msg)) => format!("Unexpected error: {msg}"),
            None => "OpenTabletDriver command failed".to_string(),
        };
        self.last_error = Some(reason.clone());
        Err(OtdError::Failed(reason))
    }

    /// One attempt: spawn, wait against a deadline, kill on expiry.
    fn run_once(&self, args: &[&str], timeout: Duration) -> Result<String, AttemptError> {
        let mut child = Command::new(&self.binary)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AttemptError::Io(io_error_message(&e)))?;

        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(AttemptError::Timeout);
                    }
                    thread::sleep(WAIT_TICK);
                }
                Err(e) => return Err(AttemptError::Io(io_error_message(&e))),
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| AttemptError::Io(io_error_message(&e)))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(AttemptError::NonZero(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

impl Default for OtdClient {
    fn default() -> Self {
        Self::new()
    }
}

fn io_error_message(e: &io::Error) -> String {
    if e.kind() == io::ErrorKind::NotFound {
        "not found".to_string()
    } else {
        e.to_string()
    }
}

/// Matches the platform spellings of "executable missing".
fn is_not_found(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("not found")
        || message.contains("no such file")
        || message.contains("cannot find")
        || message.contains("os error 2")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(is_not_found("not found"));
        assert!(is_not_found("No such file or directory (os error 2)"));
        assert!(!is_not_found("permission denied"));
    }

    #[test]
    fn test_otd_error_display() {
        assert_eq!(
            OtdError::NotFound.to_string(),
            "OpenTabletDriver not found - is it installed?"
        );
        assert_eq!(OtdError::Failed("boom".into()).to_string(), "boom");
    }
}
