//! The keystroke display loop.
//!
//! Spawns `showmethekey-cli`, feeds its JSON event stream through the
//! accumulator and WPM tracker, and emits one output line per visible
//! change. A timer thread shares the state behind one mutex and handles
//! inactivity decay plus control-channel commands.

use crate::constants::{SMTK_BIN, SMTK_BIN_ENV};
use crate::keys::accumulator::{AccumulatorOptions, KeyAccumulator};
use crate::keys::password::{ControlChannel, PasswordMode, PASSWORD_TOOLTIP};
use crate::keys::render::{keys_block, render_plain, RenderOptions};
use crate::keys::wpm::{is_printable_key, WpmTracker};
use crate::models::StatusBlock;
use crate::parser::{parse_event_line, KeyState};
use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Timer granularity for decay and control-channel polling.
const TICK: Duration = Duration::from_millis(100);

/// Options for one stream run.
#[derive(Debug, Clone, Copy)]
pub struct StreamOptions {
    /// Clear the buffer after this much inactivity; `None` disables decay
    pub timeout: Option<Duration>,
    /// Accumulator behavior
    pub accumulator: AccumulatorOptions,
    /// Unit-list rendering
    pub render: RenderOptions,
    /// Enable WPM tracking with this die time
    pub wpm_die_time: Option<Duration>,
    /// Emit status-bar JSON instead of plain text
    pub json: bool,
}

/// State shared between the reader loop and the timer thread.
struct Shared {
    accumulator: KeyAccumulator,
    wpm: Option<WpmTracker>,
    password: PasswordMode,
}

impl Shared {
    /// Renders the current buffer as one output line.
    fn render_line(&self, options: &StreamOptions) -> Result<String> {
        if options.json {
            let stats = self.wpm.as_ref().map(WpmTracker::stats);
            let block = keys_block(
                self.accumulator.units(),
                options.render,
                stats.as_ref(),
            );
            Ok(block.to_json()?)
        } else {
            Ok(render_plain(self.accumulator.units(), options.render))
        }
    }

    /// Renders the password animation frame as one output line.
    fn render_password_line(&self, options: &StreamOptions) -> Result<String> {
        if options.json {
            let mut tooltip = PASSWORD_TOOLTIP.to_string();
            if let Some(stats) = self.wpm.as_ref().map(WpmTracker::stats) {
                tooltip.push_str(" | ");
                tooltip.push_str(&stats.tooltip());
            }
            let block = StatusBlock::with_tooltip(self.password.frame_markup(), tooltip);
            Ok(block.to_json()?)
        } else {
            Ok(self.password.frame())
        }
    }
}

fn emit(line: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{line}")?;
    out.flush()
}

fn smtk_binary() -> PathBuf {
    std::env::var_os(SMTK_BIN_ENV).map_or_else(|| PathBuf::from(SMTK_BIN), PathBuf::from)
}

fn spawn_smtk(options: &StreamOptions) -> Result<Child> {
    let binary = smtk_binary();
    match Command::new(&binary)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => {
            info!(binary = %binary.display(), pid = child.id(), "event source started");
            Ok(child)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // The bar still needs something to show for a missing backend.
            if options.json {
                let block = StatusBlock::text(format!("\u{274c} {SMTK_BIN} not found"));
                let _ = emit(&block.to_json()?);
            }
            bail!("{SMTK_BIN} not found. Please install it.");
        }
        Err(e) => Err(e).context(format!("Failed to start {SMTK_BIN}")),
    }
}

/// Kills the event source; harmless when it already exited.
fn cleanup(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Guard removing the control-channel presence file on all exits.
struct Presence(ControlChannel);

impl Drop for Presence {
    fn drop(&mut self) {
        self.0.unregister();
    }
}

/// Runs the keystroke display until the event source closes.
pub fn run(options: StreamOptions) -> Result<()> {
    let mut child = spawn_smtk(&options)?;

    let channel = ControlChannel::new();
    channel.register()?;
    let _presence = Presence(channel.clone());

    let shared = Arc::new(Mutex::new(Shared {
        accumulator: KeyAccumulator::new(options.accumulator),
        wpm: options.wpm_die_time.map(WpmTracker::new),
        password: PasswordMode::new(),
    }));
    let running = Arc::new(AtomicBool::new(true));

    spawn_timer(&shared, &running, channel, options);

    if options.json {
        if let Ok(state) = shared.lock() {
            let _ = emit(&state.render_line(&options)?);
        }
    }

    let stdout = child
        .stdout
        .take()
        .context("event source has no stdout handle")?;
    let reader = BufReader::new(stdout);

    for line in reader.lines() {
        let Ok(line) = line else { break };
        let Some(event) = parse_event_line(&line) else {
            continue;
        };

        let mut state = match shared.lock() {
            Ok(state) => state,
            Err(_) => break,
        };

        if state.password.enabled() {
            if event.state == KeyState::Pressed {
                state.password.advance();
            }
            let line = state.render_password_line(&options)?;
            drop(state);
            if emit(&line).is_err() {
                break;
            }
            continue;
        }

        if event.state == KeyState::Pressed && !event.is_button() {
            if let Some(wpm) = state.wpm.as_mut() {
                wpm.record(&event.key_name, is_printable_key(&event.key_name));
            }
        }

        let changed = state.accumulator.handle_event(&event, Instant::now());
        if changed {
            let line = state.render_line(&options)?;
            drop(state);
            if emit(&line).is_err() {
                break;
            }
        }
    }

    running.store(false, Ordering::Relaxed);
    info!("event source closed, shutting down");
    cleanup(&mut child);
    Ok(())
}

/// Timer thread: inactivity decay and control-channel polling.
fn spawn_timer(
    shared: &Arc<Mutex<Shared>>,
    running: &Arc<AtomicBool>,
    channel: ControlChannel,
    options: StreamOptions,
) {
    let shared = Arc::clone(shared);
    let running = Arc::clone(running);

    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            thread::sleep(TICK);

            let Ok(mut state) = shared.lock() else {
                return;
            };

            if let Some(command) = channel.poll() {
                debug!(?command, "control command received");
                state.password.apply(command);
                match state.render_line(&options) {
                    Ok(line) if !state.password.enabled() => {
                        let _ = emit(&line);
                    }
                    _ => {}
                }
            }

            if let Some(timeout) = options.timeout {
                if state.accumulator.clear_if_idle(timeout, Instant::now()) {
                    debug!("inactivity timeout, buffer cleared");
                    match state.render_line(&options) {
                        Ok(line) => {
                            let _ = emit(&line);
                        }
                        Err(e) => warn!("failed to render cleared state: {e}"),
                    }
                }
            }
        }
    });
}
