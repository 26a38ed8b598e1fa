//! Keystroke display: accumulation, rendering, WPM, password mode.

pub mod accumulator;
pub mod password;
pub mod render;
pub mod stream;
pub mod symbols;
pub mod wpm;

pub use accumulator::{AccumulatorOptions, KeyAccumulator, KeyUnit};
pub use password::{ControlChannel, PasswordCommand, PasswordMode};
pub use render::RenderOptions;
pub use stream::StreamOptions;
pub use symbols::DisplayMode;
pub use wpm::{WpmStats, WpmTracker};
