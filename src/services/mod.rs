//! Services: subprocess plumbing, matching, and preset operations.

pub mod format;
pub mod matcher;
pub mod otd;
pub mod switcher;

pub use matcher::{find_matching_preset, match_score};
pub use otd::{OtdClient, OtdError};
pub use switcher::{Direction, PresetSwitcher};
