//! Integration tests for preset switching and status assembly.

mod fixtures;

use fixtures::{write_artist_preset, write_fake_otd, write_gaming_preset};
use keybar::models::PresetLibrary;
use keybar::services::{Direction, OtdClient, PresetSwitcher};
use std::time::Duration;
use tempfile::TempDir;

struct Setup {
    _root: TempDir,
    switcher: PresetSwitcher,
    root_path: std::path::PathBuf,
}

fn setup() -> Setup {
    let root = TempDir::new().unwrap();
    let presets = root.path().join("presets");
    std::fs::create_dir_all(&presets).unwrap();
    write_artist_preset(&presets, "artist");
    write_gaming_preset(&presets, "gaming");
    let otd = write_fake_otd(root.path());

    let client = OtdClient::with_binary(&otd).with_backoff(Duration::ZERO);
    let switcher = PresetSwitcher::new(client, PresetLibrary::new(&presets));
    let root_path = root.path().to_path_buf();
    Setup {
        _root: root,
        switcher,
        root_path,
    }
}

#[test]
fn test_current_preset_matches_live_settings() {
    let mut setup = setup();
    assert_eq!(setup.switcher.current_preset().as_deref(), Some("artist"));
}

#[test]
fn test_cycle_next_applies_the_following_preset() {
    let mut setup = setup();
    // Current matches "artist"; next in sorted order is "gaming".
    assert_eq!(
        setup.switcher.cycle(Direction::Next).as_deref(),
        Some("gaming")
    );

    let log = std::fs::read_to_string(setup.root_path.join("otd.calls")).unwrap();
    assert!(log.contains("applypreset gaming"));
}

#[test]
fn test_cycle_prev_wraps_to_the_last_preset() {
    let mut setup = setup();
    // "artist" is first; prev wraps around to "gaming".
    assert_eq!(
        setup.switcher.cycle(Direction::Prev).as_deref(),
        Some("gaming")
    );
}

#[test]
fn test_status_block_shows_preset_and_bindings() {
    let mut setup = setup();
    let block = setup.switcher.status_block();

    assert!(block.text.contains("artist"));
    assert_eq!(block.class.as_deref(), Some("normal"));

    let tooltip = block.tooltip.unwrap();
    assert!(tooltip.contains("Tablet: Wacom CTL-472"));
    assert!(tooltip.contains("Mode: Artist Mode"));
    assert!(tooltip.contains("<b>Express Keys:</b>"));
    assert!(tooltip.contains("<b>artist</b>"));
    assert!(tooltip.contains("  gaming"));
    assert!(tooltip.contains("Click to cycle forward"));
}

#[test]
fn test_status_block_without_presets() {
    let root = TempDir::new().unwrap();
    let presets = root.path().join("presets");
    std::fs::create_dir_all(&presets).unwrap();
    let otd = write_fake_otd(root.path());

    let client = OtdClient::with_binary(&otd).with_backoff(Duration::ZERO);
    let mut switcher = PresetSwitcher::new(client, PresetLibrary::new(&presets));

    let block = switcher.status_block();
    assert!(block.text.contains("No Presets"));
    assert_eq!(block.class.as_deref(), Some("error"));
    // The daemon is never polled when there is nothing to match.
    assert_eq!(fixtures::otd_call_count(root.path()), 0);
}

#[test]
fn test_status_block_reports_daemon_failure() {
    let root = TempDir::new().unwrap();
    let presets = root.path().join("presets");
    std::fs::create_dir_all(&presets).unwrap();
    write_artist_preset(&presets, "artist");
    let otd = fixtures::write_failing_otd(root.path());

    let client = OtdClient::with_binary(&otd).with_backoff(Duration::ZERO);
    let mut switcher = PresetSwitcher::new(client, PresetLibrary::new(&presets));

    let block = switcher.status_block();
    assert_eq!(block.class.as_deref(), Some("error"));
    let tooltip = block.tooltip.unwrap();
    assert!(tooltip.contains("Failed to get tablet settings"));
    assert!(tooltip.contains("daemon is not running"));
}

#[test]
fn test_human_status_lines() {
    let mut setup = setup();
    let lines = setup.switcher.human_status();
    assert_eq!(
        lines,
        vec![
            "Tablet: Wacom CTL-472".to_string(),
            "Current Preset: artist".to_string(),
            "Output Mode: Artist Mode".to_string(),
        ]
    );
}
