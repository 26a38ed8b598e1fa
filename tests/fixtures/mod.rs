//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Some fixtures are only used by a subset of the test binaries

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A canned `otd getallsettings` dump for an artist-mode tablet.
pub const ARTIST_SETTINGS_DUMP: &str = "\
--- Profile for 'Wacom CTL-472' ---
Output Mode: 'Artist Mode'
Tip Binding: Key Binding: { Key: Left Click }@0.85
Pen Bindings: 'Pen Binding: { Button: Pen Button 1 }'
Express Key Bindings: 'Key Binding: { Key: B }', 'Key Binding: { Key: E }'
Display area: 1920x1080@(960,540)
Tablet area: 152x95@(76,47.5)
";

/// Writes a preset JSON file matching the artist dump above.
pub fn write_artist_preset(dir: &Path, name: &str) -> PathBuf {
    let body = r#"{
  "Profiles": [{
    "OutputMode": { "Path": "OpenTabletDriver.Desktop.Output.LinuxArtistMode" },
    "Bindings": {
      "TipButton": {
        "Enable": true,
        "Settings": [{ "Property": "Button", "Value": "Left Click" }]
      },
      "PenButtons": [
        { "Enable": true, "Settings": [{ "Property": "Button", "Value": "Pen Button 1" }] }
      ],
      "AuxButtons": [
        { "Enable": true, "Settings": [{ "Property": "Key", "Value": "B" }] },
        { "Enable": true, "Settings": [{ "Property": "Key", "Value": "E" }] }
      ]
    }
  }]
}"#;
    write_preset(dir, name, body)
}

/// Writes a preset JSON file for a relative-mode gaming setup.
pub fn write_gaming_preset(dir: &Path, name: &str) -> PathBuf {
    let body = r#"{
  "Profiles": [{
    "OutputMode": { "Path": "OpenTabletDriver.Desktop.Output.RelativeMode" },
    "Bindings": {
      "PenButtons": [
        { "Enable": true, "Settings": [{ "Property": "Button", "Value": "Pen Button 2" }] }
      ],
      "AuxButtons": [
        { "Enable": true, "Settings": [{ "Property": "Keys", "Value": "LeftControl+Z" }] }
      ]
    }
  }]
}"#;
    write_preset(dir, name, body)
}

/// Writes an arbitrary preset body to `<dir>/<name>.json`.
pub fn write_preset(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(format!("{name}.json"));
    fs::write(&path, body).expect("Failed to write preset fixture");
    path
}

/// Writes an executable shell script and returns its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("Failed to write script fixture");
    let mut perms = fs::metadata(&path)
        .expect("Failed to stat script fixture")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("Failed to chmod script fixture");
    path
}

/// Fake `otd` that prints the artist settings dump for `getallsettings`
/// and succeeds silently for everything else. Each invocation appends one
/// line to `<dir>/otd.calls` so tests can count runs.
pub fn write_fake_otd(dir: &Path) -> PathBuf {
    let body = format!(
        "#!/bin/sh\n\
         echo \"$@\" >> \"{calls}\"\n\
         case \"$1\" in\n\
         getallsettings)\n\
         cat <<'SETTINGS'\n{dump}SETTINGS\n\
         ;;\n\
         esac\n\
         exit 0\n",
        calls = dir.join("otd.calls").display(),
        dump = ARTIST_SETTINGS_DUMP,
    );
    write_script(dir, "otd", &body)
}

/// Fake `otd` that always exits non-zero with a message on stderr.
pub fn write_failing_otd(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "otd-failing",
        "#!/bin/sh\necho 'daemon is not running' >&2\nexit 1\n",
    )
}

/// Fake `showmethekey-cli` emitting the given JSON event lines, then
/// exiting so the stream loop terminates.
pub fn write_fake_smtk(dir: &Path, events: &[&str]) -> PathBuf {
    let mut body = String::from("#!/bin/sh\n");
    for event in events {
        body.push_str(&format!("echo '{event}'\n"));
    }
    write_script(dir, "showmethekey-cli", &body)
}

/// Number of lines in the fake otd call log (0 when never called).
pub fn otd_call_count(dir: &Path) -> usize {
    fs::read_to_string(dir.join("otd.calls"))
        .map(|s| s.lines().count())
        .unwrap_or(0)
}

/// A scratch environment for E2E runs: config dir, runtime dir, preset
/// dir and fake binaries, all under one temp root.
pub struct TestEnv {
    /// Owns the temp tree for the test's lifetime
    pub root: TempDir,
}

impl TestEnv {
    /// Creates the directory layout with two presets and a fake otd.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp root");
        let env = Self { root };

        fs::create_dir_all(env.presets_dir()).expect("Failed to create presets dir");
        fs::create_dir_all(env.config_dir().join("keybar")).expect("Failed to create config dir");
        fs::create_dir_all(env.runtime_dir()).expect("Failed to create runtime dir");

        write_artist_preset(&env.presets_dir(), "artist");
        write_gaming_preset(&env.presets_dir(), "gaming");
        write_fake_otd(env.root.path());

        let config = format!(
            "[paths]\npresets_dir = \"{}\"\n",
            env.presets_dir().display()
        );
        fs::write(env.config_dir().join("keybar").join("config.toml"), config)
            .expect("Failed to write config fixture");

        env
    }

    /// XDG config root (contains `keybar/config.toml`).
    pub fn config_dir(&self) -> PathBuf {
        self.root.path().join("config")
    }

    /// XDG runtime root for the control channel.
    pub fn runtime_dir(&self) -> PathBuf {
        self.root.path().join("runtime")
    }

    /// The preset directory referenced by the config file.
    pub fn presets_dir(&self) -> PathBuf {
        self.root.path().join("presets")
    }

    /// Path of the fake otd script.
    pub fn otd_bin(&self) -> PathBuf {
        self.root.path().join("otd")
    }

    /// Configures a command with the environment overrides.
    pub fn apply(&self, command: &mut std::process::Command) {
        command
            .env("XDG_CONFIG_HOME", self.config_dir())
            .env("XDG_RUNTIME_DIR", self.runtime_dir())
            .env("KEYBAR_OTD_BIN", self.otd_bin());
    }
}
