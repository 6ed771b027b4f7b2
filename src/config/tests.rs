use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::load::{default_config_path, resolve_config_path};
use super::schema::*;

/// Process environment is global; tests touching it run one at a time.
static ENV: Mutex<()> = Mutex::new(());

/// Environment overrides restored when dropped. Holds `ENV` while alive.
struct ScopedEnv {
    saved: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV.lock().unwrap_or_else(|poisoned| poisoned.into_inner()),
        }
    }

    fn set(mut self, key: &'static str, val: impl AsRef<std::ffi::OsStr>) -> Self {
        self.saved.push((key, std::env::var_os(key)));
        unsafe { std::env::set_var(key, val) };
        self
    }

    fn unset(mut self, key: &'static str) -> Self {
        self.saved.push((key, std::env::var_os(key)));
        unsafe { std::env::remove_var(key) };
        self
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, old) in self.saved.drain(..).rev() {
            match old {
                Some(v) => unsafe { std::env::set_var(key, v) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn explicit_config_path_wins_over_xdg() {
    let _env = ScopedEnv::new()
        .set("CADENZA_CONFIG_PATH", "/etc/cadenza.toml")
        .set("XDG_CONFIG_HOME", "/tmp/xdg");
    assert_eq!(resolve_config_path(), Some(PathBuf::from("/etc/cadenza.toml")));
}

#[test]
fn config_path_lives_under_xdg_or_home() {
    let env = ScopedEnv::new()
        .unset("CADENZA_CONFIG_PATH")
        .set("XDG_CONFIG_HOME", "/tmp/xdg")
        .set("HOME", "/tmp/home");
    assert_eq!(
        resolve_config_path(),
        Some(PathBuf::from("/tmp/xdg/cadenza/config.toml"))
    );

    let _env = env.unset("XDG_CONFIG_HOME");
    assert_eq!(
        default_config_path(),
        Some(PathBuf::from("/tmp/home/.config/cadenza/config.toml"))
    );
}

#[test]
fn restart_threshold_env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(
        dir.path(),
        "[playback]\nrestart_threshold_ms = 3000\nrepeat = true\n",
    );
    let _env = ScopedEnv::new()
        .set("CADENZA_CONFIG_PATH", &cfg)
        .set("CADENZA__PLAYBACK__RESTART_THRESHOLD_MS", "8000")
        .unset("CADENZA__PLAYBACK__POLL_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.restart_threshold_ms, 8000);
    assert!(s.playback.repeat);
    assert_eq!(s.playback.poll_interval_ms, 1000);
}

#[test]
fn missing_config_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let _env = ScopedEnv::new()
        .set("CADENZA_CONFIG_PATH", dir.path().join("absent.toml"))
        .unset("CADENZA__PLAYBACK__RESTART_THRESHOLD_MS")
        .unset("CADENZA__PLAYBACK__POLL_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.restart_threshold_ms, 5000);
    assert_eq!(s.library.extensions, LibrarySettings::default().extensions);
}

#[test]
fn defaults_match_player_behaviour() {
    let s = Settings::default();
    assert!(!s.playback.shuffle);
    assert!(!s.playback.repeat);
    assert_eq!(s.playback.poll_interval_ms, 1000);
    assert_eq!(s.playback.restart_threshold_ms, 5000);
    assert_eq!(s.library.unknown_artist, "Unknown artist");
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_poll_interval() {
    let mut s = Settings::default();
    s.playback.poll_interval_ms = 0;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = write_config(
        dir.path(),
        r#"
[playback]
shuffle = true
repeat = true
poll_interval_ms = 250
restart_threshold_ms = 3000

[library]
root = "/srv/music"
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
max_depth = 3
unknown_artist = "Artista desconocido"

[ui]
header_text = "hello"

[controls]
scrub_seconds = 9

[log]
filter = "debug"
"#,
    );

    let _env = ScopedEnv::new()
        .set("CADENZA_CONFIG_PATH", &cfg_path)
        .unset("CADENZA__PLAYBACK__POLL_INTERVAL_MS")
        .unset("CADENZA__PLAYBACK__RESTART_THRESHOLD_MS");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert!(s.playback.repeat);
    assert_eq!(s.playback.poll_interval_ms, 250);
    assert_eq!(s.playback.restart_threshold_ms, 3000);
    assert_eq!(
        s.library.root.as_deref(),
        Some(Path::new("/srv/music"))
    );
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(s.library.unknown_artist, "Artista desconocido");
    assert_eq!(s.library.unknown_title, "Unknown title");
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.log.filter, "debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = write_config(
        dir.path(),
        r#"
[playback]
poll_interval_ms = 1000
"#,
    );

    let _env = ScopedEnv::new()
        .set("CADENZA_CONFIG_PATH", &cfg_path)
        .set("CADENZA__PLAYBACK__POLL_INTERVAL_MS", "500");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.poll_interval_ms, 500);
}
