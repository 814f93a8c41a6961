use super::load::{default_config_path, default_state_dir, resolve_config_path};
use super::schema::*;
use crate::error::SettingsError;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

// Tests below mutate process-wide env vars; hold this while they run.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Sets (`Some`) or clears (`None`) a variable and puts the old value back on drop.
struct EnvGuard {
    key: &'static str,
    old: Option<OsString>,
}

impl EnvGuard {
    fn new(key: &'static str, val: Option<&str>) -> Self {
        let old = std::env::var_os(key);
        apply(key, val.map(OsString::from));
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        apply(self.key, self.old.take());
    }
}

fn apply(key: &str, val: Option<OsString>) {
    // SAFETY: callers hold `env_lock`.
    unsafe {
        match val {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
}

#[test]
fn resolve_config_path_prefers_coverdeck_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::new("COVERDECK_CONFIG_PATH", Some("/tmp/coverdeck-test-config.toml"));
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/coverdeck-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::new("XDG_CONFIG_HOME", Some("/tmp/xdg-config-home"));
    let _g2 = EnvGuard::new("HOME", Some("/tmp/home-should-not-win"));

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/xdg-config-home")
            .join("coverdeck")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::new("XDG_CONFIG_HOME", None);
    let _g2 = EnvGuard::new("HOME", Some("/tmp/home-dir"));

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("coverdeck")
            .join("config.toml")
    );
}

#[test]
fn default_state_dir_uses_xdg_state_home_then_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::new("XDG_STATE_HOME", Some("/tmp/xdg-state"));
    assert_eq!(
        default_state_dir().unwrap(),
        PathBuf::from("/tmp/xdg-state").join("coverdeck")
    );
    drop(_g1);

    let _g2 = EnvGuard::new("XDG_STATE_HOME", None);
    let _g3 = EnvGuard::new("HOME", Some("/tmp/home-dir"));
    assert_eq!(
        default_state_dir().unwrap(),
        PathBuf::from("/tmp/home-dir")
            .join(".local")
            .join("state")
            .join("coverdeck")
    );
}

#[test]
fn defaults_play_common_formats_at_half_volume() {
    let s = Settings::default();
    assert_eq!(s.audio.volume, 50);
    assert!(!s.library.recursive);
    for ext in ["mp3", "flac", "wav", "m4a"] {
        assert!(s.library.extensions.iter().any(|e| e == ext));
    }
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.audio.volume = 101;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.volume_step = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.tile_width = 4;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.tile_height = 2;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec![" ".to_string()];
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file_and_parse_page_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
volume = 80
volume_step = 10
quit_fade_out_ms = 0

[controls]
scrub_seconds = 9

[ui]
header_text = "hello"
tile_width = 30
tile_height = 14
start_page = "favourites"

[library]
extensions = ["mp3"]
recursive = true
include_hidden = false
follow_links = false
max_depth = 3

[logging]
level = "debug"
file = "/tmp/coverdeck-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::new("COVERDECK_CONFIG_PATH", Some(cfg_path.to_str().unwrap()));
    let _g2 = EnvGuard::new("COVERDECK__AUDIO__VOLUME", None);

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.volume, 80);
    assert_eq!(s.audio.volume_step, 10);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.tile_width, 30);
    assert_eq!(s.ui.tile_height, 14);
    assert_eq!(s.ui.start_page, PageSetting::Favorites);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file,
        Some(PathBuf::from("/tmp/coverdeck-test.log"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
volume = 20
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::new("COVERDECK_CONFIG_PATH", Some(cfg_path.to_str().unwrap()));
    let _g2 = EnvGuard::new("COVERDECK__AUDIO__VOLUME", Some("70"));

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.volume, 70);
}

#[test]
fn load_checked_rejects_out_of_range_config() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[audio]\nvolume_step = 0\n").unwrap();

    let _g1 = EnvGuard::new("COVERDECK_CONFIG_PATH", Some(cfg_path.to_str().unwrap()));
    let _g2 = EnvGuard::new("COVERDECK__AUDIO__VOLUME_STEP", None);

    let err = Settings::load_checked().unwrap_err();
    assert!(matches!(err, SettingsError::Invalid(_)));
    assert_eq!(err.to_string(), "invalid config: audio.volume_step must be >= 1");
}

#[test]
fn load_checked_reports_unparseable_config() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[audio\nvolume = ").unwrap();

    let _g1 = EnvGuard::new("COVERDECK_CONFIG_PATH", Some(cfg_path.to_str().unwrap()));

    let err = Settings::load_checked().unwrap_err();
    assert!(matches!(err, SettingsError::Load(_)));
    assert!(err.to_string().starts_with("failed to load config"));
}
