use std::{env, path::PathBuf};

use super::schema::Settings;
use crate::error::SettingsError;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `COVERDECK__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("COVERDECK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// `load` followed by `validate`.
    pub fn load_checked() -> Result<Self, SettingsError> {
        let settings = Self::load()?;
        settings.validate().map_err(SettingsError::Invalid)?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.audio.volume > 100 {
            return Err("audio.volume must be between 0 and 100".to_string());
        }
        if self.audio.volume_step == 0 {
            return Err("audio.volume_step must be >= 1".to_string());
        }
        if self.ui.tile_width < 8 {
            return Err("ui.tile_width must be >= 8".to_string());
        }
        if self.ui.tile_height < 5 {
            return Err("ui.tile_height must be >= 5".to_string());
        }
        if self.library.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err("library.extensions must name at least one extension".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `COVERDECK_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("COVERDECK_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/coverdeck/config.toml`
/// or `~/.config/coverdeck/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("coverdeck").join("config.toml"))
}

/// Directory for runtime state (favorites, recents, log file):
/// `$XDG_STATE_HOME/coverdeck` or `~/.local/state/coverdeck`.
pub fn default_state_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("coverdeck"))
}
