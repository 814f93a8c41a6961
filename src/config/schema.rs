use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/coverdeck/config.toml` or `~/.config/coverdeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `COVERDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume used when no volume was remembered from a previous session (0-100).
    pub volume: u8,
    /// How much `+` / `-` change the volume.
    pub volume_step: u8,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 50,
            volume_step: 5,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered in the header next to the page tabs.
    pub header_text: String,
    /// Tile width in terminal columns, borders included.
    pub tile_width: u16,
    /// Tile height in terminal rows, borders included.
    ///
    /// Two rows go to the title and artist lines, the rest shows the cover.
    pub tile_height: u16,
    /// Page shown at startup.
    pub start_page: PageSetting,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " coverdeck ".to_string(),
            tile_width: 24,
            tile_height: 12,
            start_page: PageSetting::Library,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageSetting {
    #[serde(alias = "home")]
    Library,
    #[serde(alias = "favourites")]
    Favorites,
    #[serde(alias = "recent")]
    Recents,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "m4a".into(),
                "ogg".into(),
            ],
            follow_links: true,
            include_hidden: true,
            recursive: false,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `info` or `coverdeck=debug`.
    /// `off` disables the log file entirely.
    pub level: String,
    /// Log file location. Defaults to `coverdeck.log` in the state directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
