//! State remembered between sessions: favorites, recents, volume and the last
//! folder. Stored as TOML next to the log file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::default_state_dir;
use crate::error::StateError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    pub last_dir: Option<PathBuf>,
    pub volume: Option<u8>,
    pub favorites: Vec<PathBuf>,
    pub recents: Vec<PathBuf>,
}

impl PlayerState {
    /// Read state from `path`. A missing file is an empty state.
    pub fn load_from(path: &Path) -> Result<Self, StateError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write state to `path`, creating its directory. The file is replaced atomically.
    pub fn save_to(&self, path: &Path) -> Result<(), StateError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let text = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// `state.toml` inside the state directory.
pub fn default_state_path() -> Option<PathBuf> {
    default_state_dir().map(|d| d.join("state.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty_state() {
        let dir = tempdir().unwrap();
        let state = PlayerState::load_from(&dir.path().join("state.toml")).unwrap();
        assert_eq!(state, PlayerState::default());
    }

    #[test]
    fn saved_state_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state.toml");
        let state = PlayerState {
            last_dir: Some(PathBuf::from("/music")),
            volume: Some(35),
            favorites: vec![PathBuf::from("/music/a.mp3")],
            recents: vec![PathBuf::from("/music/b.flac"), PathBuf::from("/music/a.mp3")],
        };
        state.save_to(&path).unwrap();

        assert_eq!(PlayerState::load_from(&path).unwrap(), state);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "volume = 80\n").unwrap();

        let state = PlayerState::load_from(&path).unwrap();
        assert_eq!(state.volume, Some(80));
        assert!(state.favorites.is_empty());
        assert!(state.last_dir.is_none());
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "volume = [[[").unwrap();

        assert!(matches!(
            PlayerState::load_from(&path),
            Err(StateError::Parse(_))
        ));
    }
}
