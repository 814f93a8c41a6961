//! Session restore and save around the event loop.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::app::App;
use crate::config;
use crate::library::scan;
use crate::state::{PlayerState, default_state_path};

/// Read the previous session. Unreadable state is logged and ignored.
pub fn load_state(path: Option<&Path>) -> PlayerState {
    let Some(path) = path else {
        return PlayerState::default();
    };
    match PlayerState::load_from(path) {
        Ok(state) => state,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable state file");
            PlayerState::default()
        }
    }
}

/// Folder to open at startup: the command-line argument, else the last
/// folder if it still exists, else the working directory.
pub fn initial_folder(arg: Option<PathBuf>, state: &PlayerState, cwd: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = arg {
        return dir;
    }
    if let Some(dir) = state.last_dir.as_ref().filter(|d| d.is_dir()) {
        return dir.clone();
    }
    cwd.unwrap_or_else(|| PathBuf::from("."))
}

/// Scan `dir` and build the model, restoring favorites, recents and volume.
pub fn build_app(dir: PathBuf, state: &PlayerState, settings: &config::Settings) -> App {
    let tracks = scan(&dir, &settings.library);
    let mut app = App::new(Vec::new());
    app.set_volume(settings.audio.volume);
    app.apply_state(state);
    app.set_tracks(tracks, dir);
    app.set_page(settings.ui.start_page.into());
    app
}

pub fn save_state(app: &App) {
    let Some(path) = default_state_path() else {
        warn!("no state directory, session not saved");
        return;
    };
    match app.to_state().save_to(&path) {
        Ok(()) => info!(path = %path.display(), "session saved"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to save session"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Page;
    use crate::config::PageSetting;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn argument_wins_over_last_folder() {
        let dir = tempdir().unwrap();
        let state = PlayerState {
            last_dir: Some(dir.path().to_path_buf()),
            ..PlayerState::default()
        };
        assert_eq!(
            initial_folder(Some(PathBuf::from("/arg")), &state, None),
            PathBuf::from("/arg")
        );
        assert_eq!(initial_folder(None, &state, None), dir.path());
    }

    #[test]
    fn vanished_last_folder_falls_back_to_cwd() {
        let state = PlayerState {
            last_dir: Some(PathBuf::from("/definitely/not/here")),
            ..PlayerState::default()
        };
        assert_eq!(
            initial_folder(None, &state, Some(PathBuf::from("/cwd"))),
            PathBuf::from("/cwd")
        );
        assert_eq!(
            initial_folder(None, &PlayerState::default(), None),
            PathBuf::from(".")
        );
    }

    #[test]
    fn corrupt_state_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "favorites = 3 = 4").unwrap();
        assert_eq!(load_state(Some(&path)), PlayerState::default());
        assert_eq!(load_state(None), PlayerState::default());
    }

    #[test]
    fn build_app_restores_session_and_start_page() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"not audio").unwrap();
        let song = dir.path().join("a.mp3");

        let state = PlayerState {
            volume: Some(30),
            favorites: vec![song.clone()],
            ..PlayerState::default()
        };
        let mut settings = config::Settings::default();
        settings.ui.start_page = PageSetting::Favorites;

        let app = build_app(dir.path().to_path_buf(), &state, &settings);
        assert_eq!(app.tracks.len(), 1);
        assert_eq!(app.volume, 30);
        assert_eq!(app.page, Page::Favorites);
        assert_eq!(app.display_indices(), vec![0]);
        assert_eq!(app.current_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn build_app_uses_configured_volume_without_history() {
        let dir = tempdir().unwrap();
        let mut settings = config::Settings::default();
        settings.audio.volume = 65;

        let app = build_app(dir.path().to_path_buf(), &PlayerState::default(), &settings);
        assert_eq!(app.volume, 65);
        assert!(app.tracks.is_empty());
    }
}
