//! Application model types: `App`, `Page` and `PlaybackState`.
//!
//! The `App` struct holds the current library, the selected tile, the page
//! being shown and the transient UI state (popups, folder prompt).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::audio::PlaybackInfo;
use crate::config::PageSetting;
use crate::grid::{Grid, Step};
use crate::library::Track;
use crate::state::PlayerState;
use crate::transport::{MAX_VOLUME, step_volume};

/// How many recently played tracks are remembered.
pub const RECENTS_LIMIT: usize = 50;

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Which subset of the library the grid shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Page {
    Library,
    Favorites,
    Recents,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Library, Page::Favorites, Page::Recents];

    pub fn title(self) -> &'static str {
        match self {
            Page::Library => "Library",
            Page::Favorites => "Favorites",
            Page::Recents => "Recents",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Page::Library => Page::Favorites,
            Page::Favorites => Page::Recents,
            Page::Recents => Page::Library,
        }
    }
}

impl From<PageSetting> for Page {
    fn from(p: PageSetting) -> Self {
        match p {
            PageSetting::Library => Page::Library,
            PageSetting::Favorites => Page::Favorites,
            PageSetting::Recents => Page::Recents,
        }
    }
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    /// Library index of the highlighted tile.
    pub selected: usize,
    pub page: Page,
    pub playback: PlaybackState,
    /// Library index of the loaded track, synced from the audio thread.
    pub now_playing: Option<usize>,
    pub volume: u8,
    pub current_dir: Option<PathBuf>,

    favorites: HashSet<PathBuf>,
    recents: Vec<PathBuf>,

    pub volume_popup: bool,
    pub metadata_window: bool,
    /// Text typed into the "open folder" prompt while it is open.
    pub folder_prompt: Option<String>,
    /// One-line message for the user (scan results, favorites).
    pub status: Option<String>,
    /// Last playback failure reported by the audio thread.
    pub error: Option<String>,

    plays_sent: u64,
    /// Play request waiting for the audio thread: its sequence number and file.
    pending_play: Option<(u64, PathBuf)>,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            page: Page::Library,
            playback: PlaybackState::Stopped,
            now_playing: None,
            volume: 50,
            current_dir: None,

            favorites: HashSet::new(),
            recents: Vec::new(),

            volume_popup: false,
            metadata_window: false,
            folder_prompt: None,
            status: None,
            error: None,

            plays_sent: 0,
            pending_play: None,
        }
    }

    /// Replace the library with a freshly scanned folder.
    pub fn set_tracks(&mut self, tracks: Vec<Track>, dir: PathBuf) {
        self.status = Some(if tracks.is_empty() {
            format!("No audio files in {}", dir.display())
        } else {
            format!("{} tracks in {}", tracks.len(), dir.display())
        });
        self.tracks = tracks;
        self.current_dir = Some(dir);
        self.selected = 0;
        self.now_playing = None;
        self.metadata_window = false;
        self.ensure_selected_visible();
    }

    pub fn index_of_path(&self, path: &Path) -> Option<usize> {
        self.tracks.iter().position(|t| t.path == path)
    }

    /// Library indices shown on the current page, in display order.
    pub fn display_indices(&self) -> Vec<usize> {
        match self.page {
            Page::Library => (0..self.tracks.len()).collect(),
            Page::Favorites => (0..self.tracks.len())
                .filter(|&i| self.favorites.contains(&self.tracks[i].path))
                .collect(),
            Page::Recents => self
                .recents
                .iter()
                .filter_map(|p| self.index_of_path(p))
                .collect(),
        }
    }

    /// The highlighted track, if it is on the current page.
    pub fn selected_track(&self) -> Option<&Track> {
        self.display_indices()
            .contains(&self.selected)
            .then(|| &self.tracks[self.selected])
    }

    pub fn now_playing_track(&self) -> Option<&Track> {
        self.now_playing.and_then(|i| self.tracks.get(i))
    }

    /// Set the selected track index and ensure it is visible in the display.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    /// Ensure that `selected` is part of the current page, otherwise move
    /// selection to the first visible tile.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }
        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    /// Move the selection one tile in `step` direction within `grid`.
    pub fn move_selection(&mut self, grid: &Grid, step: Step) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        let pos = display
            .iter()
            .position(|&i| i == self.selected)
            .unwrap_or(0);
        self.selected = display[grid.step(pos, step).min(display.len() - 1)];
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }

    pub fn set_page(&mut self, page: Page) {
        self.page = page;
        self.metadata_window = false;
        self.ensure_selected_visible();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.next());
    }

    pub fn is_favorite(&self, idx: usize) -> bool {
        self.tracks
            .get(idx)
            .is_some_and(|t| self.favorites.contains(&t.path))
    }

    /// Toggle the favorite mark on the selected tile. Returns the new mark.
    pub fn toggle_favorite(&mut self) -> Option<bool> {
        let path = self.selected_track()?.path.clone();
        let now_favorite = if self.favorites.remove(&path) {
            false
        } else {
            self.favorites.insert(path);
            true
        };
        self.ensure_selected_visible();
        Some(now_favorite)
    }

    /// Remember that `idx` was played: most recent first, no duplicates.
    pub fn record_played(&mut self, idx: usize) {
        let Some(track) = self.tracks.get(idx) else {
            return;
        };
        let path = track.path.clone();
        self.recents.retain(|p| p != &path);
        self.recents.insert(0, path);
        self.recents.truncate(RECENTS_LIMIT);
    }

    /// Optimistically show `idx` as playing and return the track to send to
    /// the audio thread. It enters the recents once the thread has loaded it.
    pub fn begin_play(&mut self, idx: usize) -> Option<Track> {
        let track = self.tracks.get(idx)?.clone();
        self.plays_sent += 1;
        self.pending_play = Some((self.plays_sent, track.path.clone()));
        self.now_playing = Some(idx);
        self.playback = PlaybackState::Playing;
        self.error = None;
        Some(track)
    }

    /// Pull the audio thread's snapshot into the model.
    pub fn sync_playback(&mut self, info: &PlaybackInfo) {
        self.now_playing = info.track.as_deref().and_then(|p| self.index_of_path(p));
        self.playback = match (&info.track, info.playing) {
            (None, _) => PlaybackState::Stopped,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        };
        self.error.clone_from(&info.last_error);

        let Some((seq, path)) = self.pending_play.take() else {
            return;
        };
        if info.plays_handled < seq {
            self.pending_play = Some((seq, path));
        } else if info.track.as_ref() == Some(&path) {
            if let Some(idx) = self.now_playing {
                self.record_played(idx);
            }
        }
    }

    /// Change the volume by `delta`. Returns the new volume.
    pub fn nudge_volume(&mut self, delta: i16) -> u8 {
        self.volume = step_volume(self.volume, delta);
        self.volume
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(MAX_VOLUME);
    }

    pub fn toggle_volume_popup(&mut self) {
        self.volume_popup = !self.volume_popup;
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Open the folder prompt, pre-filled with the current folder.
    pub fn open_folder_prompt(&mut self) {
        let prefill = self
            .current_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        self.folder_prompt = Some(prefill);
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.folder_prompt.as_mut() {
            p.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.folder_prompt.as_mut() {
            p.pop();
        }
    }

    pub fn cancel_folder_prompt(&mut self) {
        self.folder_prompt = None;
    }

    /// Close the prompt and return the folder typed into it, with `~` expanded.
    pub fn take_folder_prompt(&mut self) -> Option<PathBuf> {
        let text = self.folder_prompt.take()?;
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(expand_home(text))
    }

    /// Restore favorites, recents and volume from a previous session.
    pub fn apply_state(&mut self, state: &PlayerState) {
        self.favorites = state.favorites.iter().cloned().collect();
        self.recents = state.recents.clone();
        self.recents.truncate(RECENTS_LIMIT);
        if let Some(v) = state.volume {
            self.set_volume(v);
        }
    }

    /// Snapshot what should survive a restart.
    pub fn to_state(&self) -> PlayerState {
        let mut favorites: Vec<PathBuf> = self.favorites.iter().cloned().collect();
        favorites.sort();
        PlayerState {
            last_dir: self.current_dir.clone(),
            volume: Some(self.volume),
            favorites,
            recents: self.recents.clone(),
        }
    }
}

fn expand_home(text: &str) -> PathBuf {
    if text == "~" || text.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(text.trim_start_matches('~').trim_start_matches('/'));
        }
    }
    PathBuf::from(text)
}
