use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::{App, Page, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer, PlaybackInfo};
use crate::config;
use crate::grid::Step;
use crate::library::scan;
use crate::transport::{seek_target, volume_from_offset};
use crate::ui::{self, FrameLayout, contains};

/// Where the event loop sends playback commands.
pub trait CommandSink {
    fn send_cmd(&self, cmd: AudioCmd);
}

impl CommandSink for AudioPlayer {
    fn send_cmd(&self, cmd: AudioCmd) {
        if let Err(e) = self.send(cmd) {
            warn!("audio thread is gone: {e}");
        }
    }
}

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// What the last frame drew, for mouse hit-testing and grid movement.
    pub layout: Option<FrameLayout>,
}

/// Main terminal event loop: syncs with the audio thread, draws and handles
/// input. Returns `Ok(())` when quitting is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let playback = audio_player.playback_handle();

    loop {
        let info = playback
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default();
        app.sync_playback(&info);

        let mut drawn = None;
        terminal.draw(|f| drawn = Some(ui::draw(f, app, &info, settings)))?;
        state.layout = drawn;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key_event(key, settings, app, audio_player, state) {
                    break;
                }
            }
            Event::Mouse(mouse) => {
                handle_mouse_event(mouse, app, &info, audio_player, state);
            }
            // The next draw reflows the grid.
            Event::Resize(w, h) => debug!(width = w, height = h, "terminal resized"),
            _ => {}
        }
    }

    Ok(())
}

fn play_index(app: &mut App, sink: &impl CommandSink, idx: usize) {
    let Some(track) = app.begin_play(idx) else {
        return;
    };
    info!(path = %track.path.display(), "play");
    sink.send_cmd(AudioCmd::Play(track));
}

fn play_pause(app: &mut App, sink: &impl CommandSink) {
    match app.playback {
        PlaybackState::Stopped => {
            if app.selected_track().is_some() {
                let idx = app.selected;
                play_index(app, sink, idx);
            }
        }
        PlaybackState::Playing => {
            sink.send_cmd(AudioCmd::TogglePause);
            app.playback = PlaybackState::Paused;
        }
        PlaybackState::Paused => {
            sink.send_cmd(AudioCmd::TogglePause);
            app.playback = PlaybackState::Playing;
        }
    }
}

fn apply_volume(app: &mut App, sink: &impl CommandSink, volume: u8) {
    app.set_volume(volume);
    sink.send_cmd(AudioCmd::SetVolume(app.volume));
}

fn nudge_volume(app: &mut App, sink: &impl CommandSink, settings: &config::Settings, up: bool) {
    let step = i16::from(settings.audio.volume_step);
    let volume = app.nudge_volume(if up { step } else { -step });
    sink.send_cmd(AudioCmd::SetVolume(volume));
}

fn open_folder(app: &mut App, dir: PathBuf, settings: &config::Settings) {
    if !dir.is_dir() {
        warn!(path = %dir.display(), "not a folder");
        app.status = Some(format!("Not a folder: {}", dir.display()));
        return;
    }
    let tracks = scan(&dir, &settings.library);
    app.set_tracks(tracks, dir);
}

fn move_selection(app: &mut App, state: &EventLoopState, step: Step) {
    if let Some(layout) = &state.layout {
        app.move_selection(&layout.grid, step);
    }
}

/// Handle one key press. Returns `true` when the user asked to quit.
pub fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    sink: &impl CommandSink,
    state: &mut EventLoopState,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if app.folder_prompt.is_some() {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.cancel_folder_prompt(),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Enter => {
                if let Some(dir) = app.take_folder_prompt() {
                    open_folder(app, dir, settings);
                }
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_prompt_char(c);
                }
            }
            _ => {}
        }
        return false;
    }

    if app.volume_popup {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('+') | KeyCode::Char('=') => {
                nudge_volume(app, sink, settings, true);
                return false;
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('-') => {
                nudge_volume(app, sink, settings, false);
                return false;
            }
            KeyCode::Esc | KeyCode::Char('v') => {
                app.volume_popup = false;
                return false;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            return true;
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
            return false;
        }
        _ => state.pending_gg = false,
    }

    match key.code {
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Left | KeyCode::Char('h') => move_selection(app, state, Step::Left),
        KeyCode::Right | KeyCode::Char('l') => move_selection(app, state, Step::Right),
        KeyCode::Up | KeyCode::Char('k') => move_selection(app, state, Step::Up),
        KeyCode::Down | KeyCode::Char('j') => move_selection(app, state, Step::Down),
        KeyCode::Enter => {
            if app.selected_track().is_some() {
                let idx = app.selected;
                play_index(app, sink, idx);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => play_pause(app, sink),
        KeyCode::Char('s') => {
            sink.send_cmd(AudioCmd::Stop);
            app.playback = PlaybackState::Stopped;
            app.now_playing = None;
        }
        KeyCode::Char('L') | KeyCode::Char('H') => {
            let secs = i64::try_from(settings.controls.scrub_seconds).unwrap_or(i64::MAX);
            let secs = if key.code == KeyCode::Char('H') { -secs } else { secs };
            sink.send_cmd(AudioCmd::SeekBy(secs));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => nudge_volume(app, sink, settings, true),
        KeyCode::Char('-') => nudge_volume(app, sink, settings, false),
        KeyCode::Char('v') => app.toggle_volume_popup(),
        KeyCode::Char('f') => {
            let title = app.selected_track().map(|t| t.title.clone());
            if let (Some(now), Some(title)) = (app.toggle_favorite(), title) {
                app.status = Some(if now {
                    format!("Added to favorites: {title}")
                } else {
                    format!("Removed from favorites: {title}")
                });
            }
        }
        KeyCode::Char('1') => app.set_page(Page::Library),
        KeyCode::Char('2') => app.set_page(Page::Favorites),
        KeyCode::Char('3') => app.set_page(Page::Recents),
        KeyCode::Tab => app.next_page(),
        KeyCode::Char('o') => app.open_folder_prompt(),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        KeyCode::Esc => {
            app.metadata_window = false;
        }
        _ => {}
    }

    false
}

/// Handle one mouse event against the layout of the last frame.
pub fn handle_mouse_event(
    mouse: MouseEvent,
    app: &mut App,
    info: &PlaybackInfo,
    sink: &impl CommandSink,
    state: &EventLoopState,
) {
    let Some(layout) = state.layout.as_ref() else {
        return;
    };
    if app.folder_prompt.is_some() {
        return;
    }
    let (x, y) = (mouse.column, mouse.row);

    // Dragging only slides the seek bar and the volume slider.
    let dragging = match mouse.kind {
        MouseEventKind::ScrollDown => {
            app.move_selection(&layout.grid, Step::Down);
            return;
        }
        MouseEventKind::ScrollUp => {
            app.move_selection(&layout.grid, Step::Up);
            return;
        }
        MouseEventKind::Down(MouseButton::Left) => false,
        MouseEventKind::Drag(MouseButton::Left) => true,
        _ => return,
    };

    if app.volume_popup {
        if let Some(slider) = layout.volume_slider.filter(|s| contains(*s, x, y)) {
            apply_volume(app, sink, volume_from_offset(y - slider.y, slider.height));
            return;
        }
        if dragging || layout.volume_popup.is_some_and(|p| contains(p, x, y)) {
            return;
        }
        // Any click outside the slider closes it, including one on the button.
        app.volume_popup = false;
        return;
    }

    if contains(layout.seek_bar, x, y) {
        if info.track.is_some() {
            let total = info
                .duration
                .or_else(|| app.now_playing_track().and_then(|t| t.duration));
            if let Some(target) = seek_target(x - layout.seek_bar.x, layout.seek_bar.width, total)
            {
                sink.send_cmd(AudioCmd::SeekTo(target));
            }
        }
        return;
    }

    if dragging {
        return;
    }

    if contains(layout.volume_button, x, y) {
        app.toggle_volume_popup();
        return;
    }

    if let Some(page) = layout.page_at(x, y) {
        app.set_page(page);
        return;
    }

    if let Some(idx) = layout.track_at(x, y) {
        app.set_selected(idx);
        play_index(app, sink, idx);
    }
}
