use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use crate::audio::AudioPlayer;
use crate::logging;
use crate::state::default_state_path;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let _log_guard = logging::init(&settings.logging);
    info!(version = env!("CARGO_PKG_VERSION"), "starting coverdeck");

    let state = startup::load_state(default_state_path().as_deref());
    let dir = startup::initial_folder(
        env::args_os().nth(1).map(PathBuf::from),
        &state,
        env::current_dir().ok(),
    );

    let mut app = startup::build_app(dir, &state, &settings);
    let audio_player = AudioPlayer::new(app.volume);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &settings, &mut app, &audio_player, &mut state)
    })();

    audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    startup::save_state(&app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!(error = %e, "event loop failed");
    }
    info!("bye");
    run_result
}
