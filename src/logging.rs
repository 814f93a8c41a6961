//! Log file setup.
//!
//! The terminal belongs to the UI, so `tracing` output goes to a file through
//! a non-blocking `tracing-appender` writer. The filter comes from
//! `COVERDECK_LOG` when set, else from `logging.level`.

use std::env;
use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingSettings, default_state_dir};

pub const LOG_ENV: &str = "COVERDECK_LOG";
const LOG_FILE_NAME: &str = "coverdeck.log";

/// Where the log file goes: `logging.file`, else `coverdeck.log` in the state directory.
pub fn log_file_path(settings: &LoggingSettings) -> Option<PathBuf> {
    settings
        .file
        .clone()
        .or_else(|| default_state_dir().map(|d| d.join(LOG_FILE_NAME)))
}

fn filter_directive(settings: &LoggingSettings) -> String {
    env::var(LOG_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| settings.level.clone())
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered lines get flushed.
///
/// Returns `None` when logging is turned off or the log file cannot be
/// created; the player runs fine without it.
pub fn init(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let directive = filter_directive(settings);
    if directive.trim().eq_ignore_ascii_case("off") {
        return None;
    }

    let path = log_file_path(settings)?;
    let dir = path.parent().map(PathBuf::from).unwrap_or_default();
    let file_name = path.file_name()?.to_owned();
    if !dir.as_os_str().is_empty() {
        if let Err(e) = fs::create_dir_all(&dir) {
            eprintln!("coverdeck: cannot create log directory {}: {e}", dir.display());
            return None;
        }
    }

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("coverdeck: invalid log filter {directive:?}, using info: {e}");
        EnvFilter::new("info")
    });

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();
    if let Err(e) = result {
        eprintln!("coverdeck: logging already initialized: {e}");
        return None;
    }

    Some(guard)
}
