use crate::config::Settings;
use crate::error::SettingsError;

/// Settings for this run. A broken or invalid config file is reported on
/// stderr (the log is not up yet) and the defaults are used instead.
pub fn load_settings() -> Settings {
    or_defaults(Settings::load_checked())
}

fn or_defaults(loaded: Result<Settings, SettingsError>) -> Settings {
    loaded.unwrap_or_else(|e| {
        eprintln!("coverdeck: {e}; using defaults");
        Settings::default()
    })
}
