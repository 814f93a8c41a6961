//! Typed errors for settings, the audio pipeline and persisted state.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Output(#[from] rodio::StreamError),

    /// The device failed to open earlier; carries that failure's message.
    #[error("{0}")]
    OutputUnavailable(String),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("state file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize state: {0}")]
    Serialize(#[from] toml::ser::Error),
}
