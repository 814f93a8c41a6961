//! Audio-related small types and handles.
//!
//! This module defines the commands accepted by the audio thread and the
//! playback snapshot it shares with the UI.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::Track;
use crate::transport::MAX_VOLUME;

#[derive(Debug)]
pub enum AudioCmd {
    /// Load the track and play it from the beginning.
    Play(Track),
    /// Pause when playing, resume when paused, restart a finished track.
    TogglePause,
    /// Stop playback and forget the current track.
    Stop,
    /// Jump to an absolute position (seek bar).
    SeekTo(Duration),
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i64),
    /// Set the output volume, 0-100.
    SetVolume(u8),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackInfo {
    /// File of the loaded track, if any.
    pub track: Option<PathBuf>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Length of the current track when the container reports one.
    pub duration: Option<Duration>,
    /// Whether audio is currently coming out.
    pub playing: bool,
    /// The track ran to its end; play/pause restarts it.
    pub finished: bool,
    /// Last load/decode/device failure, cleared by the next successful load.
    pub last_error: Option<String>,
    /// `Play` commands handled so far, whether they loaded or failed.
    pub plays_handled: u64,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Convert a 0-100 volume into a `rodio` sink gain.
pub fn volume_gain(volume: u8) -> f32 {
    f32::from(volume.min(MAX_VOLUME)) / f32::from(MAX_VOLUME)
}
