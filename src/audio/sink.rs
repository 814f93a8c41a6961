//! Utilities for creating `rodio` sinks from audio files.
//!
//! `Output` and `Voice` are the two seams the audio engine plays through:
//! an output turns a file into a paused voice, a voice is one playing track.
//! The `rodio` implementations live here.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::AudioError;

/// Something that can open audio files for playback.
pub(super) trait Output {
    type Voice: Voice;

    /// Open `path` as a paused voice starting at `start_at`.
    fn load(&self, path: &Path, start_at: Duration, gain: f32) -> Result<Self::Voice, AudioError>;
}

/// One loaded track.
pub(super) trait Voice {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn set_volume(&self, gain: f32);
    /// Nothing left to play.
    fn empty(&self) -> bool;
}

impl Output for OutputStream {
    type Voice = Sink;

    fn load(&self, path: &Path, start_at: Duration, gain: f32) -> Result<Sink, AudioError> {
        create_sink_at(self, path, start_at, gain)
    }
}

impl Voice for Sink {
    fn play(&self) {
        Sink::play(self);
    }

    fn pause(&self) {
        Sink::pause(self);
    }

    fn stop(&self) {
        Sink::stop(self);
    }

    fn set_volume(&self, gain: f32) {
        Sink::set_volume(self, gain);
    }

    fn empty(&self) -> bool {
        Sink::empty(self)
    }
}

/// Create a paused `Sink` for the file at `path` that starts playback at `start_at`.
fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    gain: f32,
) -> Result<Sink, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|source| AudioError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(gain);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
