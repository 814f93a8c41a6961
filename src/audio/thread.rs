use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder};
use tracing::{debug, error, info, warn};

use crate::error::AudioError;
use crate::library::Track;
use crate::transport::{clamp_position, scrub};

use super::clock::Clock;
use super::sink::{Output, Voice};
use super::types::{AudioCmd, PlaybackHandle, volume_gain};

/// How often the thread wakes up without commands to refresh elapsed time and
/// notice the end of a track.
const TICK: Duration = Duration::from_millis(100);

const FADE_STEPS: u64 = 20;

/// Playback state machine over an audio output and the voice of the track being played.
pub(super) struct Engine<O: Output> {
    /// The output, or the message of the failure that kept it from opening.
    output: Result<O, String>,
    voice: Option<O::Voice>,
    current: Option<Track>,
    clock: Clock,
    finished: bool,
    volume: u8,
    last_error: Option<String>,
    plays_handled: u64,
    playback: PlaybackHandle,
}

impl Engine<OutputStream> {
    fn open(volume: u8, playback: PlaybackHandle) -> Self {
        let output = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                stream.log_on_drop(false);
                Ok(stream)
            }
            Err(e) => {
                let e = AudioError::from(e);
                error!(error = %e, "audio output unavailable");
                Err(e.to_string())
            }
        };
        Self::new(output, volume, playback)
    }
}

impl<O: Output> Engine<O> {
    pub(super) fn new(output: Result<O, String>, volume: u8, playback: PlaybackHandle) -> Self {
        let last_error = output.as_ref().err().cloned();
        Self {
            output,
            voice: None,
            current: None,
            clock: Clock::default(),
            finished: false,
            volume,
            last_error,
            plays_handled: 0,
            playback,
        }
    }

    fn gain(&self) -> f32 {
        volume_gain(self.volume)
    }

    fn load(&self, track: &Track, start_at: Duration) -> Result<O::Voice, AudioError> {
        match &self.output {
            Ok(output) => output.load(&track.path, start_at, self.gain()),
            Err(msg) => Err(AudioError::OutputUnavailable(msg.clone())),
        }
    }

    /// Handle a `Play` command.
    pub(super) fn play(&mut self, track: Track) {
        self.plays_handled += 1;
        self.start(track);
    }

    fn start(&mut self, track: Track) {
        if let Some(old) = self.voice.take() {
            old.stop();
        }

        match self.load(&track, Duration::ZERO) {
            Ok(voice) => {
                voice.play();
                info!(path = %track.path.display(), "playing");
                self.voice = Some(voice);
                self.current = Some(track);
                self.clock.restart_at(Duration::ZERO, true, Instant::now());
                self.finished = false;
                self.last_error = None;
            }
            Err(e) => {
                warn!(error = %e, "cannot play track");
                self.current = None;
                self.clock.reset();
                self.finished = false;
                self.last_error = Some(e.to_string());
            }
        }
    }

    pub(super) fn stop(&mut self) {
        if let Some(voice) = self.voice.take() {
            voice.stop();
        }
        self.current = None;
        self.clock.reset();
        self.finished = false;
    }

    pub(super) fn toggle_pause(&mut self) {
        if self.finished {
            if let Some(track) = self.current.take() {
                self.start(track);
            }
            return;
        }

        let Some(voice) = &self.voice else {
            return;
        };
        let now = Instant::now();
        if self.clock.is_running() {
            voice.pause();
            self.clock.pause_at(now);
            debug!("paused");
        } else {
            voice.play();
            self.clock.resume_at(now);
            debug!("resumed");
        }
    }

    /// Rebuild the voice at `position`, keeping the paused/playing state.
    pub(super) fn seek_to(&mut self, position: Duration) {
        let Some(track) = self.current.clone() else {
            return;
        };
        let position = clamp_position(position, track.duration);
        let running = self.clock.is_running();

        match self.load(&track, position) {
            Ok(voice) => {
                if let Some(old) = self.voice.take() {
                    old.stop();
                }
                if running {
                    voice.play();
                }
                self.voice = Some(voice);
                self.clock.restart_at(position, running, Instant::now());
                self.finished = false;
                debug!(position_ms = position.as_millis() as u64, "seeked");
            }
            Err(e) => {
                warn!(error = %e, "seek failed");
                self.last_error = Some(e.to_string());
            }
        }
    }

    pub(super) fn seek_by(&mut self, secs: i64) {
        let Some(track) = &self.current else {
            return;
        };
        let target = scrub(self.clock.elapsed_at(Instant::now()), secs, track.duration);
        self.seek_to(target);
    }

    pub(super) fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(crate::transport::MAX_VOLUME);
        if let Some(voice) = &self.voice {
            voice.set_volume(self.gain());
        }
    }

    /// Notice when the voice ran dry.
    pub(super) fn tick(&mut self) {
        let drained = self
            .voice
            .as_ref()
            .is_some_and(|voice| self.clock.is_running() && voice.empty());
        if drained {
            let end = self
                .current
                .as_ref()
                .and_then(|t| t.duration)
                .unwrap_or_else(|| self.clock.elapsed_at(Instant::now()));
            self.clock.restart_at(end, false, Instant::now());
            self.finished = true;
            info!("track finished");
        }
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(voice) = &self.voice else {
            return;
        };
        if fade_out_ms > 0 && self.clock.is_running() {
            let start = self.gain();
            let step_ms = (fade_out_ms / FADE_STEPS).max(1);
            for step in 1..=FADE_STEPS {
                let t = step as f32 / FADE_STEPS as f32;
                voice.set_volume(start * (1.0 - t));
                thread::sleep(Duration::from_millis(step_ms));
            }
        }
        voice.set_volume(0.0);
        voice.stop();
    }

    pub(super) fn publish(&self) {
        let elapsed = self.clock.elapsed_at(Instant::now());
        let duration = self.current.as_ref().and_then(|t| t.duration);
        if let Ok(mut info) = self.playback.lock() {
            info.track = self.current.as_ref().map(|t| t.path.clone());
            info.elapsed = clamp_position(elapsed, duration);
            info.duration = duration;
            info.playing = self.current.is_some() && self.clock.is_running();
            info.finished = self.finished;
            info.last_error.clone_from(&self.last_error);
            info.plays_handled = self.plays_handled;
        }
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback: PlaybackHandle,
    volume: u8,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut engine = Engine::open(volume, playback);
        engine.publish();

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Play(track)) => engine.play(track),
                Ok(AudioCmd::TogglePause) => engine.toggle_pause(),
                Ok(AudioCmd::Stop) => engine.stop(),
                Ok(AudioCmd::SeekTo(position)) => engine.seek_to(position),
                Ok(AudioCmd::SeekBy(secs)) => engine.seek_by(secs),
                Ok(AudioCmd::SetVolume(volume)) => engine.set_volume(volume),
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    // Fade out gently before stopping.
                    engine.fade_out(fade_out_ms);
                    engine.stop();
                    // Update shared state so the UI doesn't keep showing Playing.
                    engine.publish();
                    break;
                }
                Err(RecvTimeoutError::Timeout) => engine.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
            engine.publish();
        }
        debug!("audio thread exiting");
    })
}
