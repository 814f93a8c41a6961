use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Front end of the audio thread: a command channel plus the shared playback snapshot.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(volume: u8) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, playback.clone(), volume);

        Self {
            tx,
            playback,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Fade out, stop the audio thread and wait for it.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: u64::try_from(fade_out.as_millis()).unwrap_or(u64::MAX),
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
