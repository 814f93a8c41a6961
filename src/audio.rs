//! The media pipeline.
//!
//! A dedicated thread owns the `rodio` output stream and the sink of the
//! current track. The UI drives it through `AudioCmd`s and reads back a
//! shared `PlaybackInfo` snapshot.

mod clock;
mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioCmd, PlaybackInfo};
