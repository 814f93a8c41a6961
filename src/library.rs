//! Folder scanning and tag extraction.
//!
//! `scan` walks a folder for audio files; each file goes through `read_track`,
//! which pulls title, artist, album, duration and the embedded cover out of the
//! container with `lofty`.

mod art;
mod model;
mod scan;
mod tags;

pub use art::CoverArt;
pub use model::Track;
pub use scan::scan;
