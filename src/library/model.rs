use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::art::CoverArt;

/// One song in the library: what a tile shows and what the player loads.
#[derive(Debug, Clone)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub cover: Option<Arc<CoverArt>>,
}

impl Track {
    /// File name including the extension, used for ordering the library.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
