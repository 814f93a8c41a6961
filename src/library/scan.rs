use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;
use super::tags::read_track;

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// List the audio files under `dir` and read their tags.
///
/// Tracks come back ordered by file name (case-insensitive) so the grid keeps
/// the same order across rescans.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let exts = normalized_extensions(settings);
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the chosen folder.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && is_audio_file(path, &exts) {
            tracks.push(read_track(path));
        }
    }

    tracks.sort_by(|a, b| {
        a.file_name()
            .to_lowercase()
            .cmp(&b.file_name().to_lowercase())
            .then_with(|| a.path.cmp(&b.path))
    });
    info!(dir = %dir.display(), count = tracks.len(), "scanned folder");
    tracks
}
