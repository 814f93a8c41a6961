use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::{Accessor, Tag};
use tracing::warn;

use super::art::{CoverArt, extract_cover};
use super::model::Track;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Text fields pulled out of a tag, already trimmed; empty values are `None`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagFields {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl TagFields {
    pub fn from_tag(tag: &Tag) -> Self {
        Self {
            title: non_empty(tag.title()),
            artist: non_empty(tag.artist()),
            album: non_empty(tag.album()),
        }
    }
}

fn non_empty(v: Option<Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Turn optional tag fields into the `(title, artist)` shown on a tile.
///
/// A tagged file missing a field shows "Unknown Title" / "Unknown Artist".
/// A file without any tag shows its file name.
pub fn resolve_labels(file_name: &str, tag: Option<&TagFields>) -> (String, String) {
    match tag {
        Some(fields) => (
            fields
                .title
                .clone()
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            fields
                .artist
                .clone()
                .unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
        ),
        None => (file_name.to_string(), UNKNOWN_ARTIST.to_string()),
    }
}

/// Read tags, duration and cover art for one file.
///
/// Never fails: anything that cannot be read falls back to the file name and
/// the placeholder cover.
pub fn read_track(path: &Path) -> Track {
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "UNKNOWN".to_string());

    let tagged = match lofty::read_from_path(path) {
        Ok(tagged) => tagged,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "no readable tags");
            let (title, artist) = resolve_labels(&file_name, None);
            return Track {
                path: path.to_path_buf(),
                title,
                artist,
                album: None,
                duration: None,
                cover: None,
            };
        }
    };

    let duration = Some(tagged.properties().duration()).filter(|d| !d.is_zero());

    let fields = tagged
        .primary_tag()
        .or_else(|| tagged.first_tag())
        .map(TagFields::from_tag);

    let cover = extract_cover(&tagged).and_then(|bytes| match CoverArt::decode(bytes) {
        Ok(art) => Some(Arc::new(art)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to decode embedded cover");
            None
        }
    });

    let (title, artist) = resolve_labels(&file_name, fields.as_ref());

    Track {
        path: path.to_path_buf(),
        title,
        artist,
        album: fields.and_then(|f| f.album),
        duration,
        cover,
    }
}
