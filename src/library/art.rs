//! Embedded cover pictures.
//!
//! The picture bytes come out of the tag via `lofty`; `image` decodes them and
//! the result is kept as a small RGB thumbnail that the UI samples from when it
//! draws a tile or the now-playing cover.

use image::{DynamicImage, imageops::FilterType};
use lofty::file::{TaggedFile, TaggedFileExt};
use lofty::picture::PictureType;

/// Longest side of a stored thumbnail, in pixels.
pub const THUMBNAIL_SIZE: u32 = 48;

/// A decoded, downscaled cover picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl CoverArt {
    /// Decode picture bytes (PNG or JPEG) into a thumbnail.
    pub fn decode(bytes: &[u8]) -> image::ImageResult<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(&img))
    }

    /// Downscale `img` so that it fits in `THUMBNAIL_SIZE` square, keeping its aspect ratio.
    pub fn from_image(img: &DynamicImage) -> Self {
        let thumb = img
            .resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle)
            .to_rgb8();
        let (width, height) = thumb.dimensions();
        let pixels = thumb.pixels().map(|p| p.0).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, clamped to the picture bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        if self.pixels.is_empty() {
            return [0, 0, 0];
        }
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        self.pixels[(y * self.width + x) as usize]
    }

    /// Largest `(w, h)` with the picture's aspect ratio that fits in `max_w x max_h`.
    pub fn fit(&self, max_w: u32, max_h: u32) -> (u32, u32) {
        if self.width == 0 || self.height == 0 || max_w == 0 || max_h == 0 {
            return (0, 0);
        }
        let by_width = (max_w, (u64::from(max_w) * u64::from(self.height) / u64::from(self.width)) as u32);
        if by_width.1 <= max_h {
            (by_width.0, by_width.1.max(1))
        } else {
            let w = (u64::from(max_h) * u64::from(self.width) / u64::from(self.height)) as u32;
            (w.max(1), max_h)
        }
    }
}

/// One embedded picture as seen by cover selection.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub kind: PictureType,
    /// The picture belongs to the file's primary tag.
    pub primary: bool,
    pub data: &'a [u8],
}

/// Pick the embedded picture to use as cover.
pub fn extract_cover(tagged: &TaggedFile) -> Option<&[u8]> {
    let primary_type = tagged.primary_tag_type();
    let candidates: Vec<Candidate<'_>> = tagged
        .tags()
        .iter()
        .flat_map(|tag| {
            let primary = tag.tag_type() == primary_type;
            tag.pictures().iter().map(move |pic| Candidate {
                kind: pic.pic_type(),
                primary,
                data: pic.data(),
            })
        })
        .collect();
    choose_cover(&candidates)
}

/// Front covers win (primary tag first), then the first picture of the
/// primary tag, then the first picture of any other tag.
pub fn choose_cover<'a>(candidates: &[Candidate<'a>]) -> Option<&'a [u8]> {
    let front = |c: &&Candidate<'a>| c.kind == PictureType::CoverFront;
    candidates
        .iter()
        .filter(|c| c.primary)
        .find(front)
        .or_else(|| candidates.iter().find(front))
        .or_else(|| candidates.iter().find(|c| c.primary))
        .or_else(|| candidates.first())
        .map(|c| c.data)
}
