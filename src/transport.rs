//! Arithmetic behind the transport controls: time labels, the seek bar and
//! the volume slider.

use std::time::Duration;

pub const MAX_VOLUME: u8 = 100;

/// Format a `Duration` as `mm:ss`. Minutes keep counting past 59.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// How far along the track we are, in `[0, 1]`.
///
/// Unknown or zero totals report `0` so the seek bar stays empty.
pub fn progress_ratio(elapsed: Duration, total: Option<Duration>) -> f64 {
    match total {
        Some(total) if !total.is_zero() => {
            (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

/// Map a click `offset` cells into a seek bar `width` cells wide to a position.
///
/// The last cell maps to the end of the track. Returns `None` when the total
/// is unknown or the bar has no width.
pub fn seek_target(offset: u16, width: u16, total: Option<Duration>) -> Option<Duration> {
    let total = total.filter(|t| !t.is_zero())?;
    if width == 0 {
        return None;
    }
    let ratio = if width == 1 {
        0.0
    } else {
        f64::from(offset.min(width - 1)) / f64::from(width - 1)
    };
    Some(total.mul_f64(ratio))
}

/// Map a click `offset` rows from the top of a vertical slider `height` rows
/// tall to a volume. The top row is full volume, the bottom row is silence.
pub fn volume_from_offset(offset: u16, height: u16) -> u8 {
    if height <= 1 {
        return MAX_VOLUME;
    }
    let offset = offset.min(height - 1);
    let from_bottom = u32::from(height - 1 - offset);
    let volume = (from_bottom * u32::from(MAX_VOLUME) + u32::from(height - 1) / 2)
        / u32::from(height - 1);
    volume as u8
}

/// Number of filled rows for `volume` on a slider `height` rows tall.
pub fn volume_fill(volume: u8, height: u16) -> u16 {
    let volume = u32::from(volume.min(MAX_VOLUME));
    ((volume * u32::from(height) + u32::from(MAX_VOLUME) / 2) / u32::from(MAX_VOLUME)) as u16
}

/// Change `volume` by `delta`, staying within `0..=100`.
pub fn step_volume(volume: u8, delta: i16) -> u8 {
    (i16::from(volume) + delta).clamp(0, i16::from(MAX_VOLUME)) as u8
}

/// Clamp a seek to the track bounds. Unknown totals only clamp at zero.
pub fn clamp_position(position: Duration, total: Option<Duration>) -> Duration {
    match total {
        Some(total) => position.min(total),
        None => position,
    }
}

/// Apply a signed scrub of `secs` seconds to `elapsed`.
pub fn scrub(elapsed: Duration, secs: i64, total: Option<Duration>) -> Duration {
    let moved = if secs >= 0 {
        elapsed.saturating_add(Duration::from_secs(secs.unsigned_abs()))
    } else {
        elapsed.saturating_sub(Duration::from_secs(secs.unsigned_abs()))
    };
    clamp_position(moved, total)
}
