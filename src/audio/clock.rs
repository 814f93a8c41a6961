use std::time::{Duration, Instant};

/// Tracks elapsed playback time across pauses and seeks.
///
/// `rodio` does not report a position for sources built with
/// `skip_duration`, so the audio thread keeps its own clock.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Clock {
    accumulated: Duration,
    started_at: Option<Instant>,
}

impl Clock {
    /// Reset to `position`, running or paused.
    pub(crate) fn restart_at(&mut self, position: Duration, running: bool, now: Instant) {
        self.accumulated = position;
        self.started_at = running.then_some(now);
    }

    pub(crate) fn pause_at(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
    }

    pub(crate) fn resume_at(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub(crate) fn elapsed_at(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
