//! One-shot timers and timing constants
//!
//! Timers never block and never own a thread: a [`OneShot`] only stores a
//! deadline, and the controller polls it with the current time on every
//! tick. Repeating behaviour (scrub auto-repeat) is built by re-arming from
//! the fired deadline, the way a platform timer callback re-registers
//! itself.

use std::time::Duration;

/// Paging transition length (value interpolation and layer slide)
pub const ANIM_DURATION_MS: u64 = 200;

/// Scrub move and history-boundary bounce length
pub const SCRUB_ANIM_DURATION_MS: u64 = 100;

/// Auto-repeat interval while Up/Down is held in scrub mode
pub const SCRUB_REPEAT_INTERVAL_MS: u64 = 150;

/// Scrub-mode entry wiggle length
pub const WIGGLE_ANIM_DURATION_MS: u64 = 300;

/// How long to wait for a data batch before showing an error
pub const LOADING_TIMEOUT_MS: u64 = 8000;

/// Durations the controller runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub anim_duration: Duration,
    pub scrub_anim: Duration,
    pub scrub_repeat: Duration,
    pub wiggle: Duration,
    pub loading_timeout: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            anim_duration: Duration::from_millis(ANIM_DURATION_MS),
            scrub_anim: Duration::from_millis(SCRUB_ANIM_DURATION_MS),
            scrub_repeat: Duration::from_millis(SCRUB_REPEAT_INTERVAL_MS),
            wiggle: Duration::from_millis(WIGGLE_ANIM_DURATION_MS),
            loading_timeout: Duration::from_millis(LOADING_TIMEOUT_MS),
        }
    }
}

/// A cancellable single-deadline timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShot {
    due: Option<Duration>,
}

impl OneShot {
    /// Arm (or re-arm) the timer to fire at `at`
    pub fn arm(&mut self, at: Duration) {
        self.due = Some(at);
    }

    /// Disarm without firing
    pub fn cancel(&mut self) {
        self.due = None;
    }

    /// Whether a deadline is pending
    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Fire if the deadline has passed at `now`.
    ///
    /// Returns the deadline that fired and disarms the timer.
    pub fn fire(&mut self, now: Duration) -> Option<Duration> {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                Some(due)
            }
            _ => None,
        }
    }
}
