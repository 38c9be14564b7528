//! Progress-driven animation engine
//!
//! An animation here is data, not a thread: a pure mapping from normalized
//! progress (`0..=ANIMATION_NORMALIZED_MAX`) to a domain value. The host
//! owns the clock and calls [`Animator::advance`] with the current time;
//! the animator turns elapsed time into eased progress, samples the
//! animation, and hands the finished animation back exactly once so the
//! caller can run its teardown.
//!
//! Each [`Animator`] holds at most one animation. Scheduling a new one
//! unschedules the old one first; the superseded animation is returned to
//! the caller and its teardown is never run. Two animators are used by the
//! detail screen, one per family:
//!
//! - [`paging`]: metric page slide and page-boundary bounce
//! - [`scrub`]: scrub move, history-boundary bounce, wiggle, exit
//!
//! All arithmetic is integer; easing curves are quadratic.

pub mod paging;
pub mod scrub;

use std::fmt;
use std::time::Duration;

pub use paging::{LayerBounce, LayerSlide, PagingAnimation, PagingFrame, ScrollDirection, ValueTween};
pub use scrub::ScrubAnimation;

/// Normalized animation progress
pub type Progress = u32;

/// Progress value at 100%
pub const ANIMATION_NORMALIZED_MAX: Progress = 65_535;

/// Easing applied to linear time progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Curve {
    /// Map linear progress to eased progress. Endpoints are preserved.
    pub fn apply(self, progress: Progress) -> Progress {
        let max = u64::from(ANIMATION_NORMALIZED_MAX);
        let p = u64::from(progress.min(ANIMATION_NORMALIZED_MAX));
        let eased = match self {
            Curve::Linear => p,
            Curve::EaseIn => p * p / max,
            Curve::EaseOut => max - (max - p) * (max - p) / max,
            Curve::EaseInOut => {
                if p < max / 2 {
                    2 * p * p / max
                } else {
                    max - 2 * (max - p) * (max - p) / max
                }
            }
        };
        eased as Progress
    }
}

/// Linear interpolation between two fixed-point values.
pub fn lerp_fixed(from: i64, to: i64, progress: Progress) -> i64 {
    let delta = i128::from(to) - i128::from(from);
    let step = delta * i128::from(progress) / i128::from(ANIMATION_NORMALIZED_MAX);
    (i128::from(from) + step) as i64
}

/// Split progress into `phases` equal sequential segments.
///
/// Returns the active segment index and the progress within it, rescaled
/// to the full normalized range.
pub fn phase_progress(progress: Progress, phases: u32) -> (u32, Progress) {
    let phases = phases.max(1);
    let segment = ANIMATION_NORMALIZED_MAX / phases;
    let index = (progress / segment).min(phases - 1);
    let local = (progress - index * segment).saturating_mul(phases);
    (index, local.min(ANIMATION_NORMALIZED_MAX))
}

/// When an animation runs and how its time is eased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    pub start: Duration,
    pub duration: Duration,
    pub curve: Curve,
}

impl Timeline {
    pub fn new(start: Duration, duration: Duration, curve: Curve) -> Self {
        Self {
            start,
            duration,
            curve,
        }
    }

    /// Eased progress at `now`; clamps before start and after the end.
    pub fn progress_at(&self, now: Duration) -> Progress {
        if self.is_finished(now) {
            return ANIMATION_NORMALIZED_MAX;
        }
        let elapsed = now.saturating_sub(self.start).as_micros();
        let linear = elapsed * u128::from(ANIMATION_NORMALIZED_MAX) / self.duration.as_micros();
        self.curve.apply(linear as Progress)
    }

    /// Whether the full duration has elapsed at `now`
    pub fn is_finished(&self, now: Duration) -> bool {
        now.saturating_sub(self.start) >= self.duration
    }
}

/// A pure mapping from progress to a value.
pub trait Animate {
    /// The animated domain value
    type Output;

    /// Sample the animation at `progress`
    fn at(&self, progress: Progress) -> Self::Output;
}

/// One sampled step of a running animation.
pub struct Frame<A: Animate> {
    /// Value at this step
    pub output: A::Output,
    /// Eased progress of this step
    pub progress: Progress,
    /// The animation itself, handed back once it has run to completion
    pub completed: Option<A>,
}

#[derive(Debug)]
struct Scheduled<A> {
    animation: A,
    timeline: Timeline,
}

/// Single-slot animation scheduler for one animation family.
#[derive(Debug)]
pub struct Animator<A> {
    family: &'static str,
    running: Option<Scheduled<A>>,
}

impl<A: Animate + fmt::Debug> Animator<A> {
    /// Create an idle animator; `family` is used for log output only
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            running: None,
        }
    }

    /// Whether an animation is in flight
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The animation in flight, if any
    pub fn current(&self) -> Option<&A> {
        self.running.as_ref().map(|s| &s.animation)
    }

    /// Start `animation`, unscheduling whatever was running.
    ///
    /// Returns the superseded animation. Its teardown must not be run.
    pub fn schedule(&mut self, animation: A, timeline: Timeline) -> Option<A> {
        let superseded = self.unschedule();
        tracing::debug!(
            family = self.family,
            ?animation,
            duration_ms = timeline.duration.as_millis() as u64,
            "animation scheduled"
        );
        self.running = Some(Scheduled {
            animation,
            timeline,
        });
        superseded
    }

    /// Drop the running animation without completing it.
    pub fn unschedule(&mut self) -> Option<A> {
        let scheduled = self.running.take()?;
        tracing::debug!(
            family = self.family,
            animation = ?scheduled.animation,
            "animation unscheduled"
        );
        Some(scheduled.animation)
    }

    /// Sample the running animation at `now`.
    ///
    /// Once the timeline has elapsed the final frame is sampled at full
    /// progress and carries the animation in `completed`; the animator is
    /// idle afterwards.
    pub fn advance(&mut self, now: Duration) -> Option<Frame<A>> {
        let scheduled = self.running.as_ref()?;
        let progress = scheduled.timeline.progress_at(now);
        let output = scheduled.animation.at(progress);
        let completed = if scheduled.timeline.is_finished(now) {
            self.running.take().map(|s| s.animation)
        } else {
            None
        };
        Some(Frame {
            output,
            progress,
            completed,
        })
    }
}
