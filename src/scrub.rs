//! Scrub state machine
//!
//! Scrubbing lets the user walk a cursor through a metric's history one
//! sample at a time. The discrete index is committed the moment a move is
//! accepted; the fractional position then animates toward it. A move past
//! either end plays a bounce instead and leaves the index alone.
//!
//! # States
//!
//! - [`ScrubMode::Browsing`] - not scrubbing; Up/Down page between metrics
//! - [`ScrubMode::Scrubbing`] - Up/Down move the cursor, with auto-repeat
//! - [`ScrubMode::Exiting`] - exit animation in flight; moves are ignored,
//!   Select re-enters and supersedes the exit
//!
//! The controller owns no clock. Every call takes the current time and
//! [`ScrubController::advance`] is polled once per frame.

use std::time::Duration;

use crate::animation::{Animator, ScrubAnimation, Timeline};
use crate::timer::{OneShot, Timings};

/// Scale of the cursor's fractional sample index
pub const SCRUB_FIXED_SCALE: i32 = 1000;

/// How far past a history edge a bounce travels (a third of a step)
pub const BOUNCE_OVERSHOOT: i32 = SCRUB_FIXED_SCALE / 3;

/// Scrub mode of the detail screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrubMode {
    #[default]
    Browsing,
    Scrubbing,
    Exiting,
}

/// Direction of a cursor move through history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubDirection {
    /// Toward the first sample (Down)
    Older,
    /// Toward the latest sample (Up)
    Newer,
}

impl ScrubDirection {
    fn delta(self) -> i32 {
        match self {
            ScrubDirection::Older => -1,
            ScrubDirection::Newer => 1,
        }
    }
}

/// Committed sample index plus the rendered fractional position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrubCursor {
    pub index: u8,
    /// Sample index scaled by [`SCRUB_FIXED_SCALE`]; may leave the valid
    /// span by up to [`BOUNCE_OVERSHOOT`] while a bounce is playing
    pub position: i32,
}

/// Result of a directional move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved { index: u8 },
    Bounced,
    Ignored,
}

/// What changed during [`ScrubController::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubEvent {
    /// The cursor moved; refresh the value text when `show_value` is set
    Moved { show_value: bool },
    /// An animation finished at its rest position. `relabel` asks for the
    /// metric name (and its "past" marker) to be recomputed.
    Settled { relabel: bool },
    /// The exit animation finished; scrub mode is over
    Exited,
}

/// Scrub cursor, animation slot and repeat-on-hold timer of one screen.
#[derive(Debug)]
pub struct ScrubController {
    mode: ScrubMode,
    cursor: ScrubCursor,
    animator: Animator<ScrubAnimation>,
    repeat: Option<ScrubDirection>,
    repeat_timer: OneShot,
    timings: Timings,
}

fn last_position(count: usize) -> i32 {
    (count.saturating_sub(1) as i32) * SCRUB_FIXED_SCALE
}

impl ScrubController {
    pub fn new(timings: Timings) -> Self {
        Self {
            mode: ScrubMode::Browsing,
            cursor: ScrubCursor::default(),
            animator: Animator::new("scrub"),
            repeat: None,
            repeat_timer: OneShot::default(),
            timings,
        }
    }

    pub fn mode(&self) -> ScrubMode {
        self.mode
    }

    pub fn cursor(&self) -> ScrubCursor {
        self.cursor
    }

    /// Whether the graph should render in scrub style (markers and a
    /// moving indicator). True while exiting, too.
    pub fn is_active(&self) -> bool {
        self.mode != ScrubMode::Browsing
    }

    /// Whether an animation or the repeat timer still needs frames
    pub fn has_pending_work(&self) -> bool {
        self.animator.is_running() || self.repeat_timer.is_armed()
    }

    /// Handle Select: enter when browsing or exiting, exit when scrubbing.
    pub fn toggle(&mut self, count: usize, now: Duration) -> bool {
        match self.mode {
            ScrubMode::Scrubbing => {
                self.exit(count, now);
                true
            }
            ScrubMode::Browsing | ScrubMode::Exiting => self.enter(count, now),
        }
    }

    /// Enter scrub mode on the latest sample.
    ///
    /// From browsing the cursor is placed on the newest sample and wiggles.
    /// From an in-flight exit the exit is superseded and the cursor glides
    /// on to the newest sample from wherever it was drawn last. Returns
    /// `false` when there is no history to scrub.
    pub fn enter(&mut self, count: usize, now: Duration) -> bool {
        if count == 0 {
            return false;
        }
        let rest = last_position(count);
        let animation = match self.mode {
            ScrubMode::Scrubbing => return true,
            ScrubMode::Browsing => {
                self.cursor.position = rest;
                ScrubAnimation::wiggle(rest)
            }
            ScrubMode::Exiting => ScrubAnimation::Scrub {
                from: self.cursor.position,
                to: rest,
            },
        };
        self.cursor.index = (count - 1) as u8;
        self.mode = ScrubMode::Scrubbing;
        tracing::debug!(count, "scrub mode entered");
        self.schedule(animation, now);
        true
    }

    /// Start leaving scrub mode. Browsing resumes when the exit completes.
    pub fn exit(&mut self, count: usize, now: Duration) {
        if self.mode != ScrubMode::Scrubbing {
            return;
        }
        self.stop_repeat();
        self.mode = ScrubMode::Exiting;
        self.cursor.index = count.saturating_sub(1) as u8;
        self.schedule(
            ScrubAnimation::Exit {
                from: self.cursor.position,
                to: last_position(count),
            },
            now,
        );
    }

    /// Move the cursor one sample, or bounce off the edge.
    pub fn step(&mut self, direction: ScrubDirection, count: usize, now: Duration) -> StepOutcome {
        if self.mode != ScrubMode::Scrubbing || count == 0 {
            return StepOutcome::Ignored;
        }
        let target = i32::from(self.cursor.index) + direction.delta();
        if (0..count as i32).contains(&target) {
            self.cursor.index = target as u8;
            self.schedule(
                ScrubAnimation::Scrub {
                    from: self.cursor.position,
                    to: target * SCRUB_FIXED_SCALE,
                },
                now,
            );
            StepOutcome::Moved {
                index: self.cursor.index,
            }
        } else {
            let rest = i32::from(self.cursor.index) * SCRUB_FIXED_SCALE;
            self.schedule(
                ScrubAnimation::Bounce {
                    from: self.cursor.position,
                    overshoot: rest + direction.delta() * BOUNCE_OVERSHOOT,
                    rest,
                },
                now,
            );
            StepOutcome::Bounced
        }
    }

    /// Button down: move once now, then keep repeating until release.
    pub fn press(&mut self, direction: ScrubDirection, count: usize, now: Duration) -> StepOutcome {
        let outcome = self.step(direction, count, now);
        if outcome != StepOutcome::Ignored {
            self.repeat = Some(direction);
            self.repeat_timer.arm(now + self.timings.scrub_repeat);
        }
        outcome
    }

    /// Button up: stop repeating if this direction was the one held.
    pub fn release(&mut self, direction: ScrubDirection) {
        if self.repeat == Some(direction) {
            self.stop_repeat();
        }
    }

    fn stop_repeat(&mut self) {
        self.repeat = None;
        self.repeat_timer.cancel();
    }

    fn schedule(&mut self, animation: ScrubAnimation, now: Duration) {
        let timeline = Timeline::new(now, animation.duration(&self.timings), animation.curve());
        if let Some(superseded) = self.animator.schedule(animation, timeline) {
            tracing::debug!(?superseded, from = self.cursor.position, "scrub animation superseded");
        }
    }

    /// Fire the repeat timer and step the running animation.
    ///
    /// `count` is the history length of the metric on screen.
    pub fn advance(&mut self, count: usize, now: Duration) -> Option<ScrubEvent> {
        if let Some(due) = self.repeat_timer.fire(now) {
            if let Some(direction) = self.repeat {
                self.step(direction, count, now);
                self.repeat_timer.arm(due + self.timings.scrub_repeat);
            }
        }

        let frame = self.animator.advance(now)?;
        self.cursor.position = frame.output;
        let Some(completed) = frame.completed else {
            return Some(ScrubEvent::Moved {
                show_value: self.animator.current().is_some_and(|a| a.shows_value()),
            });
        };

        self.cursor.position = completed.rest_position();
        match completed {
            ScrubAnimation::Scrub { .. } => {
                let max = last_position(count);
                self.cursor.position = self.cursor.position.clamp(0, max);
                self.cursor.index = (self.cursor.position / SCRUB_FIXED_SCALE) as u8;
                Some(ScrubEvent::Settled { relabel: true })
            }
            ScrubAnimation::Bounce { .. } | ScrubAnimation::Wiggle { .. } => {
                Some(ScrubEvent::Settled { relabel: false })
            }
            ScrubAnimation::Exit { .. } => {
                self.mode = ScrubMode::Browsing;
                tracing::debug!("scrub mode exited");
                Some(ScrubEvent::Exited)
            }
        }
    }

    /// Drop everything and return to browsing without animating.
    pub fn reset(&mut self) {
        self.animator.unschedule();
        self.stop_repeat();
        self.mode = ScrubMode::Browsing;
        self.cursor = ScrubCursor::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn scrubbing(count: usize) -> ScrubController {
        let mut scrub = ScrubController::new(Timings::default());
        assert!(scrub.enter(count, ms(0)));
        // let the wiggle finish
        while scrub.advance(count, ms(1000)).is_some() {}
        scrub
    }

    #[test]
    fn test_enter_starts_on_latest_with_wiggle() {
        let mut scrub = ScrubController::new(Timings::default());
        assert!(scrub.enter(5, ms(0)));
        assert_eq!(scrub.mode(), ScrubMode::Scrubbing);
        assert_eq!(scrub.cursor().index, 4);
        assert_eq!(scrub.cursor().position, 4000);
        assert!(matches!(
            scrub.animator.current(),
            Some(ScrubAnimation::Wiggle { rest: 4000, .. })
        ));

        assert_eq!(
            scrub.advance(5, ms(100)),
            Some(ScrubEvent::Moved { show_value: false })
        );
        assert_eq!(
            scrub.advance(5, ms(300)),
            Some(ScrubEvent::Settled { relabel: false })
        );
        assert_eq!(scrub.cursor().position, 4000);
        assert_eq!(scrub.cursor().index, 4);
    }

    #[test]
    fn test_enter_requires_history() {
        let mut scrub = ScrubController::new(Timings::default());
        assert!(!scrub.enter(0, ms(0)));
        assert_eq!(scrub.mode(), ScrubMode::Browsing);
    }

    #[test]
    fn test_step_commits_index_immediately() {
        let mut scrub = scrubbing(3);
        assert_eq!(
            scrub.step(ScrubDirection::Older, 3, ms(1000)),
            StepOutcome::Moved { index: 1 }
        );
        assert_eq!(scrub.cursor().index, 1);
        assert_eq!(scrub.cursor().position, 2000);

        scrub.advance(3, ms(1050));
        let mid = scrub.cursor().position;
        assert!(mid < 2000 && mid > 1000, "mid-flight at {mid}");

        assert_eq!(
            scrub.advance(3, ms(1100)),
            Some(ScrubEvent::Settled { relabel: true })
        );
        assert_eq!(scrub.cursor().position, 1000);
    }

    #[test]
    fn test_bounce_at_newest_keeps_index() {
        let mut scrub = scrubbing(2);
        assert_eq!(scrub.step(ScrubDirection::Newer, 2, ms(1000)), StepOutcome::Bounced);
        assert_eq!(scrub.cursor().index, 1);
        assert!(matches!(
            scrub.animator.current(),
            Some(ScrubAnimation::Bounce {
                overshoot: 1333,
                rest: 1000,
                ..
            })
        ));
        scrub.advance(2, ms(1100));
        assert_eq!(scrub.cursor().position, 1000);
    }

    #[test]
    fn test_bounce_at_oldest_overshoots_below_zero() {
        let mut scrub = scrubbing(2);
        scrub.step(ScrubDirection::Older, 2, ms(1000));
        scrub.advance(2, ms(1100));
        assert_eq!(scrub.step(ScrubDirection::Older, 2, ms(1200)), StepOutcome::Bounced);
        assert_eq!(scrub.cursor().index, 0);
        assert!(matches!(
            scrub.animator.current(),
            Some(ScrubAnimation::Bounce { overshoot: -333, rest: 0, .. })
        ));
    }

    #[test]
    fn test_supersession_starts_from_rendered_position() {
        let mut scrub = scrubbing(5);
        scrub.step(ScrubDirection::Older, 5, ms(1000));
        scrub.advance(5, ms(1050));
        let rendered = scrub.cursor().position;
        assert_ne!(rendered, 3000);

        scrub.step(ScrubDirection::Older, 5, ms(1050));
        assert_eq!(scrub.cursor().index, 2);
        assert_eq!(
            scrub.animator.current(),
            Some(&ScrubAnimation::Scrub {
                from: rendered,
                to: 2000
            })
        );
    }

    #[test]
    fn test_repeat_while_held() {
        let mut scrub = scrubbing(10);
        scrub.press(ScrubDirection::Older, 10, ms(1000));
        assert_eq!(scrub.cursor().index, 8);

        scrub.advance(10, ms(1100));
        assert_eq!(scrub.cursor().index, 8);
        scrub.advance(10, ms(1150));
        assert_eq!(scrub.cursor().index, 7);
        scrub.advance(10, ms(1300));
        assert_eq!(scrub.cursor().index, 6);

        scrub.release(ScrubDirection::Older);
        scrub.advance(10, ms(1600));
        assert_eq!(scrub.cursor().index, 6);
    }

    #[test]
    fn test_repeat_keeps_cadence_with_late_frames() {
        let mut scrub = scrubbing(10);
        scrub.press(ScrubDirection::Older, 10, ms(1000));

        // Frames land 40 ms after each deadline; the next deadline still
        // counts from the one that fired
        scrub.advance(10, ms(1190));
        assert_eq!(scrub.cursor().index, 7);
        scrub.advance(10, ms(1299));
        assert_eq!(scrub.cursor().index, 7);
        scrub.advance(10, ms(1300));
        assert_eq!(scrub.cursor().index, 6);
        scrub.advance(10, ms(1490));
        assert_eq!(scrub.cursor().index, 5);
    }

    #[test]
    fn test_release_of_other_direction_keeps_repeat() {
        let mut scrub = scrubbing(10);
        scrub.press(ScrubDirection::Older, 10, ms(1000));
        scrub.release(ScrubDirection::Newer);
        assert!(scrub.repeat_timer.is_armed());
    }

    #[test]
    fn test_exit_completes_to_browsing() {
        let mut scrub = scrubbing(4);
        scrub.step(ScrubDirection::Older, 4, ms(1000));
        scrub.advance(4, ms(1100));
        scrub.press(ScrubDirection::Older, 4, ms(1200));

        assert!(scrub.toggle(4, ms(1250)));
        assert_eq!(scrub.mode(), ScrubMode::Exiting);
        assert!(!scrub.repeat_timer.is_armed());
        assert!(scrub.is_active());

        assert_eq!(scrub.step(ScrubDirection::Older, 4, ms(1300)), StepOutcome::Ignored);
        assert_eq!(scrub.advance(4, ms(1450)), Some(ScrubEvent::Exited));
        assert_eq!(scrub.mode(), ScrubMode::Browsing);
        assert_eq!(scrub.cursor().position, 3000);
        assert_eq!(scrub.cursor().index, 3);
    }

    #[test]
    fn test_reenter_during_exit_supersedes_it() {
        let mut scrub = scrubbing(4);
        scrub.step(ScrubDirection::Older, 4, ms(1000));
        scrub.advance(4, ms(1100));
        scrub.exit(4, ms(1200));
        scrub.advance(4, ms(1250));
        let rendered = scrub.cursor().position;

        assert!(scrub.toggle(4, ms(1250)));
        assert_eq!(scrub.mode(), ScrubMode::Scrubbing);
        assert_eq!(
            scrub.animator.current(),
            Some(&ScrubAnimation::Scrub {
                from: rendered,
                to: 3000
            })
        );
        // The exit's teardown never runs
        while let Some(event) = scrub.advance(4, ms(2000)) {
            assert_ne!(event, ScrubEvent::Exited);
        }
        assert_eq!(scrub.mode(), ScrubMode::Scrubbing);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut scrub = scrubbing(4);
        scrub.press(ScrubDirection::Older, 4, ms(1000));
        scrub.reset();
        assert_eq!(scrub.mode(), ScrubMode::Browsing);
        assert!(!scrub.has_pending_work());
        assert_eq!(scrub.cursor(), ScrubCursor::default());
    }

    proptest! {
        #[test]
        fn test_index_stays_in_bounds(
            count in 1usize..=20,
            moves in prop::collection::vec(any::<bool>(), 0..60)
        ) {
            let mut scrub = scrubbing(count);
            let mut now = ms(1000);
            for newer in moves {
                let direction = if newer { ScrubDirection::Newer } else { ScrubDirection::Older };
                scrub.step(direction, count, now);
                prop_assert!(usize::from(scrub.cursor().index) < count);
                now += ms(30);
                scrub.advance(count, now);
                let position = scrub.cursor().position;
                prop_assert!(position >= -BOUNCE_OVERSHOOT);
                prop_assert!(position <= last_position(count) + BOUNCE_OVERSHOOT);
            }
            while scrub.advance(count, now + ms(1000)).is_some() {}
            let cursor = scrub.cursor();
            prop_assert_eq!(cursor.position, i32::from(cursor.index) * SCRUB_FIXED_SCALE);
        }

        #[test]
        fn test_older_from_zero_always_bounces(count in 1usize..=20, presses in 1usize..10) {
            let mut scrub = scrubbing(count);
            let mut now = ms(1000);
            for _ in 1..count {
                scrub.step(ScrubDirection::Older, count, now);
            }
            for _ in 0..presses {
                now += ms(10);
                prop_assert_eq!(scrub.step(ScrubDirection::Older, count, now), StepOutcome::Bounced);
                prop_assert_eq!(scrub.cursor().index, 0);
            }
        }
    }
}
