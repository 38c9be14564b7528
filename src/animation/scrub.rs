//! Scrub-family animations
//!
//! All four kinds animate the same thing: the scrub cursor's fractional
//! position (sample index scaled by [`SCRUB_FIXED_SCALE`]). They differ in
//! shape, duration and what happens once they finish, which the scrub
//! controller decides from the completed value.

use std::time::Duration;

use super::{lerp_fixed, phase_progress, Animate, Curve, Progress};
use crate::scrub::SCRUB_FIXED_SCALE;
use crate::timer::Timings;

/// Cursor motion while scrubbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubAnimation {
    /// Move between two sample positions
    Scrub { from: i32, to: i32 },
    /// Overshoot a history edge, then spring back onto it
    Bounce { from: i32, overshoot: i32, rest: i32 },
    /// Damped left-right shake around `rest` on entering scrub mode
    Wiggle { rest: i32, amplitude: i32 },
    /// Return to the newest sample when leaving scrub mode
    Exit { from: i32, to: i32 },
}

impl ScrubAnimation {
    /// Wiggle one sample step wide around `rest`
    pub fn wiggle(rest: i32) -> Self {
        ScrubAnimation::Wiggle {
            rest,
            amplitude: SCRUB_FIXED_SCALE,
        }
    }

    /// Time easing applied by the timeline
    pub fn curve(&self) -> Curve {
        match self {
            ScrubAnimation::Scrub { .. } => Curve::EaseInOut,
            ScrubAnimation::Bounce { .. } | ScrubAnimation::Exit { .. } => Curve::EaseOut,
            ScrubAnimation::Wiggle { .. } => Curve::Linear,
        }
    }

    pub fn duration(&self, timings: &Timings) -> Duration {
        match self {
            ScrubAnimation::Scrub { .. } | ScrubAnimation::Bounce { .. } => timings.scrub_anim,
            ScrubAnimation::Wiggle { .. } => timings.wiggle,
            ScrubAnimation::Exit { .. } => timings.anim_duration,
        }
    }

    /// Whether ticks of this animation should refresh the value text.
    ///
    /// The wiggle only shakes the graph indicator; the value stays put.
    pub fn shows_value(&self) -> bool {
        !matches!(self, ScrubAnimation::Wiggle { .. })
    }

    /// Where the cursor comes to rest when this animation completes
    pub fn rest_position(&self) -> i32 {
        match *self {
            ScrubAnimation::Scrub { to, .. } | ScrubAnimation::Exit { to, .. } => to,
            ScrubAnimation::Bounce { rest, .. } | ScrubAnimation::Wiggle { rest, .. } => rest,
        }
    }
}

fn lerp_i32(from: i32, to: i32, progress: Progress) -> i32 {
    lerp_fixed(i64::from(from), i64::from(to), progress) as i32
}

impl Animate for ScrubAnimation {
    type Output = i32;

    fn at(&self, progress: Progress) -> i32 {
        match *self {
            ScrubAnimation::Scrub { from, to } | ScrubAnimation::Exit { from, to } => {
                lerp_i32(from, to, progress)
            }
            ScrubAnimation::Bounce {
                from,
                overshoot,
                rest,
            } => match phase_progress(progress, 2) {
                (0, local) => lerp_i32(from, overshoot, local),
                (_, local) => lerp_i32(overshoot, rest, local),
            },
            ScrubAnimation::Wiggle { rest, amplitude } => {
                let offset = match phase_progress(progress, 3) {
                    (0, local) => lerp_i32(0, -amplitude, local),
                    (1, local) => lerp_i32(-amplitude, amplitude / 2, local),
                    (_, local) => lerp_i32(amplitude / 2, 0, local),
                };
                rest + offset
            }
        }
    }
}
