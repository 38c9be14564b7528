//! Metric paging animations
//!
//! Moving to another metric page slides the name and graph layers out,
//! swaps their content while they are off to the side, and slides them
//! back in from the opposite edge. The value text meanwhile counts from the
//! old page's value to the new one. At either end of the metric list the
//! layers nudge a third of the slide distance and come straight back.

use std::time::Duration;

use super::{lerp_fixed, phase_progress, Animate, Curve, Progress};
use crate::fixed_point::{parse_fixed_point, FixedValue};
use crate::timer::Timings;

/// Vertical distance a layer travels when sliding out
pub const ANIM_SLIDE_DISTANCE: i32 = 15;

/// Which button triggered the page change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Previous metric; layers leave downward
    Up,
    /// Next metric; layers leave upward
    Down,
}

impl ScrollDirection {
    /// Change in page index
    pub fn page_delta(self) -> i32 {
        match self {
            ScrollDirection::Up => -1,
            ScrollDirection::Down => 1,
        }
    }

    fn out_delta(self, distance: i32) -> i32 {
        match self {
            ScrollDirection::Up => distance,
            ScrollDirection::Down => -distance,
        }
    }
}

/// Fixed-point interpolation between two pre-formatted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueTween {
    pub from: i64,
    pub to: i64,
    /// Display precision: the larger of both sides' decimals
    pub decimals: u8,
}

impl ValueTween {
    /// Tween between two decimal strings
    pub fn between(from_text: &str, to_text: &str) -> Self {
        let from = parse_fixed_point(from_text);
        let to = parse_fixed_point(to_text);
        Self {
            from: from.raw,
            to: to.raw,
            decimals: from.decimals.max(to.decimals),
        }
    }

    /// Value at `progress`, carrying the display precision
    pub fn value_at(&self, progress: Progress) -> FixedValue {
        FixedValue {
            raw: lerp_fixed(self.from, self.to, progress),
            decimals: self.decimals,
        }
    }
}

/// Out-and-back-in slide of a layer, as a vertical pixel offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSlide {
    out_delta: i32,
}

impl LayerSlide {
    pub fn new(direction: ScrollDirection) -> Self {
        Self {
            out_delta: direction.out_delta(ANIM_SLIDE_DISTANCE),
        }
    }
}

impl Animate for LayerSlide {
    type Output = i32;

    fn at(&self, progress: Progress) -> i32 {
        let out = i64::from(self.out_delta);
        match phase_progress(progress, 2) {
            (0, local) => lerp_fixed(0, out, Curve::EaseIn.apply(local)) as i32,
            (_, local) => lerp_fixed(-out, 0, Curve::EaseOut.apply(local)) as i32,
        }
    }
}

/// Nudge toward an edge and back to the exact home position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerBounce {
    delta: i32,
}

impl LayerBounce {
    pub fn new(direction: ScrollDirection) -> Self {
        Self {
            delta: direction.out_delta(ANIM_SLIDE_DISTANCE / 3),
        }
    }
}

impl Animate for LayerBounce {
    type Output = i32;

    fn at(&self, progress: Progress) -> i32 {
        let delta = i64::from(self.delta);
        match phase_progress(progress, 2) {
            (0, local) => lerp_fixed(0, delta, Curve::EaseOut.apply(local)) as i32,
            (_, local) => lerp_fixed(delta, 0, Curve::EaseIn.apply(local)) as i32,
        }
    }
}

/// Sampled state of a paging animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingFrame {
    /// Vertical offset applied to the name and graph layers
    pub layer_offset: i32,
    /// Interpolated value text, for slides only
    pub value: Option<FixedValue>,
    /// Whether the out phase is over and the new content should show
    pub past_midpoint: bool,
}

/// The paging family: at most one of these runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingAnimation {
    /// Page changed: slide layers and interpolate the value
    Slide { slide: LayerSlide, value: ValueTween },
    /// Page change blocked at a list boundary
    Bounce(LayerBounce),
}

impl PagingAnimation {
    /// Slide transition from a page showing `old_value` to one showing `new_value`
    pub fn slide(direction: ScrollDirection, old_value: &str, new_value: &str) -> Self {
        PagingAnimation::Slide {
            slide: LayerSlide::new(direction),
            value: ValueTween::between(old_value, new_value),
        }
    }

    /// Boundary bounce in `direction`
    pub fn bounce(direction: ScrollDirection) -> Self {
        PagingAnimation::Bounce(LayerBounce::new(direction))
    }

    /// Total run time. Phase curves are applied internally, so the
    /// timeline itself runs linear.
    pub fn duration(&self, timings: &Timings) -> Duration {
        match self {
            PagingAnimation::Slide { .. } => timings.anim_duration,
            PagingAnimation::Bounce(_) => (timings.anim_duration / 3) * 2,
        }
    }
}

impl Animate for PagingAnimation {
    type Output = PagingFrame;

    fn at(&self, progress: Progress) -> PagingFrame {
        match self {
            PagingAnimation::Slide { slide, value } => PagingFrame {
                layer_offset: slide.at(progress),
                value: Some(value.value_at(Curve::EaseInOut.apply(progress))),
                past_midpoint: phase_progress(progress, 2).0 > 0,
            },
            PagingAnimation::Bounce(bounce) => PagingFrame {
                layer_offset: bounce.at(progress),
                value: None,
                past_midpoint: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ANIMATION_NORMALIZED_MAX;

    const MAX: Progress = ANIMATION_NORMALIZED_MAX;

    #[test]
    fn test_value_tween_takes_wider_precision() {
        let tween = ValueTween::between("50", "0.0234");
        assert_eq!(tween.from, 500_000);
        assert_eq!(tween.to, 234);
        assert_eq!(tween.decimals, 4);
        assert_eq!(tween.value_at(0).format(), "50.0000");
        assert_eq!(tween.value_at(MAX).format(), "0.0234");
    }

    #[test]
    fn test_slide_leaves_and_returns() {
        let slide = LayerSlide::new(ScrollDirection::Down);
        assert_eq!(slide.at(0), 0);
        // End of the out phase: fully out toward the top
        assert_eq!(slide.at(MAX / 2 - 1), -14);
        // Start of the in phase: entering from the bottom
        assert_eq!(slide.at(MAX / 2), ANIM_SLIDE_DISTANCE);
        assert_eq!(slide.at(MAX), 0);
    }

    #[test]
    fn test_slide_up_mirrors_down() {
        let up = LayerSlide::new(ScrollDirection::Up);
        let down = LayerSlide::new(ScrollDirection::Down);
        for p in [0, 1000, 20_000, 40_000, MAX] {
            assert_eq!(up.at(p), -down.at(p));
        }
    }

    #[test]
    fn test_bounce_peaks_at_a_third() {
        let bounce = LayerBounce::new(ScrollDirection::Up);
        assert_eq!(bounce.at(0), 0);
        assert_eq!(bounce.at(MAX / 2), ANIM_SLIDE_DISTANCE / 3);
        assert_eq!(bounce.at(MAX), 0);
    }

    #[test]
    fn test_paging_frame_midpoint() {
        let anim = PagingAnimation::slide(ScrollDirection::Down, "1", "2");
        assert!(!anim.at(MAX / 4).past_midpoint);
        assert!(anim.at(MAX / 2 + 10).past_midpoint);
        assert_eq!(anim.at(MAX).value.map(|v| v.raw), Some(20_000));
    }

    #[test]
    fn test_bounce_frame_has_no_value() {
        let frame = PagingAnimation::bounce(ScrollDirection::Down).at(MAX / 3);
        assert!(frame.value.is_none());
        assert!(!frame.past_midpoint);
    }

    #[test]
    fn test_durations() {
        let timings = Timings::default();
        assert_eq!(
            PagingAnimation::slide(ScrollDirection::Up, "1", "2").duration(&timings),
            Duration::from_millis(200)
        );
        assert_eq!(
            PagingAnimation::bounce(ScrollDirection::Up).duration(&timings),
            Duration::from_nanos(133_333_332)
        );
    }
}
