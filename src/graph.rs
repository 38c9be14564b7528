//! Graph coordinate mapping
//!
//! Projects history samples into pixel coordinates inside the graph layer.
//! X is spaced evenly by sample index (not by time); Y maps `[min, max]` of
//! the value range onto the layer height, inverted so that larger values
//! sit higher on screen.

use crate::history::{ValueRange, MAX_HISTORY_POINTS};
use crate::render::{Point, Size};
use crate::scrub::SCRUB_FIXED_SCALE;
use crate::types::BoundedVec;

/// Inset of the plotted area from the layer edge
pub const GRAPH_MARGIN: i32 = 2;

/// Total inset across both edges of an axis
pub const GRAPH_PADDING: i32 = GRAPH_MARGIN * 2;

/// Pixel positions of one metric's samples
pub type GraphPoints = BoundedVec<Point, MAX_HISTORY_POINTS>;

/// Map samples to pixel positions inside a layer of `size`.
///
/// Returns an empty set when fewer than two samples exist: a graph needs a
/// slope, and the x spacing divides by `count - 1`.
pub fn calculate_graph_points(samples: &[i64], size: Size, range: ValueRange) -> GraphPoints {
    let count = samples.len();
    if count < 2 {
        return GraphPoints::new();
    }

    let graph_width = i64::from(size.w - GRAPH_PADDING);
    let graph_height = i64::from(size.h - GRAPH_PADDING);
    let last = (count - 1) as i64;
    let range_span = i128::from(range.range);

    samples
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let x = i64::from(GRAPH_MARGIN) + (i as i64 * graph_width) / last;
            let offset = i128::from(value) - i128::from(range.min);
            // A saturated range (extreme i64 spans) could overshoot the layer
            let scaled = (offset * i128::from(graph_height) / range_span)
                .clamp(0, i128::from(graph_height)) as i64;
            let y = i64::from(GRAPH_MARGIN) + graph_height - scaled;
            Point::new(x as i32, y as i32)
        })
        .collect()
}

/// Pixel position of a fractional sample index.
///
/// `index_fixed` carries the sample index scaled by [`SCRUB_FIXED_SCALE`].
/// Positions past either end (bounce overshoot) extrapolate along the edge
/// segment instead of clamping, so motion stays continuous through a
/// bounce. Returns `None` with fewer than two points.
pub fn interpolate_indicator_position(points: &[Point], index_fixed: i32) -> Option<Point> {
    let count = points.len() as i32;
    if count < 2 {
        return None;
    }
    let scale = SCRUB_FIXED_SCALE;

    let (idx, frac) = if index_fixed < 0 {
        (0, index_fixed)
    } else if index_fixed / scale >= count - 1 {
        (count - 2, scale + (index_fixed - (count - 1) * scale))
    } else {
        (index_fixed / scale, index_fixed % scale)
    };

    let a = points[idx as usize];
    let b = points[idx as usize + 1];
    Some(Point::new(
        a.x + (b.x - a.x) * frac / scale,
        a.y + (b.y - a.y) * frac / scale,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::calculate_value_range;
    use proptest::prelude::*;

    fn points_for(samples: &[i64], size: Size) -> GraphPoints {
        let range = calculate_value_range(samples).unwrap();
        calculate_graph_points(samples, size, range)
    }

    #[test]
    fn test_two_samples_span_the_layer() {
        let points = points_for(&[8500, 234], Size::new(114, 68));
        assert_eq!(points.len(), 2);
        // Larger value is higher (smaller y)
        assert_eq!(points[0], Point::new(2, 2));
        assert_eq!(points[1], Point::new(112, 66));
    }

    #[test]
    fn test_fewer_than_two_samples_yield_nothing() {
        assert!(points_for(&[5], Size::new(100, 50)).is_empty());
        let range = ValueRange {
            min: 0,
            max: 0,
            range: 1,
        };
        assert!(calculate_graph_points(&[], Size::new(100, 50), range).is_empty());
    }

    #[test]
    fn test_flat_history_sits_on_the_floor() {
        let points = points_for(&[7, 7, 7], Size::new(100, 50));
        assert!(points.iter().all(|p| p.y == 48));
    }

    #[test]
    fn test_x_spacing_is_uniform() {
        let points = points_for(&[1, 100, 2, 50, 3], Size::new(84, 40));
        let xs: Vec<i32> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2, 22, 42, 62, 82]);
    }

    #[test]
    fn test_indicator_on_sample() {
        let points = [Point::new(0, 0), Point::new(10, 20), Point::new(20, 0)];
        assert_eq!(
            interpolate_indicator_position(&points, 1000),
            Some(Point::new(10, 20))
        );
        assert_eq!(
            interpolate_indicator_position(&points, 2000),
            Some(Point::new(20, 0))
        );
    }

    #[test]
    fn test_indicator_between_samples() {
        let points = [Point::new(0, 0), Point::new(10, 20)];
        assert_eq!(
            interpolate_indicator_position(&points, 500),
            Some(Point::new(5, 10))
        );
    }

    #[test]
    fn test_indicator_extrapolates_through_bounce() {
        let points = [Point::new(0, 0), Point::new(30, 30), Point::new(60, 0)];
        // A third of a step before the first sample
        assert_eq!(
            interpolate_indicator_position(&points, -333),
            Some(Point::new(-9, -9))
        );
        // A third of a step past the last sample
        assert_eq!(
            interpolate_indicator_position(&points, 2333),
            Some(Point::new(69, -9))
        );
    }

    #[test]
    fn test_indicator_needs_two_points() {
        assert_eq!(interpolate_indicator_position(&[Point::new(1, 1)], 0), None);
    }

    proptest! {
        #[test]
        fn test_increasing_samples_never_descend(
            start in -1_000_000i64..1_000_000,
            steps in prop::collection::vec(1i64..100_000, 1..20),
            w in 20i32..200,
            h in 20i32..200
        ) {
            let mut samples = vec![start];
            for s in steps {
                let next = *samples.last().unwrap() + s;
                samples.push(next);
            }
            let points = points_for(&samples, Size::new(w, h));
            for pair in points.windows(2) {
                prop_assert!(pair[1].y <= pair[0].y);
                prop_assert!(pair[1].x >= pair[0].x);
            }
        }

        #[test]
        fn test_points_stay_inside_layer(
            samples in prop::collection::vec(any::<i64>(), 2..=20),
            w in 10i32..200,
            h in 10i32..200
        ) {
            let points = points_for(&samples, Size::new(w, h));
            for p in points.iter() {
                prop_assert!(p.x >= GRAPH_MARGIN && p.x <= w - GRAPH_MARGIN);
                prop_assert!(p.y >= GRAPH_MARGIN && p.y <= h - GRAPH_MARGIN);
            }
        }
    }
}
