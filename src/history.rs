//! Metric history buffer and value-range calculation
//!
//! A metric carries up to [`MAX_HISTORY_POINTS`] fixed-point samples, oldest
//! first. Samples arrive once per batch, so a full buffer simply refuses
//! further samples instead of evicting old ones.

use crate::scrub::SCRUB_FIXED_SCALE;
use crate::types::BoundedVec;

/// Maximum number of historical samples kept per metric
pub const MAX_HISTORY_POINTS: usize = 20;

/// Fixed-point samples of one metric, oldest first
pub type HistoryBuffer = BoundedVec<i64, MAX_HISTORY_POINTS>;

/// Extent of a sample set, used to scale the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub min: i64,
    pub max: i64,
    /// `max - min`, floored at 1 so it is always a safe divisor
    pub range: i64,
}

/// Compute min, max and range over all samples.
///
/// Returns `None` for an empty slice. Recomputed on every paint; with at
/// most twenty samples that is cheaper than keeping it in sync.
pub fn calculate_value_range(samples: &[i64]) -> Option<ValueRange> {
    let (&first, rest) = samples.split_first()?;
    let (min, max) = rest
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    Some(ValueRange {
        min,
        max,
        range: max.saturating_sub(min).max(1),
    })
}

/// Sample value at a fractional index.
///
/// `index_fixed` is a sample index scaled by [`SCRUB_FIXED_SCALE`]; it is
/// clamped to the valid index span, then the value is linearly blended
/// between the two neighbouring samples.
pub fn value_at_fixed_index(samples: &[i64], index_fixed: i32) -> Option<i64> {
    let last = *samples.last()?;
    let scale = SCRUB_FIXED_SCALE;
    let max_fixed = (samples.len() as i32 - 1) * scale;
    let index_fixed = index_fixed.clamp(0, max_fixed);

    let idx = (index_fixed / scale) as usize;
    let frac = i64::from(index_fixed % scale);
    if idx + 1 >= samples.len() {
        return Some(last);
    }

    let (v1, v2) = (i128::from(samples[idx]), i128::from(samples[idx + 1]));
    let blended = v1 + (v2 - v1) * i128::from(frac) / i128::from(scale);
    Some(blended as i64)
}
