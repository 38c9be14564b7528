//! Core data types for wandb-watch
//!
//! This module contains the data model the watch keeps in memory: runs,
//! their metrics, and the bounded container every collection lives in.
//!
//! # Main Types
//!
//! - [`BoundedVec`] - Fixed-capacity container that drops items past capacity
//! - [`Metric`] - One tracked metric: name, display text and sample history
//! - [`Run`] - One experiment run with up to [`MAX_METRICS_PER_RUN`] metrics
//!
//! # Memory Management
//!
//! The watch has a few kilobytes of heap, so every collection has a hard
//! capacity and every string a hard byte length. Data arriving past those
//! limits is silently dropped; nothing ever grows dynamically. Runs and
//! metrics are replaced wholesale when a new batch arrives.

use std::ops::Deref;

use crate::history::HistoryBuffer;

/// Maximum number of runs kept from one run list batch
pub const MAX_RUNS: usize = 10;

/// Maximum number of metrics kept per run
pub const MAX_METRICS_PER_RUN: usize = 18;

/// Maximum byte length of run, project and metric names
pub const MAX_NAME_LENGTH: usize = 31;

/// Maximum byte length of a pre-formatted metric value
pub const MAX_VALUE_LENGTH: usize = 15;

/// Maximum byte length of a run state ("running", "finished", ...)
pub const MAX_STATE_LENGTH: usize = 15;

/// Truncate `text` to at most `max_bytes` bytes without splitting a character.
pub fn truncate_text(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

/// Fixed-capacity, insertion-ordered container.
///
/// Storage is reserved once for `N` items and never reallocated. Pushing into
/// a full container is a no-op that reports `false`; collecting from an
/// iterator keeps the first `N` items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedVec<T, const N: usize> {
    items: Vec<T>,
}

impl<T, const N: usize> Default for BoundedVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> BoundedVec<T, N> {
    /// Capacity of this container type.
    pub const CAPACITY: usize = N;

    /// Create an empty container with all storage reserved up front.
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(N),
        }
    }

    /// Append an item. Returns `false` (dropping the item) when full.
    #[inline]
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Whether no more items will be accepted.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= N
    }

    /// Remove all items, keeping the reserved storage.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Mutable access to an item.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// The items as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T, const N: usize> Deref for BoundedVec<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T, const N: usize> FromIterator<T> for BoundedVec<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut bounded = Self::new();
        bounded.items.extend(iter.into_iter().take(N));
        bounded
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a BoundedVec<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A single tracked metric of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metric {
    name: String,
    display_value: String,
    history: HistoryBuffer,
}

impl Metric {
    /// Create a metric, truncating name and value to their byte limits.
    ///
    /// The last history sample is expected to equal the fixed-point parse of
    /// `display_value`; the sender guarantees this and it is not checked here.
    pub fn new(name: &str, display_value: &str, history: HistoryBuffer) -> Self {
        Self {
            name: truncate_text(name, MAX_NAME_LENGTH),
            display_value: truncate_text(display_value, MAX_VALUE_LENGTH),
            history,
        }
    }

    /// Metric name as received
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pre-formatted decimal text of the latest value
    pub fn display_value(&self) -> &str {
        &self.display_value
    }

    /// Historical samples, oldest first
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }
}

/// Metrics of one run
pub type MetricList = BoundedVec<Metric, MAX_METRICS_PER_RUN>;

/// One experiment run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    run_name: String,
    project_name: String,
    state: String,
    /// Metrics of this run; empty until requested from the companion
    pub metrics: MetricList,
}

impl Run {
    /// Create a run with no metrics, truncating strings to their limits.
    pub fn new(run_name: &str, project_name: &str, state: &str) -> Self {
        Self {
            run_name: truncate_text(run_name, MAX_NAME_LENGTH),
            project_name: truncate_text(project_name, MAX_NAME_LENGTH),
            state: truncate_text(state, MAX_STATE_LENGTH),
            metrics: MetricList::new(),
        }
    }

    /// Display name of the run
    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Project the run belongs to
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Lifecycle state, e.g. "running", "finished", "crashed"
    pub fn state(&self) -> &str {
        &self.state
    }
}

/// Runs of one run-list batch
pub type RunList = BoundedVec<Run, MAX_RUNS>;
