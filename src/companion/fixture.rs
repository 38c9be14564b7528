//! Run data the companion serves
//!
//! Fixtures are JSON files shaped like a trimmed-down W&B API response:
//!
//! ```json
//! {
//!   "runs": [
//!     {
//!       "name": "swift-river-7",
//!       "project": "vision",
//!       "state": "running",
//!       "metrics": [
//!         { "name": "loss", "value": 0.0234, "history": [0.85, 0.2, 0.0234] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Values are floats here and become fixed-point only when batched for the
//! watch.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ResultExt};
use crate::fixed_point::{format_fixed_point, FIXED_POINT_SCALE, MAX_DECIMALS};
use crate::history::MAX_HISTORY_POINTS;
use crate::types::{truncate_text, MAX_VALUE_LENGTH};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub runs: Vec<FixtureRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRun {
    pub name: String,
    #[serde(default)]
    pub project: String,
    pub state: String,
    #[serde(default)]
    pub metrics: Vec<FixtureMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureMetric {
    pub name: String,
    /// Latest value
    pub value: f64,
    /// Logged values, oldest first
    #[serde(default)]
    pub history: Vec<f64>,
}

impl Fixture {
    /// Load a fixture from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {:?}", path))?;
        let fixture: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse fixture {:?}", path))?;
        tracing::info!(runs = fixture.runs.len(), "fixture loaded from {:?}", path);
        Ok(fixture)
    }

    /// Built-in runs used when no fixture is configured
    pub fn demo() -> Self {
        fn decay(start: f64, end: f64, points: usize) -> Vec<f64> {
            (0..points)
                .map(|i| {
                    let t = i as f64 / (points - 1) as f64;
                    end + (start - end) * (1.0 - t).powi(3)
                })
                .collect()
        }
        fn metric(name: &str, history: Vec<f64>) -> FixtureMetric {
            FixtureMetric {
                name: name.to_string(),
                value: history.last().copied().unwrap_or_default(),
                history,
            }
        }

        Self {
            runs: vec![
                FixtureRun {
                    name: "swift-river-7".to_string(),
                    project: "vision".to_string(),
                    state: "running".to_string(),
                    metrics: vec![
                        metric("learning_rate", decay(0.001, 0.0001, 24)),
                        metric("val_accuracy", decay(0.12, 0.91, 24)),
                        metric("train_loss", decay(2.3, 0.0234, 24)),
                        metric("epoch", (1..=12).map(f64::from).collect()),
                    ],
                },
                FixtureRun {
                    name: "calm-sea-3".to_string(),
                    project: "nlp".to_string(),
                    state: "finished".to_string(),
                    metrics: vec![
                        metric("eval_loss", decay(4.1, 1.87, 20)),
                        metric("perplexity", decay(60.3, 6.49, 20)),
                    ],
                },
                FixtureRun {
                    name: "bold-dawn-12".to_string(),
                    project: "vision".to_string(),
                    state: "running".to_string(),
                    metrics: vec![metric("loss", vec![0.85, 0.0234])],
                },
                FixtureRun {
                    name: "quiet-moon-1".to_string(),
                    project: "rl".to_string(),
                    state: "crashed".to_string(),
                    metrics: Vec::new(),
                },
            ],
        }
    }
}

/// Float to fixed-point, rounding half away from zero
pub fn to_fixed_point(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value * FIXED_POINT_SCALE as f64).round() as i64
}

/// Display text for a value: at most four decimals, trailing zeros dropped
pub fn display_value(value: f64) -> String {
    let formatted = format_fixed_point(to_fixed_point(value), MAX_DECIMALS);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    truncate_text(trimmed, MAX_VALUE_LENGTH)
}

/// The most recent samples that fit the watch's history buffer
pub fn latest_history(history: &[f64]) -> Vec<i64> {
    let skip = history.len().saturating_sub(MAX_HISTORY_POINTS);
    history[skip..].iter().map(|&v| to_fixed_point(v)).collect()
}

fn metric_priority(name: &str) -> u8 {
    let name = name.to_ascii_lowercase();
    if name.contains("loss") {
        0
    } else if name.contains("acc") {
        1
    } else {
        2
    }
}

/// Losses first, then accuracies, then everything else; ties keep order
pub fn sort_metrics(metrics: &mut [FixtureMetric]) {
    metrics.sort_by_key(|m| metric_priority(&m.name));
}
