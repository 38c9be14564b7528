//! Watch-side inbox
//!
//! Applies decoded messages to the run list. Within one message the fields
//! are looked at in a fixed order: runs count, run identity, metrics count,
//! metric identity. A zero count ends processing of that message right away.

use super::{unpack_history, Message, MessageKey};
use crate::history::HistoryBuffer;
use crate::types::{Metric, Run, RunList};

/// Batch progress observed while applying a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboxEvent {
    /// The run list holds every announced run (or none were announced)
    RunsReady { count: usize },
    /// A new metric batch began; the selected run's metrics were cleared
    MetricsReset,
    /// The selected run holds every announced metric, or is full
    MetricsReady { count: usize },
}

/// Run list plus the batch bookkeeping needed to detect completion.
#[derive(Debug, Default)]
pub struct DataStore {
    runs: RunList,
    expected_runs: u8,
    expected_metrics: u8,
    selected_run: usize,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> &RunList {
        &self.runs
    }

    /// Index of the run whose metrics incoming messages belong to
    pub fn selected_run(&self) -> usize {
        self.selected_run
    }

    pub fn select_run(&mut self, index: usize) {
        self.selected_run = index;
    }

    /// Metrics of the selected run; empty when it does not exist
    pub fn metrics(&self) -> &[Metric] {
        self.runs
            .get(self.selected_run)
            .map(|run| run.metrics.as_slice())
            .unwrap_or(&[])
    }

    /// Apply one message, returning the batch events it caused in order.
    pub fn apply(&mut self, message: &Message) -> Vec<InboxEvent> {
        let mut events = Vec::new();

        if let Some(count) = message.u8(MessageKey::RunsCount) {
            self.expected_runs = count;
            self.runs.clear();
            if count == 0 {
                tracing::info!("companion reported no runs");
                events.push(InboxEvent::RunsReady { count: 0 });
                return events;
            }
        }

        if let (Some(name), Some(owner), Some(state)) = (
            message.str(MessageKey::RunName),
            message.str(MessageKey::RunOwner),
            message.str(MessageKey::RunState),
        ) {
            if self.runs.push(Run::new(name, owner, state)) {
                if self.runs.len() >= usize::from(self.expected_runs) {
                    tracing::info!(count = self.runs.len(), "run list complete");
                    events.push(InboxEvent::RunsReady {
                        count: self.runs.len(),
                    });
                }
            } else {
                tracing::warn!(name, "run list full, dropping run");
            }
        }

        if let Some(count) = message.u8(MessageKey::MetricsCount) {
            self.expected_metrics = count;
            if let Some(run) = self.runs.get_mut(self.selected_run) {
                run.metrics.clear();
            }
            events.push(InboxEvent::MetricsReset);
            if count == 0 {
                tracing::info!(run = self.selected_run, "run has no metrics");
                events.push(InboxEvent::MetricsReady { count: 0 });
                return events;
            }
        }

        if let (Some(name), Some(value)) = (
            message.str(MessageKey::MetricName),
            message.str(MessageKey::MetricValue),
        ) {
            let history = message
                .bytes(MessageKey::MetricHistory)
                .map(unpack_history)
                .unwrap_or_else(HistoryBuffer::new);
            let expected = usize::from(self.expected_metrics);
            let Some(run) = self.runs.get_mut(self.selected_run) else {
                tracing::warn!(run = self.selected_run, name, "metric for unknown run dropped");
                return events;
            };
            if !run.metrics.push(Metric::new(name, value, history)) {
                tracing::warn!(name, "metric list full, dropping metric");
            }
            if run.metrics.len() >= expected || run.metrics.is_full() {
                tracing::info!(count = run.metrics.len(), "metrics complete");
                events.push(InboxEvent::MetricsReady {
                    count: run.metrics.len(),
                });
            }
        }

        events
    }
}
