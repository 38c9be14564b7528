//! Test data builders for runs, metrics and their wire messages

use wandb_watch::protocol::{pack_history, Message, MessageKey, Value};

/// Builder for a run as the companion would announce it
#[derive(Debug, Clone)]
pub struct RunBuilder {
    name: String,
    project: String,
    state: String,
}

impl RunBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            project: "vision".to_string(),
            state: "running".to_string(),
        }
    }

    pub fn project(mut self, project: &str) -> Self {
        self.project = project.to_string();
        self
    }

    pub fn state(mut self, state: &str) -> Self {
        self.state = state.to_string();
        self
    }

    fn message(&self) -> Message {
        Message::new()
            .with(MessageKey::RunName, Value::CString(self.name.clone()))
            .with(MessageKey::RunOwner, Value::CString(self.project.clone()))
            .with(MessageKey::RunState, Value::CString(self.state.clone()))
    }
}

/// Builder for a metric with its fixed-point history
#[derive(Debug, Clone)]
pub struct MetricBuilder {
    name: String,
    value: String,
    history: Vec<i64>,
}

impl MetricBuilder {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            history: Vec::new(),
        }
    }

    pub fn history(mut self, history: &[i64]) -> Self {
        self.history = history.to_vec();
        self
    }

    fn message(&self) -> Message {
        Message::new()
            .with(MessageKey::MetricName, Value::CString(self.name.clone()))
            .with(MessageKey::MetricValue, Value::CString(self.value.clone()))
            .with(MessageKey::MetricHistory, Value::Bytes(pack_history(&self.history)))
    }
}

/// Run list batch; the first message carries the count
pub fn run_messages(runs: &[RunBuilder]) -> Vec<Message> {
    if runs.is_empty() {
        return vec![Message::new().with(MessageKey::RunsCount, Value::U8(0))];
    }
    runs.iter()
        .enumerate()
        .map(|(i, run)| {
            let message = run.message();
            if i == 0 {
                message.with(MessageKey::RunsCount, Value::U8(runs.len() as u8))
            } else {
                message
            }
        })
        .collect()
}

/// Metric batch; the first message carries the count
pub fn metric_messages(metrics: &[MetricBuilder]) -> Vec<Message> {
    if metrics.is_empty() {
        return vec![Message::new().with(MessageKey::MetricsCount, Value::U8(0))];
    }
    metrics
        .iter()
        .enumerate()
        .map(|(i, metric)| {
            let message = metric.message();
            if i == 0 {
                message.with(MessageKey::MetricsCount, Value::U8(metrics.len() as u8))
            } else {
                message
            }
        })
        .collect()
}
