//! Simulated phone companion
//!
//! On a real watch the companion app fetches runs from the W&B API and pushes
//! them over the phone link. Here it serves a [`Fixture`] from its own
//! thread, speaking the same byte-level dictionary protocol in both
//! directions.
//!
//! # Architecture
//!
//! - [`Companion`] - owns the data and the thread side of the link
//! - [`CompanionLink`] - watch-side handle: receive encoded batches, send
//!   encoded requests
//!
//! On start the companion pushes the run list. Each `FETCH_RUN_INDEX` request
//! is answered with that run's metrics. Nothing is shared between the two
//! sides except the channels.
//!
//! # Example
//!
//! ```ignore
//! use wandb_watch::companion::{Companion, Fixture};
//!
//! let (companion, link) = Companion::new(Fixture::demo(), Duration::ZERO);
//! std::thread::spawn(move || companion.run());
//!
//! for bytes in link.drain() {
//!     let message = wandb_watch::protocol::decode(&bytes)?;
//!     app.handle_message(&message, now);
//! }
//! ```

pub mod fixture;

pub use fixture::{display_value, latest_history, sort_metrics, to_fixed_point, Fixture, FixtureMetric, FixtureRun};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use crate::error::{Result, WatchError};
use crate::protocol::{decode, encode, pack_history, Message, MessageKey, Value};
use crate::types::{MAX_METRICS_PER_RUN, MAX_RUNS};

/// How often the companion thread checks its running flag while idle
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Request sent from the watch to the companion
#[derive(Debug, Clone)]
pub enum CompanionCommand {
    /// An encoded outbound message
    Deliver(Vec<u8>),
    /// Stop the companion thread
    Shutdown,
}

/// Watch-side end of the companion link
pub struct CompanionLink {
    /// Encoded inbound batches
    pub receiver: Receiver<Vec<u8>>,
    /// Requests to the companion
    pub command_sender: Sender<CompanionCommand>,
}

impl CompanionLink {
    /// Receive all pending encoded messages
    pub fn drain(&self) -> Vec<Vec<u8>> {
        let mut messages = Vec::new();
        while let Ok(bytes) = self.receiver.try_recv() {
            messages.push(bytes);
        }
        messages
    }

    /// Encode and send an outbound message
    pub fn send(&self, message: &Message) -> Result<()> {
        let bytes = encode(message)?;
        self.command_sender
            .send(CompanionCommand::Deliver(bytes))
            .map_err(|e| WatchError::Channel(format!("companion link closed: {}", e)))
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        let _ = self.command_sender.send(CompanionCommand::Shutdown);
    }
}

/// One message per run; the first also carries the run count.
///
/// At most [`MAX_RUNS`] runs are announced, since the watch only completes a
/// batch once it holds as many runs as announced.
pub fn run_list_messages(fixture: &Fixture) -> Vec<Message> {
    let runs = &fixture.runs[..fixture.runs.len().min(MAX_RUNS)];
    if runs.is_empty() {
        return vec![Message::new().with(MessageKey::RunsCount, Value::U8(0))];
    }
    runs.iter()
        .enumerate()
        .map(|(i, run)| {
            let mut message = Message::new();
            if i == 0 {
                message.insert(MessageKey::RunsCount, Value::U8(runs.len() as u8));
            }
            message
                .with(MessageKey::RunName, Value::CString(run.name.clone()))
                .with(MessageKey::RunOwner, Value::CString(run.project.clone()))
                .with(MessageKey::RunState, Value::CString(run.state.clone()))
        })
        .collect()
}

/// One message per metric in priority order; the first also carries the
/// metric count.
pub fn metric_messages(run: &FixtureRun) -> Vec<Message> {
    let mut metrics = run.metrics.clone();
    sort_metrics(&mut metrics);
    metrics.truncate(MAX_METRICS_PER_RUN);
    if metrics.is_empty() {
        return vec![Message::new().with(MessageKey::MetricsCount, Value::U8(0))];
    }
    let count = metrics.len() as u8;
    metrics
        .iter()
        .enumerate()
        .map(|(i, metric)| {
            let mut message = Message::new();
            if i == 0 {
                message.insert(MessageKey::MetricsCount, Value::U8(count));
            }
            message
                .with(MessageKey::MetricName, Value::CString(metric.name.clone()))
                .with(MessageKey::MetricValue, Value::CString(display_value(metric.value)))
                .with(
                    MessageKey::MetricHistory,
                    Value::Bytes(pack_history(&latest_history(&metric.history))),
                )
        })
        .collect()
}

/// The companion that runs in a separate thread
pub struct Companion {
    fixture: Fixture,
    latency: Duration,
    command_receiver: Receiver<CompanionCommand>,
    message_sender: Sender<Vec<u8>>,
    running: Arc<AtomicBool>,
}

impl Companion {
    /// Create a companion with its link
    pub fn new(fixture: Fixture, latency: Duration) -> (Self, CompanionLink) {
        let (cmd_tx, cmd_rx) = bounded(64);
        // Enough for a full run list plus a full metric batch in flight
        let (msg_tx, msg_rx) = bounded(256);

        let companion = Self {
            fixture,
            latency,
            command_receiver: cmd_rx,
            message_sender: msg_tx,
            running: Arc::new(AtomicBool::new(true)),
        };
        let link = CompanionLink {
            receiver: msg_rx,
            command_sender: cmd_tx,
        };
        (companion, link)
    }

    /// Get a handle to stop the companion
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Run the companion loop until shutdown or until the watch goes away
    pub fn run(self) {
        tracing::info!(runs = self.fixture.runs.len(), "companion started");

        if let Err(e) = self.send_batch(run_list_messages(&self.fixture)) {
            tracing::warn!("companion stopped early: {}", e);
            return;
        }

        while self.running.load(Ordering::SeqCst) {
            match self.command_receiver.recv_timeout(POLL_INTERVAL) {
                Ok(CompanionCommand::Deliver(bytes)) => {
                    if let Err(e) = self.handle_request(&bytes) {
                        tracing::warn!("companion request failed: {}", e);
                        if matches!(e, WatchError::Channel(_)) {
                            break;
                        }
                    }
                }
                Ok(CompanionCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }

        tracing::info!("companion stopped");
    }

    fn handle_request(&self, bytes: &[u8]) -> Result<()> {
        let request = decode(bytes)?;
        let Some(index) = request.u8(MessageKey::FetchRunIndex) else {
            tracing::debug!(tuples = request.len(), "ignoring request without run index");
            return Ok(());
        };
        let messages = match self.fixture.runs.get(usize::from(index)) {
            Some(run) => {
                tracing::info!(run = %run.name, metrics = run.metrics.len(), "serving metrics");
                metric_messages(run)
            }
            None => {
                tracing::warn!(index, "request for unknown run");
                vec![Message::new().with(MessageKey::MetricsCount, Value::U8(0))]
            }
        };
        self.send_batch(messages)
    }

    fn send_batch(&self, messages: Vec<Message>) -> Result<()> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        for message in &messages {
            let bytes = encode(message)?;
            self.message_sender
                .send(bytes)
                .map_err(|_| WatchError::Channel("watch side of the link closed".to_string()))?;
        }
        tracing::debug!(count = messages.len(), "batch sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Fixture {
        Fixture {
            runs: vec![FixtureRun {
                name: "swift-river-7".to_string(),
                project: "vision".to_string(),
                state: "running".to_string(),
                metrics: vec![
                    FixtureMetric {
                        name: "lr".to_string(),
                        value: 0.001,
                        history: vec![0.001],
                    },
                    FixtureMetric {
                        name: "loss".to_string(),
                        value: 0.0234,
                        history: vec![0.85, 0.0234],
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_run_list_counts_only_first() {
        let mut fixture = fixture();
        fixture.runs.push(fixture.runs[0].clone());
        let messages = run_list_messages(&fixture);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].u8(MessageKey::RunsCount), Some(2));
        assert_eq!(messages[1].u8(MessageKey::RunsCount), None);
        assert_eq!(messages[1].str(MessageKey::RunOwner), Some("vision"));
    }

    #[test]
    fn test_run_list_capped() {
        let run = fixture().runs[0].clone();
        let fixture = Fixture {
            runs: vec![run; MAX_RUNS + 3],
        };
        let messages = run_list_messages(&fixture);
        assert_eq!(messages.len(), MAX_RUNS);
        assert_eq!(messages[0].u8(MessageKey::RunsCount), Some(MAX_RUNS as u8));
    }

    #[test]
    fn test_empty_lists_send_zero_count() {
        let messages = run_list_messages(&Fixture::default());
        assert_eq!(messages, vec![Message::new().with(MessageKey::RunsCount, Value::U8(0))]);

        let mut run = fixture().runs[0].clone();
        run.metrics.clear();
        assert_eq!(metric_messages(&run)[0].u8(MessageKey::MetricsCount), Some(0));
    }

    #[test]
    fn test_metrics_sorted_and_packed() {
        let messages = metric_messages(&fixture().runs[0]);
        assert_eq!(messages[0].str(MessageKey::MetricName), Some("loss"));
        assert_eq!(messages[0].u8(MessageKey::MetricsCount), Some(2));
        assert_eq!(messages[0].str(MessageKey::MetricValue), Some("0.0234"));
        assert_eq!(
            messages[0].bytes(MessageKey::MetricHistory),
            Some(pack_history(&[8500, 234]).as_slice())
        );
        assert_eq!(messages[1].str(MessageKey::MetricName), Some("lr"));
    }

    #[test]
    fn test_thread_serves_runs_and_metrics() {
        let (companion, link) = Companion::new(fixture(), Duration::ZERO);
        let handle = std::thread::spawn(move || companion.run());

        let first = link.receiver.recv_timeout(Duration::from_secs(5)).unwrap();
        let runs = decode(&first).unwrap();
        assert_eq!(runs.str(MessageKey::RunName), Some("swift-river-7"));

        link.send(&Message::fetch_run(0)).unwrap();
        let metric = decode(&link.receiver.recv_timeout(Duration::from_secs(5)).unwrap()).unwrap();
        assert_eq!(metric.str(MessageKey::MetricName), Some("loss"));

        link.shutdown();
        handle.join().unwrap();
    }

    #[test]
    fn test_unknown_run_answers_zero_metrics() {
        let (companion, link) = Companion::new(fixture(), Duration::ZERO);
        let handle = std::thread::spawn(move || companion.run());
        link.receiver.recv_timeout(Duration::from_secs(5)).unwrap();

        link.send(&Message::fetch_run(9)).unwrap();
        let reply = decode(&link.receiver.recv_timeout(Duration::from_secs(5)).unwrap()).unwrap();
        assert_eq!(reply.u8(MessageKey::MetricsCount), Some(0));

        drop(link);
        handle.join().unwrap();
    }
}
