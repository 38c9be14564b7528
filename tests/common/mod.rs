//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod recording;

use std::time::Duration;

use wandb_watch::app::{Button, InputEvent, WatchApp, WatchSettings};
use wandb_watch::protocol::Message;

pub use builders::{metric_messages, run_messages, MetricBuilder, RunBuilder};
pub use recording::{DrawCall, RecordingCanvas};

/// Milliseconds on the synthetic clock
pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Press and release a button at `now`
pub fn tap(app: &mut WatchApp, button: Button, now: Duration) {
    app.handle_input(InputEvent::Press(button), now);
    app.handle_input(InputEvent::Release(button), now);
}

/// Deliver every message at `now`
pub fn deliver(app: &mut WatchApp, messages: &[Message], now: Duration) {
    for message in messages {
        app.handle_message(message, now);
    }
}

/// Tick the app every frame from `from` up to and including `to`
pub fn run_frames(app: &mut WatchApp, from: Duration, to: Duration) {
    let frame = ms(16);
    let mut now = from;
    while now < to {
        app.tick(now);
        now += frame;
    }
    app.tick(to);
}

/// An app on the detail screen of the first run, with `metrics` loaded
pub fn app_on_detail(metrics: Vec<MetricBuilder>) -> WatchApp {
    let mut app = WatchApp::new(WatchSettings::default(), Duration::ZERO);
    deliver(&mut app, &run_messages(&[RunBuilder::new("swift-river-7")]), ms(10));
    tap(&mut app, Button::Select, ms(20));
    deliver(&mut app, &metric_messages(&metrics), ms(30));
    app.take_outbox();
    app
}
