//! # wandb-watch: Experiment Metrics on a Watch
//!
//! The device core of a smartwatch app that shows Weights & Biases run
//! metrics, plus a desktop simulator that hosts it. The core is written for a
//! tiny, slow, single-threaded display: integer math only, fixed-capacity
//! storage, and no clock of its own.
//!
//! ## Architecture
//!
//! - **Data**: fixed-point values ([`fixed_point`]), bounded run/metric
//!   storage ([`types`]) and per-metric history ([`history`])
//! - **Drawing**: history-to-pixel mapping ([`graph`]) and painting through
//!   the [`render::Canvas`] trait
//! - **Motion**: a progress-driven animation engine ([`animation`]) and the
//!   history scrub state machine ([`scrub`]), timed by one-shot [`timer`]s
//! - **Screens**: the [`app::WatchApp`] controller with its run menu and
//!   metric detail screen
//! - **Link**: the dictionary wire format ([`protocol`]) and a simulated
//!   phone [`companion`] on its own thread, connected by crossbeam channels
//!
//! ## Configuration
//!
//! Simulator settings are read from `config.toml` in the platform data
//! directory under `dev.wandb-watch` (see [`config`]).
//!
//! ## Example
//!
//! ```ignore
//! use std::time::Duration;
//! use wandb_watch::{
//!     app::{Button, InputEvent, WatchApp},
//!     companion::{Companion, Fixture},
//!     config::AppConfig,
//!     protocol::decode,
//! };
//!
//! let config = AppConfig::default();
//! let (companion, link) = Companion::new(Fixture::demo(), config.latency());
//! std::thread::spawn(move || companion.run());
//!
//! let mut app = WatchApp::new(config.watch_settings(), Duration::ZERO);
//! for bytes in link.drain() {
//!     app.handle_message(&decode(&bytes)?, now);
//! }
//! app.handle_input(InputEvent::Press(Button::Select), now);
//! app.tick(now);
//! app.render(&mut canvas);
//! ```

pub mod animation;
pub mod app;
pub mod companion;
pub mod config;
pub mod error;
pub mod fixed_point;
pub mod graph;
pub mod history;
pub mod protocol;
pub mod render;
pub mod scrub;
pub mod simulator;
pub mod timer;
pub mod types;

// Re-export commonly used types
pub use app::{Button, InputEvent, WatchApp, WatchSettings};
pub use companion::{Companion, CompanionLink, Fixture};
pub use config::AppConfig;
pub use error::{Result, WatchError};
pub use fixed_point::{format_fixed_point, parse_fixed_point, FixedValue};
pub use protocol::{Message, MessageKey, Value};
pub use timer::Timings;
pub use types::{Metric, Run};
