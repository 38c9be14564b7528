//! Desktop simulator host
//!
//! Runs the watch controller inside an eframe window. The window supplies
//! what the watch OS would: button edges from the keyboard, a monotonic
//! clock, a painter, and the phone link (a [`CompanionLink`] carrying encoded
//! dictionaries).
//!
//! | Key | Button |
//! |---|---|
//! | Arrow Up | Up |
//! | Arrow Down | Down |
//! | Enter / Space | Select |
//! | Escape / Backspace | Back |

pub mod canvas;

pub use canvas::EguiCanvas;

use std::time::{Duration, Instant};

use crate::app::{Button, InputEvent, WatchApp, WatchSettings};
use crate::companion::CompanionLink;
use crate::protocol::decode;

/// How often the window polls the link while nothing is animating
const IDLE_REPAINT: Duration = Duration::from_millis(50);

/// Margin around the watch screen, in window points
const BEZEL: f32 = 16.0;

/// Watch button for a keyboard key
pub fn map_key(key: egui::Key) -> Option<Button> {
    use egui::Key;

    match key {
        Key::ArrowUp => Some(Button::Up),
        Key::ArrowDown => Some(Button::Down),
        Key::Enter | Key::Space => Some(Button::Select),
        Key::Escape | Key::Backspace => Some(Button::Back),
        _ => None,
    }
}

/// Button edges from one frame's input events.
///
/// Key auto-repeat is dropped; the watch repeats held buttons itself.
pub fn input_events(events: &[egui::Event]) -> Vec<InputEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed,
                repeat: false,
                ..
            } => map_key(*key).map(|button| {
                if *pressed {
                    InputEvent::Press(button)
                } else {
                    InputEvent::Release(button)
                }
            }),
            _ => None,
        })
        .collect()
}

/// Inner window size for a screen at `scale`
pub fn window_size(settings: &WatchSettings, scale: u32) -> [f32; 2] {
    let scale = scale as f32;
    [
        settings.screen.w as f32 * scale + BEZEL * 2.0,
        settings.screen.h as f32 * scale + BEZEL * 2.0,
    ]
}

pub struct SimulatorApp {
    watch: WatchApp,
    link: CompanionLink,
    started: Instant,
    scale: f32,
}

impl SimulatorApp {
    pub fn new(settings: WatchSettings, link: CompanionLink, scale: u32) -> Self {
        Self {
            watch: WatchApp::new(settings, Duration::ZERO),
            link,
            started: Instant::now(),
            scale: scale.max(1) as f32,
        }
    }

    /// Feed inbound messages to the watch; undecodable ones are dropped
    fn process_link(&mut self, now: Duration) -> bool {
        let batches = self.link.drain();
        for bytes in &batches {
            match decode(bytes) {
                Ok(message) => self.watch.handle_message(&message, now),
                Err(e) => tracing::warn!("inbox dropped message: {}", e),
            }
        }
        !batches.is_empty()
    }

    fn flush_outbox(&mut self) {
        for message in self.watch.take_outbox() {
            if let Err(e) = self.link.send(&message) {
                tracing::warn!("outbox failed: {}", e);
            }
        }
    }
}

impl eframe::App for SimulatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.started.elapsed();

        for event in ctx.input(|i| input_events(&i.events)) {
            self.watch.handle_input(event, now);
        }
        let had_messages = self.process_link(now);
        self.watch.tick(now);
        self.flush_outbox();

        egui::CentralPanel::default().show(ctx, |ui| {
            let screen = self.watch.settings().screen;
            let size = egui::vec2(screen.w as f32 * self.scale, screen.h as f32 * self.scale);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            let mut canvas = EguiCanvas::new(&painter, response.rect.min, self.scale);
            self.watch.render(&mut canvas);
        });

        if self.watch.has_pending_work() || had_messages {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(IDLE_REPAINT);
        }
    }
}

impl Drop for SimulatorApp {
    fn drop(&mut self) {
        self.link.shutdown();
    }
}
