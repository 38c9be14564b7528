//! Watch application controller
//!
//! [`WatchApp`] owns every piece of UI state: the data store, the run menu,
//! the optional detail screen and, through them, all timers and animations.
//! A host drives it with input, inbound messages and clock ticks, drains its
//! outbound messages and asks it to paint.
//!
//! Nothing here reads a clock. Every call that can start or advance time-based
//! work takes `now`, a monotonic timestamp supplied by the host.

pub mod detail;
pub mod layout;
pub mod menu;

use std::time::Duration;

pub use detail::DetailScreen;
pub use layout::{DetailLayout, DisplayShape};
pub use menu::RunMenu;

use crate::protocol::{DataStore, InboxEvent, Message};
use crate::render::{Canvas, Color, Rect, Size};
use crate::timer::Timings;

/// Physical watch buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Select,
    Back,
}

/// Button edge delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Button),
    Release(Button),
}

/// Device profile the controller runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    pub screen: Size,
    pub shape: DisplayShape,
    pub timings: Timings,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            screen: Size::new(
                crate::config::DEFAULT_DISPLAY_WIDTH,
                crate::config::DEFAULT_DISPLAY_HEIGHT,
            ),
            shape: DisplayShape::Rect,
            timings: Timings::default(),
        }
    }
}

/// Which screen is in front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Detail,
}

pub struct WatchApp {
    settings: WatchSettings,
    store: DataStore,
    menu: RunMenu,
    detail: Option<DetailScreen>,
    outbox: Vec<Message>,
}

impl WatchApp {
    /// Start on the run menu, waiting for the run list
    pub fn new(settings: WatchSettings, now: Duration) -> Self {
        tracing::info!(
            width = settings.screen.w,
            height = settings.screen.h,
            shape = ?settings.shape,
            "watch app started"
        );
        Self {
            menu: RunMenu::new(&settings.timings, now),
            settings,
            store: DataStore::new(),
            detail: None,
            outbox: Vec::new(),
        }
    }

    pub fn settings(&self) -> &WatchSettings {
        &self.settings
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn menu(&self) -> &RunMenu {
        &self.menu
    }

    pub fn detail(&self) -> Option<&DetailScreen> {
        self.detail.as_ref()
    }

    pub fn screen(&self) -> Screen {
        if self.detail.is_some() {
            Screen::Detail
        } else {
            Screen::Menu
        }
    }

    /// Whether the host should keep ticking at frame rate
    pub fn has_pending_work(&self) -> bool {
        self.menu.has_pending_work() || self.detail.as_ref().is_some_and(DetailScreen::has_pending_work)
    }

    /// Outbound messages queued since the last call
    pub fn take_outbox(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.outbox)
    }

    pub fn handle_input(&mut self, event: InputEvent, now: Duration) {
        let Some(detail) = self.detail.as_mut() else {
            if let InputEvent::Press(button) = event {
                self.handle_menu_press(button, now);
            }
            return;
        };
        match event {
            InputEvent::Press(Button::Back) => {
                detail.close();
                self.detail = None;
                tracing::info!("detail screen closed");
            }
            InputEvent::Press(button) => detail.handle_press(button, self.store.metrics(), now),
            InputEvent::Release(button) => detail.handle_release(button),
        }
    }

    fn handle_menu_press(&mut self, button: Button, now: Duration) {
        match button {
            Button::Up => self.menu.move_up(),
            Button::Down => self.menu.move_down(),
            Button::Select => {
                let Some(index) = self.menu.selected_run() else {
                    return;
                };
                let Ok(wire_index) = u8::try_from(index) else {
                    tracing::warn!(index, "run index does not fit the wire format");
                    return;
                };
                self.store.select_run(index);
                self.outbox.push(Message::fetch_run(wire_index));
                let layout = DetailLayout::new(self.settings.screen, self.settings.shape);
                self.detail = Some(DetailScreen::new(layout, self.settings.timings, now));
                tracing::info!(run = index, "detail screen opened");
            }
            Button::Back => {}
        }
    }

    /// Apply one decoded inbound message
    pub fn handle_message(&mut self, message: &Message, now: Duration) {
        for event in self.store.apply(message) {
            match event {
                InboxEvent::RunsReady { .. } => self.menu.finish_loading(self.store.runs()),
                InboxEvent::MetricsReset => {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.restart_loading(now);
                    }
                }
                InboxEvent::MetricsReady { .. } => match self.detail.as_mut() {
                    Some(detail) => detail.finish_loading(self.store.metrics()),
                    None => tracing::debug!("metrics arrived with no detail screen open"),
                },
            }
        }
    }

    /// Fire due timers and advance running animations
    pub fn tick(&mut self, now: Duration) {
        self.menu.tick(now);
        if let Some(detail) = self.detail.as_mut() {
            detail.tick(self.store.metrics(), now);
        }
    }

    pub fn render(&self, canvas: &mut impl Canvas) {
        let screen = self.settings.screen;
        canvas.fill_rect(Rect::new(0, 0, screen.w, screen.h), Color::White);
        match &self.detail {
            Some(detail) => detail.render(canvas, self.store.metrics()),
            None => self.menu.render(canvas, self.store.runs(), screen),
        }
    }
}
