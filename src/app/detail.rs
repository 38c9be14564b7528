//! Metric detail screen
//!
//! Shows one metric of the selected run per page: name, latest value and a
//! history graph. Up/Down page between metrics while browsing and move the
//! scrub cursor while scrubbing; Select toggles scrub mode.
//!
//! Two animation families run here independently. Paging owns the vertical
//! offset of the name and graph layers plus the value text during a slide;
//! scrubbing owns the cursor and, while active, the value text.

use std::time::Duration;

use super::layout::{DetailLayout, STATUS_BAR_HEIGHT};
use super::Button;
use crate::animation::{Animator, Curve, PagingAnimation, ScrollDirection, Timeline};
use crate::fixed_point::{format_fixed_point, parse_fixed_point};
use crate::history::value_at_fixed_index;
use crate::render::{draw_skeleton, render_graph, Canvas, Color, Font, GraphStyle, Point, TextAlign};
use crate::scrub::{ScrubController, ScrubDirection, ScrubEvent, ScrubMode};
use crate::timer::{OneShot, Timings};
use crate::types::{truncate_text, Metric, MAX_NAME_LENGTH};

/// Value text shown when no metrics arrived in time
pub const ERROR_VALUE_TEXT: &str = "Error";

/// Name text shown when no metrics arrived in time
pub const ERROR_NAME_TEXT: &str = "NO METRICS";

/// Appended to the metric name while the scrub cursor sits in the past
pub const PAST_MARKER: &str = " (-)";

fn display_name(metric: &Metric) -> String {
    metric.name().to_ascii_uppercase()
}

/// Value text for a cursor position, with the metric's own precision
fn scrub_value_text(metric: &Metric, position: i32) -> Option<String> {
    let value = value_at_fixed_index(metric.history(), position)?;
    let decimals = parse_fixed_point(metric.display_value()).decimals;
    Some(format_fixed_point(value, decimals))
}

#[derive(Debug)]
pub struct DetailScreen {
    layout: DetailLayout,
    timings: Timings,
    loading: bool,
    failed: bool,
    loading_timer: OneShot,
    /// Page selected by the user
    page: usize,
    /// Page whose name and graph are on screen; trails `page` until the
    /// slide's midpoint
    display_page: usize,
    paging: Animator<PagingAnimation>,
    layer_offset: i32,
    scrub: ScrubController,
    value_text: String,
    name_text: String,
    pagination_text: String,
}

impl DetailScreen {
    /// Open in loading state, waiting for the selected run's metrics
    pub fn new(layout: DetailLayout, timings: Timings, now: Duration) -> Self {
        let mut loading_timer = OneShot::default();
        loading_timer.arm(now + timings.loading_timeout);
        Self {
            layout,
            timings,
            loading: true,
            failed: false,
            loading_timer,
            page: 0,
            display_page: 0,
            paging: Animator::new("paging"),
            layer_offset: 0,
            scrub: ScrubController::new(timings),
            value_text: String::new(),
            name_text: String::new(),
            pagination_text: String::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the loading timeout fired before any metrics arrived
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn display_page(&self) -> usize {
        self.display_page
    }

    pub fn layer_offset(&self) -> i32 {
        self.layer_offset
    }

    pub fn value_text(&self) -> &str {
        &self.value_text
    }

    pub fn name_text(&self) -> &str {
        &self.name_text
    }

    pub fn pagination_text(&self) -> &str {
        &self.pagination_text
    }

    pub fn scrub(&self) -> &ScrubController {
        &self.scrub
    }

    pub fn has_pending_work(&self) -> bool {
        self.loading_timer.is_armed() || self.paging.is_running() || self.scrub.has_pending_work()
    }

    /// Metrics arrived: drop the skeleton and show the first page
    pub fn finish_loading(&mut self, metrics: &[Metric]) {
        self.loading = false;
        self.failed = false;
        self.loading_timer.cancel();
        self.page = self.page.min(metrics.len().saturating_sub(1));
        self.display_page = self.page;
        self.refresh_text(metrics);
    }

    /// A new metric batch replaced the one on screen: cancel paging and
    /// scrubbing, return to the first page and wait again
    pub fn restart_loading(&mut self, now: Duration) {
        self.close();
        self.loading = true;
        self.failed = false;
        self.loading_timer.arm(now + self.timings.loading_timeout);
        self.page = 0;
        self.display_page = 0;
        self.value_text.clear();
        self.name_text.clear();
        self.pagination_text.clear();
        tracing::debug!("metric batch restarted, detail screen loading");
    }

    /// Cancel every timer and animation before the screen goes away
    pub fn close(&mut self) {
        self.loading_timer.cancel();
        self.paging.unschedule();
        self.scrub.reset();
        self.layer_offset = 0;
    }

    fn refresh_text(&mut self, metrics: &[Metric]) {
        match metrics.get(self.page) {
            Some(metric) => {
                self.value_text = metric.display_value().to_string();
                self.name_text = display_name(metric);
            }
            None => {
                self.value_text.clear();
                self.name_text.clear();
            }
        }
        self.refresh_pagination(metrics.len());
    }

    fn refresh_pagination(&mut self, count: usize) {
        self.pagination_text = if count == 0 {
            String::new()
        } else {
            format!("{}/{}", self.display_page + 1, count)
        };
    }

    fn history_len(&self, metrics: &[Metric]) -> usize {
        metrics.get(self.page).map_or(0, |m| m.history().len())
    }

    fn refresh_scrub_value(&mut self, metrics: &[Metric]) {
        let position = self.scrub.cursor().position;
        if let Some(text) = metrics
            .get(self.page)
            .and_then(|metric| scrub_value_text(metric, position))
        {
            self.value_text = text;
        }
    }

    fn refresh_scrub_name(&mut self, metrics: &[Metric]) {
        let Some(metric) = metrics.get(self.page) else {
            return;
        };
        let mut name = display_name(metric);
        let latest = metric.history().len().saturating_sub(1);
        if self.scrub.is_active() && usize::from(self.scrub.cursor().index) < latest {
            name.push_str(PAST_MARKER);
        }
        self.name_text = truncate_text(&name, MAX_NAME_LENGTH);
    }

    /// Swap name, pagination and graph over to the selected page
    fn swap_content(&mut self, metrics: &[Metric]) {
        self.display_page = self.page;
        if let Some(metric) = metrics.get(self.page) {
            self.name_text = display_name(metric);
        }
        self.refresh_pagination(metrics.len());
    }

    pub fn handle_press(&mut self, button: Button, metrics: &[Metric], now: Duration) {
        if self.loading || metrics.is_empty() {
            return;
        }
        let count = self.history_len(metrics);
        match button {
            Button::Up | Button::Down => {
                let (scroll, scrub) = match button {
                    Button::Up => (ScrollDirection::Up, ScrubDirection::Newer),
                    _ => (ScrollDirection::Down, ScrubDirection::Older),
                };
                match self.scrub.mode() {
                    ScrubMode::Browsing => self.change_page(scroll, metrics, now),
                    ScrubMode::Scrubbing => {
                        self.scrub.press(scrub, count, now);
                    }
                    ScrubMode::Exiting => {}
                }
            }
            Button::Select => match self.scrub.mode() {
                ScrubMode::Scrubbing => self.scrub.exit(count, now),
                ScrubMode::Browsing | ScrubMode::Exiting => {
                    if self.scrub.enter(count, now) {
                        self.refresh_scrub_value(metrics);
                        self.refresh_scrub_name(metrics);
                    }
                }
            },
            Button::Back => {}
        }
    }

    pub fn handle_release(&mut self, button: Button) {
        match button {
            Button::Up => self.scrub.release(ScrubDirection::Newer),
            Button::Down => self.scrub.release(ScrubDirection::Older),
            Button::Select | Button::Back => {}
        }
    }

    fn change_page(&mut self, direction: ScrollDirection, metrics: &[Metric], now: Duration) {
        // Superseded paging animations never finish; land them instantly
        if self.paging.unschedule().is_some() {
            self.swap_content(metrics);
            self.layer_offset = 0;
            if let Some(metric) = metrics.get(self.page) {
                self.value_text = metric.display_value().to_string();
            }
        }

        let next = self.page as i64 + i64::from(direction.page_delta());
        let target = usize::try_from(next)
            .ok()
            .and_then(|n| Some((n, metrics.get(self.page)?, metrics.get(n)?)));
        let animation = match target {
            Some((next, old, new)) => {
                let old_value = old.display_value();
                let new_value = new.display_value();
                self.page = next;
                tracing::debug!(page = next, "metric page changed");
                PagingAnimation::slide(direction, old_value, new_value)
            }
            None => PagingAnimation::bounce(direction),
        };
        let timeline = Timeline::new(now, animation.duration(&self.timings), Curve::Linear);
        self.paging.schedule(animation, timeline);
    }

    pub fn tick(&mut self, metrics: &[Metric], now: Duration) {
        if self.loading_timer.fire(now).is_some() && self.loading {
            tracing::warn!("metrics did not arrive in time");
            self.loading = false;
            self.failed = true;
            self.value_text = ERROR_VALUE_TEXT.to_string();
            self.name_text = ERROR_NAME_TEXT.to_string();
        }

        if let Some(frame) = self.paging.advance(now) {
            self.layer_offset = frame.output.layer_offset;
            if frame.output.past_midpoint && self.display_page != self.page {
                self.swap_content(metrics);
            }
            if let Some(value) = frame.output.value {
                self.value_text = value.format();
            }
            if frame.completed.is_some() {
                self.layer_offset = 0;
                if self.display_page != self.page {
                    self.swap_content(metrics);
                }
                if let Some(metric) = metrics.get(self.page) {
                    self.value_text = metric.display_value().to_string();
                }
            }
        }

        let count = self.history_len(metrics);
        match self.scrub.advance(count, now) {
            Some(ScrubEvent::Moved { show_value: true }) => self.refresh_scrub_value(metrics),
            Some(ScrubEvent::Moved { show_value: false }) | None => {}
            Some(ScrubEvent::Settled { relabel }) => {
                self.refresh_scrub_value(metrics);
                if relabel {
                    self.refresh_scrub_name(metrics);
                }
            }
            Some(ScrubEvent::Exited) => {
                if let Some(metric) = metrics.get(self.page) {
                    self.value_text = metric.display_value().to_string();
                    self.name_text = display_name(metric);
                }
            }
        }
    }

    pub fn render(&self, canvas: &mut impl Canvas, metrics: &[Metric]) {
        let layout = &self.layout;
        canvas.draw_line(
            Point::new(0, STATUS_BAR_HEIGHT - 1),
            Point::new(layout.screen.w, STATUS_BAR_HEIGHT - 1),
            1,
            Color::LightGray,
        );

        if self.loading {
            draw_skeleton(canvas, layout.name, layout.value, layout.graph);
            return;
        }

        if let Some(bounds) = layout.pagination {
            if !self.pagination_text.is_empty() {
                canvas.draw_text(&self.pagination_text, Font::Gothic14, bounds, TextAlign::Right, Color::Black);
            }
        }
        if !self.name_text.is_empty() {
            canvas.draw_text(
                &self.name_text,
                Font::Gothic18Bold,
                layout.name.shifted_y(self.layer_offset),
                layout.align,
                Color::Black,
            );
        }
        if !self.value_text.is_empty() {
            canvas.draw_text(&self.value_text, Font::Numbers26, layout.value, layout.align, Color::Black);
        }

        if self.failed {
            return;
        }
        if let Some(metric) = metrics.get(self.display_page) {
            let style = if self.scrub.is_active() {
                GraphStyle::Scrubbing {
                    position: self.scrub.cursor().position,
                }
            } else {
                GraphStyle::Browsing
            };
            render_graph(
                canvas,
                layout.graph.shifted_y(self.layer_offset),
                metric.history(),
                style,
            );
        }
    }
}
