//! Run menu screen
//!
//! Runs are grouped into sections by state, in the order each state first
//! appears in the received list. The menu shows a loading message until the
//! run list is complete, or an error message once the loading timeout has
//! passed without it.

use std::time::Duration;

use super::layout::STATUS_BAR_HEIGHT;
use crate::render::{Canvas, Color, Font, Rect, Size, TextAlign};
use crate::timer::{OneShot, Timings};
use crate::types::Run;

pub const LOADING_TEXT: &str = "Talking with Weights & Biases...";
pub const TIMEOUT_TEXT: &str = "Could not load runs. Check your API key.";

const HEADER_HEIGHT: i32 = 18;
const ROW_HEIGHT: i32 = 44;
const LOADING_TEXT_HEIGHT: i32 = 96;
const TEXT_PADDING: i32 = 10;

/// Runs sharing one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSection {
    /// Upper-cased state
    pub title: String,
    /// Indices into the run list, in received order
    pub runs: Vec<usize>,
}

/// Group runs by state, sections in order of first appearance.
pub fn group_by_state(runs: &[Run]) -> Vec<MenuSection> {
    let mut states: Vec<&str> = Vec::new();
    for run in runs {
        if !states.contains(&run.state()) {
            states.push(run.state());
        }
    }
    states
        .into_iter()
        .map(|state| MenuSection {
            title: state.to_ascii_uppercase(),
            runs: runs
                .iter()
                .enumerate()
                .filter(|(_, run)| run.state() == state)
                .map(|(i, _)| i)
                .collect(),
        })
        .collect()
}

#[derive(Debug)]
pub struct RunMenu {
    loading: bool,
    timed_out: bool,
    loading_timer: OneShot,
    sections: Vec<MenuSection>,
    /// Highlighted row, counted across all sections
    highlighted: usize,
}

impl RunMenu {
    /// A menu waiting for its run list
    pub fn new(timings: &Timings, now: Duration) -> Self {
        let mut loading_timer = OneShot::default();
        loading_timer.arm(now + timings.loading_timeout);
        Self {
            loading: true,
            timed_out: false,
            loading_timer,
            sections: Vec::new(),
            highlighted: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn sections(&self) -> &[MenuSection] {
        &self.sections
    }

    pub fn has_pending_work(&self) -> bool {
        self.loading_timer.is_armed()
    }

    /// The run list is complete: show it
    pub fn finish_loading(&mut self, runs: &[Run]) {
        self.loading = false;
        self.timed_out = false;
        self.loading_timer.cancel();
        self.sections = group_by_state(runs);
        self.highlighted = self.highlighted.min(self.row_count().saturating_sub(1));
    }

    pub fn tick(&mut self, now: Duration) {
        if self.loading_timer.fire(now).is_some() && self.loading {
            tracing::warn!("run list did not arrive in time");
            self.timed_out = true;
        }
    }

    fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.runs.len()).sum()
    }

    pub fn move_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.highlighted + 1 < self.row_count() {
            self.highlighted += 1;
        }
    }

    /// Run index of the highlighted row
    pub fn selected_run(&self) -> Option<usize> {
        if self.loading {
            return None;
        }
        self.sections
            .iter()
            .flat_map(|s| s.runs.iter().copied())
            .nth(self.highlighted)
    }

    pub fn render(&self, canvas: &mut impl Canvas, runs: &[Run], screen: Size) {
        let width = screen.w;
        if self.loading {
            let content_height = screen.h - STATUS_BAR_HEIGHT;
            let y = STATUS_BAR_HEIGHT + (content_height - LOADING_TEXT_HEIGHT) / 2;
            let text = if self.timed_out { TIMEOUT_TEXT } else { LOADING_TEXT };
            canvas.draw_text(
                text,
                Font::Gothic24Bold,
                Rect::new(TEXT_PADDING, y, width - TEXT_PADDING * 2, LOADING_TEXT_HEIGHT),
                TextAlign::Center,
                Color::Black,
            );
            return;
        }

        // Scroll so the highlighted row stays on screen
        let visible = screen.h - STATUS_BAR_HEIGHT;
        let mut highlight_bottom = 0;
        let mut y = 0;
        let mut row = 0;
        for section in &self.sections {
            y += HEADER_HEIGHT;
            for _ in &section.runs {
                y += ROW_HEIGHT;
                if row == self.highlighted {
                    highlight_bottom = y;
                }
                row += 1;
            }
        }
        let scroll = (highlight_bottom - visible).max(0);

        let mut y = STATUS_BAR_HEIGHT - scroll;
        let mut row = 0;
        for section in &self.sections {
            canvas.draw_text(
                &section.title,
                Font::Gothic14Bold,
                Rect::new(4, y, width - 8, HEADER_HEIGHT),
                TextAlign::Left,
                Color::Black,
            );
            y += HEADER_HEIGHT;

            for &index in &section.runs {
                let Some(run) = runs.get(index) else {
                    continue;
                };
                let highlighted = row == self.highlighted;
                let (background, ink) = if highlighted {
                    (Color::Black, Color::White)
                } else {
                    (Color::White, Color::Black)
                };
                canvas.fill_rect(Rect::new(0, y, width, ROW_HEIGHT), background);
                canvas.draw_text(
                    run.run_name(),
                    Font::Gothic18Bold,
                    Rect::new(5, y + 2, width - 10, 22),
                    TextAlign::Left,
                    ink,
                );
                canvas.draw_text(
                    run.project_name(),
                    Font::Gothic14,
                    Rect::new(5, y + 24, width - 10, 18),
                    TextAlign::Left,
                    ink,
                );
                y += ROW_HEIGHT;
                row += 1;
            }
        }
    }
}
