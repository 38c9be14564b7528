//! Canvas that records draw calls for later inspection

use wandb_watch::render::{Canvas, Color, Font, Point, Rect, TextAlign};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Fill { rect: Rect, color: Color },
    Line { from: Point, to: Point, width: u8, color: Color },
    Text { text: String, font: Font, bounds: Rect, align: TextAlign, color: Color },
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines of the given stroke width
    pub fn lines(&self, width: u8) -> Vec<(Point, Point)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Line { from, to, width: w, .. } if *w == width => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    /// Filled rectangles of one color
    pub fn fills(&self, color: Color) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Fill { rect, color: c } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Text drawn in `font`, in paint order
    pub fn texts(&self, font: Font) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, font: f, .. } if *f == font => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether any text call contains `needle`
    pub fn has_text(&self, needle: &str) -> bool {
        self.calls
            .iter()
            .any(|call| matches!(call, DrawCall::Text { text, .. } if text.contains(needle)))
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::Fill { rect, color });
    }

    fn draw_line(&mut self, from: Point, to: Point, width: u8, color: Color) {
        self.calls.push(DrawCall::Line { from, to, width, color });
    }

    fn draw_text(&mut self, text: &str, font: Font, bounds: Rect, align: TextAlign, color: Color) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            font,
            bounds,
            align,
            color,
        });
    }
}
