//! Drawing surface and screen painting
//!
//! The watch core draws through the [`Canvas`] trait: filled rectangles,
//! lines and text in integer pixel coordinates. Nothing else about the
//! display is assumed. The simulator implements it on top of an egui
//! painter; tests record or mock the calls.

pub mod graph;

pub use graph::{draw_skeleton, render_graph, GraphStyle};

/// A pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This point shifted by `(dx, dy)`
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// An axis-aligned pixel rectangle (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(w, h),
        }
    }

    /// Same size, origin shifted vertically
    pub const fn shifted_y(self, dy: i32) -> Self {
        Self {
            origin: self.origin.offset(0, dy),
            size: self.size,
        }
    }

    /// Square of side `side` centred on `center`
    pub const fn centered_square(center: Point, side: i32) -> Self {
        let half = side / 2;
        Self::new(center.x - half, center.y - half, side, side)
    }
}

/// Palette of the watch display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
    LightGray,
}

/// System fonts the watch offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Pagination label, section headers
    Gothic14,
    Gothic14Bold,
    /// Metric name
    Gothic18Bold,
    /// Loading and menu text
    Gothic24Bold,
    /// Large metric value
    Numbers26,
}

impl Font {
    /// Nominal pixel height
    pub fn pixel_height(&self) -> i32 {
        match self {
            Font::Gothic14 | Font::Gothic14Bold => 14,
            Font::Gothic18Bold => 18,
            Font::Gothic24Bold => 24,
            Font::Numbers26 => 26,
        }
    }
}

/// Horizontal text alignment inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A 2D drawing context in pixel space.
#[cfg_attr(test, mockall::automock)]
pub trait Canvas {
    /// Fill `rect` with `color`
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke a straight line of `width` pixels
    fn draw_line(&mut self, from: Point, to: Point, width: u8, color: Color);

    /// Draw `text` inside `bounds`, wrapping as the platform sees fit
    fn draw_text(&mut self, text: &str, font: Font, bounds: Rect, align: TextAlign, color: Color);
}
