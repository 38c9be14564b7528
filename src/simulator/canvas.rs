//! [`Canvas`] on top of an egui painter
//!
//! Watch pixels are drawn as `scale`-sized squares starting at `origin`, so
//! the screen stays crisp at any integer zoom.

use egui::{Color32, FontId, Painter, Pos2, Stroke};

use crate::render::{Canvas, Color, Font, Point, Rect, TextAlign};

/// Pebble light gray (#AAAAAA)
const LIGHT_GRAY: Color32 = Color32::from_gray(0xAA);

pub fn color32(color: Color) -> Color32 {
    match color {
        Color::Black => Color32::BLACK,
        Color::White => Color32::WHITE,
        Color::LightGray => LIGHT_GRAY,
    }
}

pub fn font_id(font: Font, scale: f32) -> FontId {
    let size = font.pixel_height() as f32 * scale;
    match font {
        Font::Numbers26 => FontId::monospace(size),
        _ => FontId::proportional(size),
    }
}

pub struct EguiCanvas<'a> {
    painter: &'a Painter,
    origin: Pos2,
    scale: f32,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a Painter, origin: Pos2, scale: f32) -> Self {
        Self {
            painter,
            origin,
            scale,
        }
    }

    /// Top-left corner of a watch pixel
    pub fn to_screen(&self, point: Point) -> Pos2 {
        Pos2::new(
            self.origin.x + point.x as f32 * self.scale,
            self.origin.y + point.y as f32 * self.scale,
        )
    }

    /// Centre of a watch pixel; lines are stroked through pixel centres
    fn pixel_center(&self, point: Point) -> Pos2 {
        self.to_screen(point) + egui::vec2(self.scale / 2.0, self.scale / 2.0)
    }

    pub fn to_screen_rect(&self, rect: Rect) -> egui::Rect {
        egui::Rect::from_min_size(
            self.to_screen(rect.origin),
            egui::vec2(rect.size.w as f32 * self.scale, rect.size.h as f32 * self.scale),
        )
    }
}

impl Canvas for EguiCanvas<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.painter
            .rect_filled(self.to_screen_rect(rect), 0.0, color32(color));
    }

    fn draw_line(&mut self, from: Point, to: Point, width: u8, color: Color) {
        self.painter.line_segment(
            [self.pixel_center(from), self.pixel_center(to)],
            Stroke::new(f32::from(width) * self.scale, color32(color)),
        );
    }

    fn draw_text(&mut self, text: &str, font: Font, bounds: Rect, align: TextAlign, color: Color) {
        let bounds = self.to_screen_rect(bounds);
        let galley = self.painter.layout(
            text.to_owned(),
            font_id(font, self.scale),
            color32(color),
            bounds.width(),
        );
        let x = match align {
            TextAlign::Left => bounds.left(),
            TextAlign::Center => bounds.center().x - galley.size().x / 2.0,
            TextAlign::Right => bounds.right() - galley.size().x,
        };
        self.painter
            .with_clip_rect(bounds)
            .galley(Pos2::new(x, bounds.top()), galley, color32(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_scales_with_zoom() {
        assert_eq!(font_id(Font::Gothic18Bold, 3.0).size, 54.0);
        assert_eq!(font_id(Font::Numbers26, 1.0), FontId::monospace(26.0));
    }

    #[test]
    fn test_palette() {
        assert_eq!(color32(Color::LightGray), Color32::from_rgb(0xAA, 0xAA, 0xAA));
        assert_eq!(color32(Color::Black), Color32::BLACK);
    }
}
