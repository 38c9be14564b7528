//! Graph and skeleton painting
//!
//! Every paint re-derives the value range and sample coordinates from the
//! metric on display; nothing is cached between frames.

use super::{Canvas, Color, Rect};
use crate::graph::{calculate_graph_points, interpolate_indicator_position, GraphPoints};
use crate::history::calculate_value_range;

/// Side of the square sample marker drawn while scrubbing
pub const DATA_POINT_SIZE: i32 = 3;

/// Side of the square position indicator
pub const INDICATOR_SIZE: i32 = 10;

/// Stroke width of the browsing line graph
pub const LINE_WIDTH: u8 = 2;

/// How the graph is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphStyle {
    /// Connected line, indicator on the latest sample
    Browsing,
    /// Sample markers only, indicator at the scrub cursor
    Scrubbing { position: i32 },
}

/// Paint a metric history into `frame`.
///
/// Draws nothing for fewer than two samples.
pub fn render_graph(canvas: &mut impl Canvas, frame: Rect, samples: &[i64], style: GraphStyle) {
    let Some(range) = calculate_value_range(samples) else {
        return;
    };
    let local = calculate_graph_points(samples, frame.size, range);
    if local.len() < 2 {
        return;
    }
    let points: GraphPoints = local
        .iter()
        .map(|p| p.offset(frame.origin.x, frame.origin.y))
        .collect();

    let indicator = match style {
        GraphStyle::Browsing => {
            for pair in points.windows(2) {
                canvas.draw_line(pair[0], pair[1], LINE_WIDTH, Color::Black);
            }
            points.last().copied()
        }
        GraphStyle::Scrubbing { position } => {
            for p in &points {
                canvas.fill_rect(
                    Rect::new(p.x - 1, p.y - 1, DATA_POINT_SIZE, DATA_POINT_SIZE),
                    Color::LightGray,
                );
            }
            interpolate_indicator_position(&points, position)
        }
    };

    if let Some(center) = indicator {
        canvas.fill_rect(Rect::centered_square(center, INDICATOR_SIZE), Color::Black);
    }
}

/// Paint loading placeholders over the name, value and graph frames.
pub fn draw_skeleton(canvas: &mut impl Canvas, name_frame: Rect, value_frame: Rect, graph_frame: Rect) {
    let name = Rect::new(name_frame.origin.x, name_frame.origin.y + 4, 80, 14);
    let value = Rect::new(value_frame.origin.x, value_frame.origin.y + 3, 100, 26);
    canvas.fill_rect(name, Color::LightGray);
    canvas.fill_rect(value, Color::LightGray);
    canvas.fill_rect(graph_frame, Color::LightGray);
}
