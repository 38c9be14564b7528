//! Screen geometry for rectangular and round watches

use serde::{Deserialize, Serialize};

use crate::render::{Rect, Size, TextAlign};

/// Height of the system status bar at the top of every screen
pub const STATUS_BAR_HEIGHT: i32 = 16;

/// Height of the metric name frame
pub const NAME_FRAME_HEIGHT: i32 = 22;

/// Height of the metric value frame
pub const VALUE_FRAME_HEIGHT: i32 = 32;

const RECT_PADDING: i32 = 10;
const ROUND_PADDING: i32 = 30;
const ROUND_GRAPH_INSET: i32 = 10;

/// Physical shape of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayShape {
    #[default]
    Rect,
    Round,
}

/// Frames of the detail screen elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailLayout {
    pub screen: Size,
    pub name: Rect,
    pub value: Rect,
    pub graph: Rect,
    /// "page/total" label in the status bar; round screens have none
    pub pagination: Option<Rect>,
    pub align: TextAlign,
}

impl DetailLayout {
    pub fn new(screen: Size, shape: DisplayShape) -> Self {
        let (padding, name_y, align, graph_inset, pagination) = match shape {
            DisplayShape::Rect => (
                RECT_PADDING,
                STATUS_BAR_HEIGHT + RECT_PADDING,
                TextAlign::Left,
                0,
                Some(Rect::new(screen.w - 40, -2, 36, STATUS_BAR_HEIGHT)),
            ),
            DisplayShape::Round => (
                ROUND_PADDING,
                STATUS_BAR_HEIGHT + ROUND_PADDING / 2,
                TextAlign::Center,
                ROUND_GRAPH_INSET,
                None,
            ),
        };

        let content_width = screen.w - padding * 2;
        let value_y = name_y + NAME_FRAME_HEIGHT;
        let graph_y = value_y + VALUE_FRAME_HEIGHT + padding;
        let graph_height = screen.h - graph_y - padding;

        Self {
            screen,
            name: Rect::new(padding, name_y, content_width, NAME_FRAME_HEIGHT),
            value: Rect::new(padding, value_y, content_width, VALUE_FRAME_HEIGHT),
            graph: Rect::new(
                padding + graph_inset,
                graph_y,
                content_width - graph_inset * 2 - padding,
                graph_height,
            ),
            pagination,
            align,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_layout() {
        let layout = DetailLayout::new(Size::new(144, 168), DisplayShape::Rect);
        assert_eq!(layout.name, Rect::new(10, 26, 124, 22));
        assert_eq!(layout.value, Rect::new(10, 48, 124, 32));
        assert_eq!(layout.graph, Rect::new(10, 90, 114, 68));
        assert_eq!(layout.pagination, Some(Rect::new(104, -2, 36, 16)));
        assert_eq!(layout.align, TextAlign::Left);
    }

    #[test]
    fn test_round_layout() {
        let layout = DetailLayout::new(Size::new(180, 180), DisplayShape::Round);
        assert_eq!(layout.name, Rect::new(30, 31, 120, 22));
        assert_eq!(layout.graph, Rect::new(40, 115, 70, 35));
        assert!(layout.pagination.is_none());
        assert_eq!(layout.align, TextAlign::Center);
    }
}
