use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::components::{Component, ComponentContext};
use crate::geometry::PxRect;
use crate::text::display_width;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

/// One-row session line under the remote view: connection state on the
/// left, key hints on the right. Hidden in full-screen mode by its owner.
#[derive(Debug)]
pub struct StatusBar {
    left: String,
    right: String,
    style: Style,
    area: Rect,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            style: Style::default()
                .bg(theme::status_bg())
                .fg(theme::status_fg()),
            area: Rect::default(),
        }
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn area(&self) -> Rect {
        self.area
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for StatusBar {
    fn resize(&mut self, bounds: PxRect, ctx: &ComponentContext) {
        let everything = Rect::new(0, 0, u16::MAX, u16::MAX);
        self.area = ctx
            .metrics()
            .px_to_cells(bounds)
            .clip(everything)
            .unwrap_or_default();
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, _ctx: &ComponentContext) {
        let area = self.area.intersection(frame.area());
        if area.height == 0 || area.width == 0 {
            return;
        }
        frame.fill(area, self.style);
        let (x, y) = (area.x, area.y);
        let width = area.width as usize;
        let buffer = frame.buffer_mut();

        let left = truncate_to_width(&self.left, width);
        safe_set_string(buffer, area, x, y, &left, self.style);

        let left_width = display_width(&left);
        if !self.right.is_empty() && left_width + 1 < width {
            let right = truncate_to_width(&self.right, width - left_width - 1);
            let right_width = display_width(&right);
            let start_x = x.saturating_add((width - right_width) as u16);
            safe_set_string(buffer, area, start_x, y, &right, self.style);
        }
    }
}
