//! UiFrame: a thin wrapper around the terminal buffer that clamps drawing to
//! the visible area.
//!
//! Overlay widgets compute their placement in device pixels, so after cell
//! snapping their rectangles often start at negative cells or run past the
//! buffer edge. Every draw call goes through here and is clipped, which lets
//! widget code stay free of bounds checks.
//!
//! Non-rectangular popups render into an offscreen buffer and are composited
//! with [`UiFrame::blit_masked`], which copies only the cells inside the
//! widget's shape.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::geometry::CellRect;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer, for offscreen
    /// rendering and tests.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    pub fn fill(&mut self, area: Rect, style: Style) {
        let Some(clipped) = self.clip_rect(area) else {
            return;
        };
        for y in clipped.top()..clipped.bottom() {
            for x in clipped.left()..clipped.right() {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_style(style);
                }
            }
        }
    }

    /// Copy `src` (anchored at its own origin) to a signed destination,
    /// skipping cells whose entry in the row-major `mask` is false.
    pub fn blit_masked(&mut self, src: &Buffer, dest: CellRect, mask: &[bool]) {
        let frame_x0 = self.area.x as i32;
        let frame_y0 = self.area.y as i32;
        let frame_x1 = frame_x0 + self.area.width as i32;
        let frame_y1 = frame_y0 + self.area.height as i32;
        let stride = dest.width as usize;
        for sy in 0..dest.height as i32 {
            let dy = dest.y + sy;
            if dy < frame_y0 || dy >= frame_y1 {
                continue;
            }
            for sx in 0..dest.width as i32 {
                let dx = dest.x + sx;
                if dx < frame_x0 || dx >= frame_x1 {
                    continue;
                }
                let visible = mask
                    .get(sy as usize * stride + sx as usize)
                    .copied()
                    .unwrap_or(false);
                if !visible {
                    continue;
                }
                if let (Some(src_cell), Some(dst_cell)) = (
                    src.cell((src.area.x + sx as u16, src.area.y + sy as u16)),
                    self.buffer.cell_mut((dx as u16, dy as u16)),
                ) {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

pub fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

/// Write `text` centered in `row` of `bounds`, clipped to the bounds.
pub fn set_centered_string(buffer: &mut Buffer, bounds: Rect, y: u16, text: &str, style: Style) {
    let text = truncate_to_width(text, bounds.width as usize);
    let width = crate::text::display_width(&text) as u16;
    let x = bounds.x + (bounds.width.saturating_sub(width)) / 2;
    safe_set_string(buffer, bounds, x, y, &text, style);
}

pub fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}
