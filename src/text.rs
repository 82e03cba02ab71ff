//! Text measurement in device pixels and greedy word wrapping.
//!
//! On a terminal every glyph is one or two cells wide, so widths are display
//! columns times the cell width and a line is exactly one cell tall. Bold
//! text has the same advance as regular text.

use ratatui::text::Span;

use crate::geometry::{CellMetrics, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    cell: CellMetrics,
}

impl TextMetrics {
    pub const fn new(cell: CellMetrics) -> Self {
        Self { cell }
    }

    pub fn line_height(&self) -> i32 {
        self.cell.cell_height() as i32
    }

    pub fn text_width(&self, text: &str) -> i32 {
        display_width(text) as i32 * self.cell.cell_width() as i32
    }

    /// Columns that fit into `width_px`, never less than one.
    pub fn columns_for(&self, width_px: i32) -> usize {
        (width_px / self.cell.cell_width() as i32).max(1) as usize
    }

    pub fn wrap(&self, text: &str, wrap_width_px: i32) -> Vec<String> {
        wrap_words(text, self.columns_for(wrap_width_px))
    }

    /// Bounding box of `text` word-wrapped at `wrap_width_px`. Words longer
    /// than the wrap width are kept whole and widen the box.
    pub fn wrapped_bounds(&self, text: &str, wrap_width_px: i32) -> Size {
        let lines = self.wrap(text, wrap_width_px);
        let width = lines
            .iter()
            .map(|line| self.text_width(line))
            .max()
            .unwrap_or(0);
        Size::new(width, lines.len() as i32 * self.line_height())
    }
}

pub fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Greedy word wrap at `columns`. Explicit newlines start a new line; an
/// empty input yields no lines at all.
pub fn wrap_words(text: &str, columns: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let columns = columns.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0usize;
        for word in paragraph.split_whitespace() {
            let word_width = display_width(word);
            if line.is_empty() {
                line.push_str(word);
                line_width = word_width;
            } else if line_width + 1 + word_width <= columns {
                line.push(' ');
                line.push_str(word);
                line_width += 1 + word_width;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
                line_width = word_width;
            }
        }
        lines.push(line);
    }
    lines
}
