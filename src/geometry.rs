//! Device-pixel geometry and its mapping onto terminal cells.
//!
//! Everything the overlay computes (button bounds, tooltip placement,
//! monitor rectangles) lives in signed device pixels so it can be reasoned
//! about independently of the terminal. `CellMetrics` is the only place that
//! knows how big a cell is.

use std::ops::{Add, Sub};

use crossterm::terminal::WindowSize;
use ratatui::layout::Rect;

use crate::constants::{DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Non-negative extent in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Signed rectangle in device pixels. `right()` and `bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PxRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PxRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        let size = Size::new(width, height);
        Self {
            x,
            y,
            width: size.width,
            height: size.height,
        }
    }

    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub const fn contains_rect(&self, other: &PxRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub const fn translated(&self, delta: Point) -> Self {
        Self::new(
            self.x + delta.x,
            self.y + delta.y,
            self.width,
            self.height,
        )
    }

    pub const fn moved_to(&self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    pub fn intersection(&self, other: &PxRect) -> Option<PxRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PxRect::new(x0, y0, x1 - x0, y1 - y0))
    }

    pub fn overlap_area(&self, other: &PxRect) -> i64 {
        self.intersection(other)
            .map(|r| r.width as i64 * r.height as i64)
            .unwrap_or(0)
    }
}

/// Hit test against a rounded rectangle of `size` anchored at the origin.
///
/// The radius is clamped to half the shorter side so the arc centers never
/// cross.
pub fn rounded_rect_contains(size: Size, radius: i32, p: Point) -> bool {
    if size.is_empty() || p.x < 0 || p.y < 0 || p.x >= size.width || p.y >= size.height {
        return false;
    }
    let r = radius
        .min((size.width - 1) / 2)
        .min((size.height - 1) / 2)
        .max(0);
    if r == 0 {
        return true;
    }
    // Nearest point on the inner rectangle whose corners are the arc centers.
    let nx = p.x.clamp(r, size.width - 1 - r);
    let ny = p.y.clamp(r, size.height - 1 - r);
    let dx = (p.x - nx) as i64;
    let dy = (p.y - ny) as i64;
    dx * dx + dy * dy <= (r as i64) * (r as i64)
}

/// Signed cell rectangle: origin may sit off-screen while the size is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    /// Clip against a visible area, dropping rectangles that end up empty.
    pub fn clip(&self, bounds: Rect) -> Option<Rect> {
        let x0 = self.x.max(bounds.x as i32);
        let y0 = self.y.max(bounds.y as i32);
        let x1 = (self.x + self.width as i32).min(bounds.x as i32 + bounds.width as i32);
        let y1 = (self.y + self.height as i32).min(bounds.y as i32 + bounds.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect {
            x: x0 as u16,
            y: y0 as u16,
            width: (x1 - x0) as u16,
            height: (y1 - y0) as u16,
        })
    }
}

/// Pixel size of one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    cell_width: u16,
    cell_height: u16,
}

impl CellMetrics {
    pub fn new(cell_width: u16, cell_height: u16) -> Self {
        Self {
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        }
    }

    /// Ask the terminal for its pixel size; terminals that do not report one
    /// get the default metrics.
    pub fn detect() -> Self {
        crossterm::terminal::window_size()
            .ok()
            .and_then(Self::from_window_size)
            .unwrap_or_default()
    }

    pub fn from_window_size(size: WindowSize) -> Option<Self> {
        if size.width == 0 || size.height == 0 || size.columns == 0 || size.rows == 0 {
            return None;
        }
        Some(Self::new(size.width / size.columns, size.height / size.rows))
    }

    pub const fn cell_width(&self) -> u16 {
        self.cell_width
    }

    pub const fn cell_height(&self) -> u16 {
        self.cell_height
    }

    /// Pixel position a pointer report at `(column, row)` stands for.
    pub fn cell_center(&self, column: u16, row: u16) -> Point {
        let cw = self.cell_width as i32;
        let ch = self.cell_height as i32;
        Point::new(column as i32 * cw + cw / 2, row as i32 * ch + ch / 2)
    }

    /// Pixel rectangle covered by the cell at `(column, row)`.
    pub fn cell_px(&self, column: i32, row: i32) -> PxRect {
        let cw = self.cell_width as i32;
        let ch = self.cell_height as i32;
        PxRect::new(column * cw, row * ch, cw, ch)
    }

    pub fn cells_to_px(&self, columns: u16, rows: u16) -> Size {
        Size::new(
            columns as i32 * self.cell_width as i32,
            rows as i32 * self.cell_height as i32,
        )
    }

    /// Snap a pixel rectangle to the nearest cell boundaries.
    pub fn px_to_cells(&self, rect: PxRect) -> CellRect {
        let cw = self.cell_width as i32;
        let ch = self.cell_height as i32;
        let x0 = round_div(rect.x, cw);
        let y0 = round_div(rect.y, ch);
        let x1 = round_div(rect.right(), cw);
        let y1 = round_div(rect.bottom(), ch);
        CellRect {
            x: x0,
            y: y0,
            width: (x1 - x0).clamp(0, u16::MAX as i32) as u16,
            height: (y1 - y0).clamp(0, u16::MAX as i32) as u16,
        }
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_WIDTH, DEFAULT_CELL_HEIGHT)
    }
}

fn round_div(value: i32, divisor: i32) -> i32 {
    (value + divisor / 2).div_euclid(divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_are_exclusive() {
        let r = PxRect::new(-1920, 0, 1920, 1080);
        assert!(r.contains(Point::new(-1920, 0)));
        assert!(r.contains(Point::new(-1, 1079)));
        assert!(!r.contains(Point::new(0, 10)));
        assert!(!r.contains(Point::new(-10, 1080)));
        assert_eq!(r.right(), 0);
        assert_eq!(r.bottom(), 1080);
    }

    #[test]
    fn negative_sizes_clamp_to_zero() {
        let r = PxRect::new(5, 5, -3, 10);
        assert_eq!(r.width, 0);
        assert!(r.is_empty());
        assert!(!r.contains(Point::new(5, 6)));
    }

    #[test]
    fn intersection_and_overlap() {
        let a = PxRect::new(0, 0, 100, 100);
        let b = PxRect::new(50, 80, 100, 100);
        assert_eq!(a.intersection(&b), Some(PxRect::new(50, 80, 50, 20)));
        assert_eq!(a.overlap_area(&b), 1000);
        let c = PxRect::new(100, 0, 10, 10);
        assert_eq!(a.intersection(&c), None);
        assert_eq!(a.overlap_area(&c), 0);
    }

    #[test]
    fn rounded_rect_cuts_corners_only() {
        let size = Size::new(88, 48);
        assert!(!rounded_rect_contains(size, 5, Point::new(0, 0)));
        assert!(rounded_rect_contains(size, 5, Point::new(5, 0)));
        assert!(rounded_rect_contains(size, 5, Point::new(44, 24)));
        assert!(!rounded_rect_contains(size, 5, Point::new(87, 47)));
        assert!(rounded_rect_contains(size, 5, Point::new(82, 47)));
        assert!(!rounded_rect_contains(size, 5, Point::new(88, 10)));
    }

    #[test]
    fn rounded_rect_handles_tiny_sizes() {
        assert!(rounded_rect_contains(Size::new(1, 1), 10, Point::new(0, 0)));
        assert!(!rounded_rect_contains(Size::new(0, 4), 10, Point::new(0, 0)));
    }

    #[test]
    fn cell_center_and_snapping() {
        let m = CellMetrics::new(8, 16);
        assert_eq!(m.cell_center(0, 0), Point::new(4, 8));
        assert_eq!(m.cell_center(3, 2), Point::new(28, 40));
        let cells = m.px_to_cells(PxRect::new(8, 16, 88, 48));
        assert_eq!(
            cells,
            CellRect {
                x: 1,
                y: 1,
                width: 11,
                height: 3
            }
        );
        let off = m.px_to_cells(PxRect::new(-20, -9, 16, 16));
        assert_eq!(off.x, -2);
        assert_eq!(off.y, -1);
    }

    #[test]
    fn cell_rect_clip_drops_offscreen() {
        let bounds = Rect::new(0, 0, 10, 5);
        let partly = CellRect {
            x: -3,
            y: 2,
            width: 5,
            height: 10,
        };
        assert_eq!(partly.clip(bounds), Some(Rect::new(0, 2, 2, 3)));
        let gone = CellRect {
            x: 12,
            y: 0,
            width: 3,
            height: 1,
        };
        assert_eq!(gone.clip(bounds), None);
    }

    #[test]
    fn metrics_from_window_size() {
        let ws = WindowSize {
            rows: 50,
            columns: 100,
            width: 1000,
            height: 1000,
        };
        let m = CellMetrics::from_window_size(ws).unwrap();
        assert_eq!(m.cell_width(), 10);
        assert_eq!(m.cell_height(), 20);
        let unknown = WindowSize {
            rows: 50,
            columns: 100,
            width: 0,
            height: 0,
        };
        assert!(CellMetrics::from_window_size(unknown).is_none());
    }
}
