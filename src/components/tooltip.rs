//! Hover tooltip popup: sizing, monitor-aware placement, connector notch and
//! the cached offscreen background.

use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::Event;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use crate::components::button::ButtonHandle;
use crate::components::raster::RasterImage;
use crate::components::{Component, ComponentContext, EventContext};
use crate::constants::{
    CONNECTOR_NOTCH_SIZE, TOOLTIP_CORNER_RADIUS, TOOLTIP_EDGE_NUDGE, TOOLTIP_FLIP_GAP,
    TOOLTIP_ICON_SIZE, TOOLTIP_MARGIN, TOOLTIP_OFFSET_X, TOOLTIP_OFFSET_Y, TOOLTIP_WRAP_WIDTH,
};
use crate::geometry::{CellMetrics, CellRect, Point, PxRect, Size, rounded_rect_contains};
use crate::text::TextMetrics;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

static TOOLTIPS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Process-wide switch; buttons check it on every pointer enter.
pub fn set_tooltips_disabled(disabled: bool) {
    TOOLTIPS_DISABLED.store(disabled, Ordering::Relaxed);
}

pub fn tooltips_disabled() -> bool {
    TOOLTIPS_DISABLED.load(Ordering::Relaxed)
}

/// Panel size for an icon, a bold title and a wrapped description box.
pub fn tooltip_size(icon: Size, title_width: i32, description: Size, line_height: i32) -> Size {
    let m = TOOLTIP_MARGIN;
    let text_width = title_width.max(description.width).max(0);
    let text_height = line_height + m + description.height;
    Size::new(
        m + icon.width + m + text_width + m,
        m + icon.height.max(text_height) + m,
    )
}

/// Pull the anchor point so a panel of `size` fits `screen`, in the order a
/// popup below its anchor needs: nudge, flip above, then hard clamps.
pub fn clamp_to_screen(anchor: Point, size: Size, screen: PxRect) -> Point {
    let mut p = anchor;
    if p.x + size.width > screen.right() {
        p.x -= TOOLTIP_EDGE_NUDGE;
    }
    if p.y + size.height > screen.bottom() {
        p.y -= size.height + TOOLTIP_FLIP_GAP;
    }
    p.y = p.y.max(screen.y);
    if p.x + size.width > screen.right() {
        p.x = screen.right() - size.width;
    }
    p.x = p.x.max(screen.x);
    if p.y + size.height > screen.bottom() {
        p.y = screen.bottom() - size.height;
    }
    p
}

/// Displayed top-left: the clamped anchor shifted below-left of the button.
pub fn place_tooltip(anchor: Point, size: Size, screen: PxRect) -> Point {
    clamp_to_screen(anchor, size, screen).offset(TOOLTIP_OFFSET_X, TOOLTIP_OFFSET_Y)
}

/// Horizontal offset of the notch joining panel and button, if they line up
/// closely enough to show one.
pub fn connector_dx(anchor_x: i32, tooltip_x: i32) -> Option<i32> {
    let dx = anchor_x - tooltip_x;
    (0..CONNECTOR_NOTCH_SIZE).contains(&dx).then_some(dx)
}

#[derive(Debug)]
struct Background {
    bounds: PxRect,
    window_origin: Point,
    metrics: CellMetrics,
    anchor_rect: Option<PxRect>,
    cells: CellRect,
    buffer: Buffer,
    mask: Vec<bool>,
}

#[derive(Debug)]
pub struct HoverTooltip {
    anchor: ButtonHandle,
    anchor_rect: Option<PxRect>,
    icon: RasterImage,
    title: String,
    description: String,
    lines: Vec<String>,
    line_height: i32,
    bounds: PxRect,
    closed: bool,
    background: Option<Background>,
}

impl HoverTooltip {
    /// `anchor_rect` is the button's global rectangle at spawn time.
    pub fn new(
        anchor: ButtonHandle,
        anchor_rect: PxRect,
        icon: RasterImage,
        title: String,
        description: String,
        text: &TextMetrics,
    ) -> Self {
        let icon_size = Size::new(TOOLTIP_ICON_SIZE as i32, TOOLTIP_ICON_SIZE as i32);
        let description_box = text.wrapped_bounds(&description, TOOLTIP_WRAP_WIDTH);
        let size = tooltip_size(
            icon_size,
            text.text_width(&title),
            description_box,
            text.line_height(),
        );
        Self {
            anchor,
            anchor_rect: Some(anchor_rect),
            icon,
            lines: text.wrap(&description, TOOLTIP_WRAP_WIDTH),
            line_height: text.line_height(),
            title,
            description,
            bounds: PxRect::from_origin_size(anchor_rect.origin(), size),
            closed: false,
            background: None,
        }
    }

    /// Position the panel for an anchor at `anchor` on `screen`.
    pub fn place(&mut self, anchor: Point, screen: PxRect) {
        let origin = place_tooltip(anchor, self.bounds.size(), screen);
        self.bounds = self.bounds.moved_to(origin);
        self.background = None;
    }

    pub fn anchor(&self) -> ButtonHandle {
        self.anchor
    }

    pub fn anchor_rect(&self) -> Option<PxRect> {
        self.anchor_rect
    }

    /// Global bounds.
    pub fn bounds(&self) -> PxRect {
        self.bounds
    }

    pub fn size(&self) -> Size {
        self.bounds.size()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn connector_dx(&self) -> Option<i32> {
        self.anchor_rect
            .and_then(|rect| connector_dx(rect.x, self.bounds.x))
    }

    /// Shape test in global pixels: rounded panel plus the notch.
    pub fn contains(&self, p: Point) -> bool {
        let local = p - self.bounds.origin();
        if rounded_rect_contains(self.bounds.size(), TOOLTIP_CORNER_RADIUS, local) {
            return true;
        }
        self.connector_dx().is_some_and(|dx| {
            PxRect::new(dx, 0, CONNECTOR_NOTCH_SIZE, CONNECTOR_NOTCH_SIZE).contains(local)
        })
    }

    /// Refresh the anchor's global rectangle. `None` means the button is
    /// gone; the notch disappears and the next event closes the tooltip.
    pub fn sync_anchor(&mut self, rect: Option<PxRect>) {
        if self.anchor_rect != rect {
            self.anchor_rect = rect;
            self.background = None;
        }
    }

    pub fn close(&mut self) {
        if !self.closed {
            tracing::debug!(title = %self.title, "tooltip closed");
        }
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn background_is_current(&self, ctx: &ComponentContext) -> bool {
        self.background.as_ref().is_some_and(|bg| {
            bg.bounds == self.bounds
                && bg.window_origin == ctx.window_origin()
                && bg.metrics == ctx.metrics()
                && bg.anchor_rect == self.anchor_rect
        })
    }

    fn rebuild_background(&mut self, ctx: &ComponentContext) {
        let metrics = ctx.metrics();
        let local = self.bounds.translated(Point::new(0, 0) - ctx.window_origin());
        let cells = metrics.px_to_cells(local);
        let area = Rect::new(0, 0, cells.width, cells.height);
        let mut buffer = Buffer::empty(area);
        let mut mask = vec![false; area.width as usize * area.height as usize];
        let notch = self.connector_dx();
        let top = theme::tooltip_top();
        let bottom = theme::tooltip_bottom();
        let height = self.bounds.height.max(1);

        // Cell centers relative to the panel decide shape and gradient.
        let center_of = |col: u16, row: u16| -> Point {
            let px = metrics.cell_px(cells.x + col as i32, cells.y + row as i32);
            Point::new(px.x + px.width / 2, px.y + px.height / 2) - local.origin()
        };
        for row in 0..area.height {
            for col in 0..area.width {
                let center = center_of(col, row);
                let inside =
                    rounded_rect_contains(self.bounds.size(), TOOLTIP_CORNER_RADIUS, center)
                        || notch.is_some_and(|dx| {
                            PxRect::new(dx, 0, CONNECTOR_NOTCH_SIZE, CONNECTOR_NOTCH_SIZE)
                                .contains(center)
                        });
                mask[row as usize * area.width as usize + col as usize] = inside;
                let t = (center.y.clamp(0, height) * 255 / height) as u8;
                buffer[(col, row)].set_bg(top.blend(bottom, t).to_color());
            }
        }

        let frame_style = Style::default().fg(theme::TOOLTIP_FRAME_RGB.to_color());
        let border = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(frame_style);
        UiFrame::from_parts(area, &mut buffer).render_widget(border, area);

        // The edge over the button is painted in the panel color so the two
        // read as one shape.
        if let Some(anchor) = self.anchor_rect {
            let from = anchor.x - self.bounds.x;
            let to = anchor.right() - self.bounds.x - 2;
            for col in 0..area.width {
                let x = center_of(col, 0).x;
                if x >= from && x <= to {
                    let cell = &mut buffer[(col, 0)];
                    cell.set_symbol(" ");
                    cell.set_bg(top.to_color());
                }
            }
        }

        let m = TOOLTIP_MARGIN;
        let icon_px = PxRect::new(
            local.x + m,
            local.y + m,
            TOOLTIP_ICON_SIZE as i32,
            TOOLTIP_ICON_SIZE as i32,
        );
        let to_panel = |rect: PxRect| -> CellRect {
            let c = metrics.px_to_cells(rect);
            CellRect {
                x: c.x - cells.x,
                y: c.y - cells.y,
                width: c.width,
                height: c.height,
            }
        };
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            if let Some(icon_area) = to_panel(icon_px).clip(area) {
                self.icon.render(&mut frame, icon_area);
            }
        }

        let text_style = Style::default().fg(theme::TOOLTIP_TEXT_RGB.to_color());
        let title_x = m + TOOLTIP_ICON_SIZE as i32 + m;
        let title_cells = to_panel(PxRect::new(
            local.x + title_x,
            local.y + m,
            1,
            self.line_height,
        ));
        let inner = Rect::new(
            1,
            1,
            area.width.saturating_sub(2),
            area.height.saturating_sub(2),
        );
        if title_cells.x >= 0 && title_cells.y >= 0 {
            safe_set_string(
                &mut buffer,
                inner,
                title_cells.x as u16,
                title_cells.y as u16,
                &self.title,
                text_style.add_modifier(Modifier::BOLD),
            );
        }
        for (i, line) in self.lines.iter().enumerate() {
            let y = m + self.line_height + m + i as i32 * self.line_height;
            let line_cells = to_panel(PxRect::new(local.x + title_x, local.y + y, 1, 1));
            if line_cells.x < 0 || line_cells.y < 0 {
                continue;
            }
            safe_set_string(
                &mut buffer,
                inner,
                line_cells.x as u16,
                line_cells.y as u16,
                line,
                text_style,
            );
        }

        self.background = Some(Background {
            bounds: self.bounds,
            window_origin: ctx.window_origin(),
            metrics,
            anchor_rect: self.anchor_rect,
            cells,
            buffer,
            mask,
        });
    }
}

impl Component for HoverTooltip {
    fn resize(&mut self, bounds: PxRect, _ctx: &ComponentContext) {
        if bounds != self.bounds {
            self.bounds = bounds;
            self.background = None;
        }
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, ctx: &ComponentContext) {
        if self.closed {
            return;
        }
        if !self.background_is_current(ctx) {
            self.rebuild_background(ctx);
        }
        if let Some(bg) = self.background.as_ref() {
            frame.blit_masked(&bg.buffer, bg.cells, &bg.mask);
        }
    }

    /// A tooltip whose button is gone closes on the next event it sees.
    fn handle_event(&mut self, _event: &Event, _cx: &mut EventContext<'_>) -> bool {
        if self.anchor_rect.is_none() {
            self.close();
        }
        false
    }
}
