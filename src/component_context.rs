//! Shared component context
//!
//! `ComponentContext` carries the read-only facts a widget needs while
//! resizing or painting: how big a cell is and where the window sits on the
//! desktop. `EventContext` adds the mutable services available while handling
//! input or timers, so widgets can defer work and notify their owner without
//! holding references to each other.

use crate::geometry::{CellMetrics, Point};
use crate::scheduler::Scheduler;
use crate::screens::Desktop;
use crate::signals::{Outbox, TimerTask, UiSignal};
use crate::text::TextMetrics;

#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    metrics: CellMetrics,
    window_origin: Point,
    focused: bool,
    overlay: bool,
}

impl ComponentContext {
    pub const fn new(metrics: CellMetrics) -> Self {
        Self {
            metrics,
            window_origin: Point::new(0, 0),
            focused: true,
            overlay: false,
        }
    }

    pub const fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub const fn text(&self) -> TextMetrics {
        TextMetrics::new(self.metrics)
    }

    /// Top-left of the window's client area on the virtual desktop.
    pub const fn window_origin(&self) -> Point {
        self.window_origin
    }

    /// Whether the window currently has input focus.
    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// Whether the component paints above the remote view.
    pub const fn overlay(&self) -> bool {
        self.overlay
    }

    pub const fn with_metrics(mut self, metrics: CellMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub const fn with_window_origin(mut self, origin: Point) -> Self {
        self.window_origin = origin;
        self
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }

    /// Map a window-local pixel position onto the desktop.
    pub fn to_global(&self, local: Point) -> Point {
        local + self.window_origin
    }

    pub fn to_local(&self, global: Point) -> Point {
        global - self.window_origin
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(CellMetrics::default())
    }
}

pub struct EventContext<'a> {
    pub timers: &'a mut Scheduler<TimerTask>,
    pub signals: &'a mut Outbox<UiSignal>,
    pub desktop: &'a Desktop,
    pub ui: ComponentContext,
}

impl<'a> EventContext<'a> {
    pub fn new(
        timers: &'a mut Scheduler<TimerTask>,
        signals: &'a mut Outbox<UiSignal>,
        desktop: &'a Desktop,
        ui: ComponentContext,
    ) -> Self {
        Self {
            timers,
            signals,
            desktop,
            ui,
        }
    }
}
