//! Virtual desktop model and monitor resolution for popup placement.
//!
//! A `Desktop` always holds at least one screen, so resolving a monitor for
//! a point or widget can never fail; it only degrades toward the primary.

use crate::constants::{FALLBACK_SCREEN_HEIGHT, FALLBACK_SCREEN_WIDTH};
use crate::geometry::{Point, PxRect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    /// Full monitor rectangle on the virtual desktop.
    pub geometry: PxRect,
    /// Part of the monitor not reserved by panels or docks.
    pub available: PxRect,
}

impl Screen {
    pub const fn new(geometry: PxRect, available: PxRect) -> Self {
        Self {
            geometry,
            available,
        }
    }

    pub const fn from_geometry(geometry: PxRect) -> Self {
        Self::new(geometry, geometry)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desktop {
    screens: Vec<Screen>,
    primary: usize,
    virtual_desktop: bool,
    tracks_window: bool,
}

impl Desktop {
    /// Build a desktop from explicit monitors. The first screen is primary.
    /// More than one screen makes it a virtual desktop, where monitors are
    /// resolved by point rather than by widget.
    pub fn new(screens: Vec<Screen>) -> Self {
        if screens.is_empty() {
            return Self::new(vec![Screen::from_geometry(PxRect::new(
                0,
                0,
                FALLBACK_SCREEN_WIDTH,
                FALLBACK_SCREEN_HEIGHT,
            ))]);
        }
        let virtual_desktop = screens.len() > 1;
        Self {
            screens,
            primary: 0,
            virtual_desktop,
            tracks_window: false,
        }
    }

    /// A single screen exactly the size of the hosting window. It follows
    /// the window through [`Desktop::track_window`].
    pub fn single(window: Size) -> Self {
        let mut desktop = Self::new(vec![Screen::from_geometry(PxRect::new(
            0,
            0,
            window.width,
            window.height,
        ))]);
        desktop.tracks_window = true;
        desktop
    }

    pub fn with_primary(mut self, primary: usize) -> Self {
        if primary < self.screens.len() {
            self.primary = primary;
        }
        self
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn primary(&self) -> &Screen {
        &self.screens[self.primary]
    }

    pub fn is_virtual(&self) -> bool {
        self.virtual_desktop
    }

    pub fn tracks_window(&self) -> bool {
        self.tracks_window
    }

    /// Resize the single window-sized screen; no-op for explicit layouts.
    pub fn track_window(&mut self, window: Size) {
        if !self.tracks_window {
            return;
        }
        let rect = PxRect::new(0, 0, window.width, window.height);
        self.screens = vec![Screen::from_geometry(rect)];
        self.primary = 0;
    }

    pub fn screen_at(&self, point: Point) -> Option<usize> {
        self.screens
            .iter()
            .position(|screen| screen.geometry.contains(point))
    }

    /// Screen that shows the largest part of `rect`.
    pub fn screen_for_rect(&self, rect: PxRect) -> Option<usize> {
        self.screens
            .iter()
            .enumerate()
            .map(|(idx, screen)| (idx, screen.geometry.overlap_area(&rect)))
            .filter(|(_, area)| *area > 0)
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(idx, _)| idx)
    }

    /// Monitor used to place a popup anchored at `anchor` for `widget`.
    ///
    /// On a virtual desktop the monitor under the anchor wins; otherwise, or
    /// when the anchor is off every monitor, the monitor showing most of the
    /// widget. The primary screen is the last resort.
    pub fn resolve_for_anchor(&self, anchor: Point, widget: PxRect) -> &Screen {
        let by_point = if self.virtual_desktop {
            self.screen_at(anchor)
        } else {
            None
        };
        let idx = by_point
            .or_else(|| self.screen_for_rect(widget))
            .unwrap_or(self.primary);
        &self.screens[idx]
    }
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dual() -> Desktop {
        Desktop::new(vec![
            Screen::from_geometry(PxRect::new(0, 0, 2560, 1440)),
            Screen::new(
                PxRect::new(-1920, 0, 1920, 1080),
                PxRect::new(-1920, 0, 1920, 1040),
            ),
        ])
    }

    #[test]
    fn anchors_map_to_the_monitor_under_them() {
        let desktop = dual();
        assert!(desktop.is_virtual());
        assert_eq!(desktop.screen_at(Point::new(-10, 100)), Some(1));
        assert_eq!(desktop.screen_at(Point::new(200, 100)), Some(0));
        assert_eq!(desktop.screen_at(Point::new(-10, 1200)), None);
        let widget = PxRect::new(-100, 10, 88, 48);
        let screen = desktop.resolve_for_anchor(Point::new(-100, 10), widget);
        assert_eq!(screen.available, PxRect::new(-1920, 0, 1920, 1040));
    }

    #[test]
    fn anchor_off_every_monitor_falls_back_to_widget_overlap() {
        let desktop = dual();
        // Anchor sits in the dead zone below the short left monitor but the
        // widget mostly overlaps the right one.
        let widget = PxRect::new(-10, 1070, 88, 48);
        let screen = desktop.resolve_for_anchor(Point::new(-10, 1090), widget);
        assert_eq!(screen.geometry, PxRect::new(0, 0, 2560, 1440));
    }

    #[test]
    fn nothing_matches_uses_primary() {
        let desktop = dual().with_primary(1);
        let widget = PxRect::new(9000, 9000, 10, 10);
        let screen = desktop.resolve_for_anchor(Point::new(9000, 9000), widget);
        assert_eq!(screen.geometry, PxRect::new(-1920, 0, 1920, 1080));
    }

    #[test]
    fn empty_desktop_gets_a_fallback_screen() {
        let desktop = Desktop::new(Vec::new());
        assert_eq!(desktop.screens().len(), 1);
        assert!(!desktop.is_virtual());
        assert_eq!(
            desktop.primary().geometry,
            PxRect::new(0, 0, FALLBACK_SCREEN_WIDTH, FALLBACK_SCREEN_HEIGHT)
        );
    }

    #[test]
    fn window_sized_desktop_follows_resizes() {
        let mut desktop = Desktop::single(Size::new(640, 480));
        desktop.track_window(Size::new(800, 600));
        assert_eq!(desktop.primary().geometry, PxRect::new(0, 0, 800, 600));

        let mut fixed = dual();
        fixed.track_window(Size::new(1, 1));
        assert_eq!(fixed.screens().len(), 2);
    }
}
