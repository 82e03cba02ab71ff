//! Fixed-size toolbar button with a hover cross-fade and a hover tooltip.
//!
//! The fade is a chain of single-shot steps: each step moves the colorize
//! level ten units toward its target and re-arms only while the target has
//! not been reached. Entering or leaving flips the direction of a chain that
//! is already running instead of starting a second one.

use ratatui::style::{Modifier, Style};

use crate::colors::Rgb;
use crate::components::raster::RasterImage;
use crate::components::tooltip::{HoverTooltip, tooltips_disabled};
use crate::components::{Component, ComponentContext, EventContext};
use crate::constants::{
    BUTTON_CORNER_RADIUS, BUTTON_HEIGHT, BUTTON_ICON_SIZE, BUTTON_ICON_TOP, BUTTON_WIDTH,
    FADE_INTERVAL, FADE_STEP,
};
use crate::geometry::{Point, PxRect, Size, rounded_rect_contains};
use crate::scheduler::{Scheduler, TimerId};
use crate::signals::{TimerTask, UiSignal};
use crate::theme;
use crate::ui::{UiFrame, set_centered_string};

/// Stable reference to a button slot. A handle outlives its button; lookups
/// through a handle whose slot has been reused simply fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonHandle {
    index: u32,
    generation: u32,
}

impl ButtonHandle {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn index(&self) -> usize {
        self.index as usize
    }

    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Icon and label shown instead of the regular ones while busy.
#[derive(Debug, Clone)]
struct BusyFace {
    icon: RasterImage,
    label: String,
}

#[derive(Debug)]
pub struct AnimatedButton {
    handle: ButtonHandle,
    bounds: PxRect,
    icon: RasterImage,
    tooltip_icon: RasterImage,
    label: String,
    title: String,
    description: String,
    colorize_level: u8,
    fading_out: bool,
    fade_timer: Option<TimerId>,
    checkable: bool,
    checked: bool,
    down: bool,
    busy: Option<BusyFace>,
}

impl AnimatedButton {
    pub fn new(
        handle: ButtonHandle,
        icon: RasterImage,
        tooltip_icon: RasterImage,
        label: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            handle,
            bounds: PxRect::new(0, 0, BUTTON_WIDTH, BUTTON_HEIGHT),
            icon,
            tooltip_icon,
            label: label.into(),
            title: title.into(),
            description: description.into(),
            colorize_level: 0,
            fading_out: false,
            fade_timer: None,
            checkable: false,
            checked: false,
            down: false,
            busy: None,
        }
    }

    pub fn with_checkable(mut self, checked: bool) -> Self {
        self.checkable = true;
        self.checked = checked;
        self
    }

    pub fn handle(&self) -> ButtonHandle {
        self.handle
    }

    /// Window-local bounds.
    pub fn bounds(&self) -> PxRect {
        self.bounds
    }

    /// Move the button; its size is fixed.
    pub fn move_to(&mut self, origin: Point) {
        self.bounds = PxRect::new(origin.x, origin.y, BUTTON_WIDTH, BUTTON_HEIGHT);
    }

    pub fn colorize_level(&self) -> u8 {
        self.colorize_level
    }

    pub fn fading_out(&self) -> bool {
        self.fading_out
    }

    pub fn fade_pending(&self) -> bool {
        self.fade_timer.is_some()
    }

    pub fn is_checkable(&self) -> bool {
        self.checkable
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        if self.checkable {
            self.checked = checked;
        }
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_some()
    }

    /// Label currently painted, which is the busy label while busy.
    pub fn label(&self) -> &str {
        self.busy
            .as_ref()
            .map_or(self.label.as_str(), |face| face.label.as_str())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_busy(&mut self, icon: RasterImage, label: impl Into<String>) {
        self.busy = Some(BusyFace {
            icon,
            label: label.into(),
        });
    }

    pub fn clear_busy(&mut self) {
        self.busy = None;
        self.icon.set_desaturation(0);
    }

    /// Gray out the painted icon; drives the connection pulse.
    pub fn set_icon_desaturation(&mut self, amount: u8) {
        match self.busy.as_mut() {
            Some(face) => face.icon.set_desaturation(amount),
            None => self.icon.set_desaturation(amount),
        }
    }

    pub fn icon_desaturation(&self) -> u8 {
        self.busy
            .as_ref()
            .map_or(self.icon.desaturation(), |face| face.icon.desaturation())
    }

    /// Hit test against the rounded shape, in window-local pixels.
    pub fn contains(&self, p: Point) -> bool {
        rounded_rect_contains(
            self.bounds.size(),
            BUTTON_CORNER_RADIUS,
            p - self.bounds.origin(),
        )
    }

    /// One fade tick. Re-arms itself until the level reaches the bound the
    /// current direction points at.
    pub fn fade_step(&mut self, timers: &mut Scheduler<TimerTask>) {
        self.fade_timer = None;
        let done = if self.fading_out {
            self.colorize_level = self.colorize_level.saturating_sub(FADE_STEP);
            self.colorize_level == 0
        } else {
            self.colorize_level = self.colorize_level.saturating_add(FADE_STEP);
            self.colorize_level == u8::MAX
        };
        if !done {
            self.fade_timer =
                Some(timers.single_shot(FADE_INTERVAL, TimerTask::FadeStep(self.handle)));
        }
    }

    /// Point the fade at the current hover state and start a chain if none
    /// is running and the level is not already there.
    pub fn resume_fade(&mut self, hovered: bool, timers: &mut Scheduler<TimerTask>) {
        self.fading_out = !hovered;
        let target = if hovered { u8::MAX } else { 0 };
        if self.fade_timer.is_none() && self.colorize_level != target {
            self.fade_step(timers);
        }
    }

    pub fn cancel_fade(&mut self, timers: &mut Scheduler<TimerTask>) {
        if let Some(id) = self.fade_timer.take() {
            timers.cancel(id);
        }
    }

    /// Pressing counts as leaving for the tooltip: it closes.
    pub fn press(&mut self, cx: &mut EventContext<'_>) {
        cx.signals.emit(UiSignal::ButtonPointerLeft(self.handle));
        self.down = true;
    }

    /// Finish a press. Only a release over the button activates it.
    pub fn release(&mut self, over: bool, cx: &mut EventContext<'_>) {
        if !self.down {
            return;
        }
        self.down = false;
        if over {
            if self.checkable {
                self.checked = !self.checked;
            }
            cx.signals.emit(UiSignal::ButtonActivated(self.handle));
        }
    }

    pub fn cancel_press(&mut self) {
        self.down = false;
    }

    fn spawn_tooltip(&self, cx: &EventContext<'_>) -> Option<HoverTooltip> {
        if tooltips_disabled() || self.title.is_empty() || self.description.is_empty() {
            return None;
        }
        let anchor = cx.ui.to_global(self.bounds.origin());
        let widget = self.bounds.translated(cx.ui.window_origin());
        let screen = cx.desktop.resolve_for_anchor(anchor, widget);
        let mut tooltip = HoverTooltip::new(
            self.handle,
            widget,
            self.tooltip_icon.clone(),
            self.title.clone(),
            self.description.clone(),
            &cx.ui.text(),
        );
        tooltip.place(anchor, screen.available);
        tracing::debug!(title = %self.title, bounds = ?tooltip.bounds(), "tooltip spawned");
        Some(tooltip)
    }

    fn face_color(&self, t: f32) -> Rgb {
        let base = theme::BUTTON_NORMAL_RAMP
            .at(t)
            .blend(theme::BUTTON_HIGHLIGHT_RAMP.at(t), self.colorize_level);
        if self.down || self.checked {
            base.blend(Rgb::BLACK, theme::BUTTON_ACTIVE_VEIL)
        } else {
            base
        }
    }
}

impl Component for AnimatedButton {
    fn resize(&mut self, bounds: PxRect, _ctx: &ComponentContext) {
        self.move_to(bounds.origin());
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, ctx: &ComponentContext) {
        let metrics = ctx.metrics();
        let cells = metrics.px_to_cells(self.bounds);
        let Some(visible) = cells.clip(frame.area()) else {
            return;
        };
        let size = Size::new(BUTTON_WIDTH, BUTTON_HEIGHT);
        let last_row = cells.y + cells.height as i32 - 1;
        {
            let buffer = frame.buffer_mut();
            for y in visible.top()..visible.bottom() {
                for x in visible.left()..visible.right() {
                    let cell_px = metrics.cell_px(x as i32, y as i32);
                    let center = Point::new(
                        cell_px.x + cell_px.width / 2,
                        cell_px.y + cell_px.height / 2,
                    ) - self.bounds.origin();
                    if !rounded_rect_contains(size, BUTTON_CORNER_RADIUS, center) {
                        continue;
                    }
                    let t = center.y as f32 / BUTTON_HEIGHT as f32;
                    let mut color = self.face_color(t);
                    if y as i32 == cells.y {
                        color = color.blend(Rgb::WHITE, theme::BUTTON_EDGE_ALPHA);
                    } else if y as i32 == last_row {
                        color = color.blend(Rgb::BLACK, theme::BUTTON_EDGE_ALPHA);
                    }
                    if let Some(cell) = buffer.cell_mut((x, y)) {
                        cell.reset();
                        cell.set_bg(color.to_color());
                    }
                }
            }
        }

        let shift = if self.down { 1 } else { 0 };
        let icon_px = PxRect::new(
            self.bounds.x + (BUTTON_WIDTH - BUTTON_ICON_SIZE as i32) / 2 + shift,
            self.bounds.y + BUTTON_ICON_TOP + shift,
            BUTTON_ICON_SIZE as i32,
            BUTTON_ICON_SIZE as i32,
        );
        if let Some(icon_area) = metrics.px_to_cells(icon_px).clip(visible) {
            let icon = match self.busy.as_mut() {
                Some(face) => &mut face.icon,
                None => &mut self.icon,
            };
            icon.render(frame, icon_area);
        }

        if last_row >= visible.top() as i32 && last_row < visible.bottom() as i32 {
            let style = Style::default()
                .fg(theme::BUTTON_LABEL_RGB.to_color())
                .add_modifier(Modifier::BOLD);
            let label = self.label().to_string();
            set_centered_string(frame.buffer_mut(), visible, last_row as u16, &label, style);
        }
    }

    fn pointer_enter(&mut self, cx: &mut EventContext<'_>) {
        self.fading_out = false;
        if self.colorize_level == 0 && self.fade_timer.is_none() {
            self.fade_step(cx.timers);
        }
        if let Some(tooltip) = self.spawn_tooltip(cx) {
            cx.signals.emit(UiSignal::ShowTooltip(Box::new(tooltip)));
        }
    }

    fn pointer_leave(&mut self, cx: &mut EventContext<'_>) {
        cx.signals.emit(UiSignal::ButtonPointerLeft(self.handle));
        self.fading_out = true;
        if self.colorize_level == u8::MAX && self.fade_timer.is_none() {
            self.fade_step(cx.timers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::Desktop;
    use crate::signals::Outbox;
    use std::time::{Duration, Instant};

    struct Harness {
        timers: Scheduler<TimerTask>,
        signals: Outbox<UiSignal>,
        desktop: Desktop,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                timers: Scheduler::new(Instant::now()),
                signals: Outbox::new(),
                desktop: Desktop::default(),
            }
        }

        fn cx(&mut self) -> EventContext<'_> {
            EventContext::new(
                &mut self.timers,
                &mut self.signals,
                &self.desktop,
                ComponentContext::default(),
            )
        }

        /// Fire every due fade step up to `ms` from now.
        fn run_for(&mut self, button: &mut AnimatedButton, ms: u64) -> usize {
            let until = self.timers.now() + Duration::from_millis(ms);
            let mut fired = 0;
            while let Some((_, task)) = self.timers.pop_due(until) {
                assert_eq!(task, TimerTask::FadeStep(button.handle()));
                button.fade_step(&mut self.timers);
                fired += 1;
            }
            self.timers.settle(until);
            fired
        }
    }

    fn button() -> AnimatedButton {
        AnimatedButton::new(
            ButtonHandle::new(0, 0),
            RasterImage::new(),
            RasterImage::new(),
            "Quit",
            "",
            "",
        )
    }

    #[test]
    fn hover_fades_up_monotonically_and_stops() {
        let mut h = Harness::new();
        let mut b = button();
        b.pointer_enter(&mut h.cx());
        assert_eq!(b.colorize_level(), 10);
        let mut last = b.colorize_level();
        for _ in 0..40 {
            h.run_for(&mut b, 10);
            assert!(b.colorize_level() >= last);
            last = b.colorize_level();
        }
        assert_eq!(b.colorize_level(), 255);
        assert!(!b.fade_pending());
        assert!(h.timers.is_empty());
    }

    #[test]
    fn leave_mid_fade_reverses_the_same_chain() {
        let mut h = Harness::new();
        let mut b = button();
        b.pointer_enter(&mut h.cx());
        h.run_for(&mut b, 50);
        let peak = b.colorize_level();
        assert_eq!(peak, 60);
        b.pointer_leave(&mut h.cx());
        assert_eq!(h.timers.len(), 1, "no second chain");
        h.run_for(&mut b, 1000);
        assert_eq!(b.colorize_level(), 0);
        assert!(h.timers.is_empty());
    }

    #[test]
    fn leave_at_full_level_starts_fade_out() {
        let mut h = Harness::new();
        let mut b = button();
        b.pointer_enter(&mut h.cx());
        h.run_for(&mut b, 1000);
        b.pointer_leave(&mut h.cx());
        assert_eq!(b.colorize_level(), 245);
        assert!(b.fading_out());
        let steps = h.run_for(&mut b, 1000);
        assert_eq!(steps, 25);
        assert_eq!(b.colorize_level(), 0);
    }

    #[test]
    fn off_grid_levels_clamp_in_a_single_short_step() {
        let mut h = Harness::new();
        let mut b = button();
        b.colorize_level = 5;
        b.fading_out = true;
        b.fade_step(&mut h.timers);
        assert_eq!(b.colorize_level(), 0);
        assert!(!b.fade_pending());
        assert!(h.timers.is_empty());

        b.colorize_level = 250;
        b.fading_out = false;
        b.fade_step(&mut h.timers);
        assert_eq!(b.colorize_level(), 255);
        assert!(!b.fade_pending());
        assert!(h.timers.is_empty());
    }

    #[test]
    fn off_grid_start_still_ends_exactly_on_the_bound() {
        let mut h = Harness::new();
        let mut b = button();
        b.colorize_level = 137;
        b.pointer_leave(&mut h.cx());
        assert!(b.fading_out());
        assert!(!b.fade_pending());
        b.fade_step(&mut h.timers);
        assert_eq!(b.colorize_level(), 127);
        let steps = h.run_for(&mut b, 1000);
        assert_eq!(steps, 13);
        assert_eq!(b.colorize_level(), 0);
        assert!(h.timers.is_empty());
    }

    #[test]
    fn leave_always_reports_pointer_left() {
        let mut h = Harness::new();
        let mut b = button();
        b.pointer_leave(&mut h.cx());
        assert!(matches!(
            h.signals.pop(),
            Some(UiSignal::ButtonPointerLeft(handle)) if handle == b.handle()
        ));
        assert!(h.timers.is_empty(), "level 0 has nothing to fade");
    }

    #[test]
    fn click_activates_and_toggles_checkable() {
        let mut h = Harness::new();
        let mut b = button().with_checkable(false);
        b.press(&mut h.cx());
        assert!(b.is_down());
        b.release(true, &mut h.cx());
        assert!(!b.is_down());
        assert!(b.is_checked());
        let kinds: Vec<_> = h.signals.drain().collect();
        assert!(matches!(kinds[0], UiSignal::ButtonPointerLeft(_)));
        assert!(matches!(kinds[1], UiSignal::ButtonActivated(_)));
    }

    #[test]
    fn release_outside_does_not_activate() {
        let mut h = Harness::new();
        let mut b = button();
        b.press(&mut h.cx());
        b.release(false, &mut h.cx());
        assert!(
            h.signals
                .drain()
                .all(|s| !matches!(s, UiSignal::ButtonActivated(_)))
        );
    }

    #[test]
    fn resume_fade_heads_for_hover_state() {
        let mut h = Harness::new();
        let mut b = button();
        b.resume_fade(false, &mut h.timers);
        assert!(h.timers.is_empty());
        b.resume_fade(true, &mut h.timers);
        h.run_for(&mut b, 1000);
        assert_eq!(b.colorize_level(), 255);
    }

    #[test]
    fn hit_test_uses_rounded_shape() {
        let mut b = button();
        b.move_to(Point::new(100, 0));
        assert!(b.contains(Point::new(144, 24)));
        assert!(!b.contains(Point::new(100, 0)));
        assert!(!b.contains(Point::new(99, 24)));
    }

    #[test]
    fn busy_face_swaps_label() {
        let mut b = button();
        b.set_busy(RasterImage::new(), "Connecting");
        assert_eq!(b.label(), "Connecting");
        b.set_icon_desaturation(200);
        assert_eq!(b.icon_desaturation(), 200);
        b.clear_busy();
        assert_eq!(b.label(), "Quit");
    }
}
