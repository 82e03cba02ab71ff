//! Owns the container together with the services its widgets share: the
//! timer queue, the signal outbox and the desktop layout.
//!
//! Every entry point follows the same order: dispatch, then drain the
//! outbox until it is empty, so a signal raised while handling another one
//! is still processed within the same call.

use std::time::Instant;

use crossterm::event::Event;

use crate::components::{Component, ComponentContext, EventContext};
use crate::container::RemoteViewContainer;
use crate::geometry::Size;
use crate::remote::RemoteView;
use crate::scheduler::Scheduler;
use crate::screens::Desktop;
use crate::signals::{Outbox, TimerTask, UiSignal};
use crate::ui::UiFrame;

/// Borrow the session's shared services as an [`EventContext`].
macro_rules! event_context {
    ($session:expr) => {
        EventContext::new(
            &mut $session.timers,
            &mut $session.signals,
            &$session.desktop,
            $session.ctx,
        )
    };
}

#[derive(Debug)]
pub struct ViewerSession<V: RemoteView> {
    container: RemoteViewContainer<V>,
    timers: Scheduler<TimerTask>,
    signals: Outbox<UiSignal>,
    desktop: Desktop,
    ctx: ComponentContext,
}

impl<V: RemoteView> ViewerSession<V> {
    pub fn new(
        container: RemoteViewContainer<V>,
        desktop: Desktop,
        ctx: ComponentContext,
        now: Instant,
    ) -> Self {
        Self {
            container,
            timers: Scheduler::new(now),
            signals: Outbox::new(),
            desktop,
            ctx,
        }
    }

    pub fn container(&self) -> &RemoteViewContainer<V> {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut RemoteViewContainer<V> {
        &mut self.container
    }

    pub fn timers(&self) -> &Scheduler<TimerTask> {
        &self.timers
    }

    pub fn desktop(&self) -> &Desktop {
        &self.desktop
    }

    pub fn context(&self) -> ComponentContext {
        self.ctx
    }

    pub fn now(&self) -> Instant {
        self.timers.now()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn should_quit(&self) -> bool {
        self.container.quit_requested()
    }

    /// Resize to a terminal of `columns` x `rows` cells.
    pub fn resize_cells(&mut self, columns: u16, rows: u16) {
        let size = self.ctx.metrics().cells_to_px(columns, rows);
        self.resize(size);
    }

    pub fn resize(&mut self, size: Size) {
        self.desktop.track_window(size);
        self.container.resize(size, &self.ctx);
        tracing::debug!(width = size.width, height = size.height, "viewer resized");
    }

    pub fn start_connection(&mut self) {
        let mut cx = event_context!(self);
        self.container.start_connection(&mut cx);
    }

    pub fn reveal_toolbar(&mut self) {
        self.container.reveal_toolbar(&mut self.timers);
    }

    pub fn handle_event(&mut self, event: &Event) -> bool {
        let consumed = match event {
            Event::Resize(columns, rows) => {
                self.resize_cells(*columns, *rows);
                true
            }
            Event::FocusGained => {
                self.ctx = self.ctx.with_focus(true);
                false
            }
            _ => {
                if matches!(event, Event::FocusLost) {
                    self.ctx = self.ctx.with_focus(false);
                }
                let mut cx = event_context!(self);
                self.container.handle_event(event, &mut cx)
            }
        };
        self.drain_signals();
        consumed
    }

    /// Fire due timers, then take whatever the remote side has ready.
    pub fn tick(&mut self, now: Instant) {
        while let Some((_, task)) = self.timers.pop_due(now) {
            let mut cx = event_context!(self);
            self.container.fire_timer(task, &mut cx);
            self.drain_signals();
        }
        self.timers.settle(now);
        let mut cx = event_context!(self);
        self.container.poll_remote(&mut cx);
        self.drain_signals();
    }

    fn drain_signals(&mut self) {
        while let Some(signal) = self.signals.pop() {
            let mut cx = event_context!(self);
            self.container.route_signal(signal, &mut cx);
        }
    }

    pub fn take_title_change(&mut self) -> Option<String> {
        self.container.take_title_change()
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let ctx = self.ctx;
        self.container.render(frame, &ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::toolbar::{ButtonRole, ViewFlags};
    use crate::icons::IconSet;
    use crate::remote::TestPatternView;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use std::time::Duration;

    fn session(delay_ms: u64) -> ViewerSession<TestPatternView> {
        let remote = TestPatternView::new(Duration::from_millis(delay_ms), Some("carol".into()));
        let container = RemoteViewContainer::new(
            remote,
            IconSet::blank(),
            "lab-pc-07",
            ViewFlags {
                key_interception: true,
                ..ViewFlags::default()
            },
        );
        let mut s = ViewerSession::new(
            container,
            Desktop::single(Size::new(1, 1)),
            ComponentContext::default(),
            Instant::now(),
        );
        s.resize_cells(100, 30);
        s
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    /// Cell at the center of a toolbar button.
    fn button_cell(s: &ViewerSession<TestPatternView>, role: ButtonRole) -> (u16, u16) {
        let rect = s.container().toolbar().button_for(role).unwrap().bounds();
        (
            ((rect.x + rect.width / 2) / 8) as u16,
            ((rect.y + rect.height / 2) / 16) as u16,
        )
    }

    #[test]
    fn resize_tracks_window_screen_and_recenters_toolbar() {
        let s = session(0);
        assert_eq!(s.desktop().primary().geometry.width, 800);
        assert_eq!(s.container().toolbar().position().x, (800 - 656) / 2);
    }

    #[test]
    fn clicking_connect_runs_the_whole_round_trip() {
        let mut s = session(200);
        let (col, row) = button_cell(&s, ButtonRole::Connect);
        s.handle_event(&mouse(MouseEventKind::Moved, col, row));
        assert!(s.container().toolbar().is_visible());
        assert!(s.container().tooltip().is_some());
        s.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), col, row));
        assert!(s.container().tooltip().is_none(), "press closes the tooltip");
        s.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), col, row));

        let t0 = s.now();
        s.tick(t0);
        assert!(s.container().toolbar().is_connecting());
        s.tick(t0 + Duration::from_millis(100));
        assert!(s.container().toolbar().is_connecting());
        s.tick(t0 + Duration::from_millis(250));
        assert!(!s.container().toolbar().is_connecting());
        assert!(s.container().has_frame());
        assert_eq!(s.take_title_change().as_deref(), Some("lab-pc-07 - carol"));

        // Settled: nothing left ticking once the hover fade is done.
        s.tick(t0 + Duration::from_secs(5));
        assert!(s.next_deadline().is_none());
    }

    #[test]
    fn leaving_the_toolbar_hides_it_and_closes_the_tooltip() {
        let mut s = session(0);
        let (col, row) = button_cell(&s, ButtonRole::Quit);
        s.handle_event(&mouse(MouseEventKind::Moved, col, row));
        assert!(s.container().tooltip().is_some());
        s.handle_event(&mouse(MouseEventKind::Moved, 50, 25));
        assert!(!s.container().toolbar().is_visible());
        assert!(s.container().tooltip().is_none());
    }

    #[test]
    fn quit_button_requests_quit() {
        let mut s = session(0);
        let (col, row) = button_cell(&s, ButtonRole::Quit);
        s.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), col, row));
        s.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), col, row));
        assert!(s.should_quit());
    }

    #[test]
    fn view_only_click_removes_key_button() {
        let mut s = session(0);
        let (col, row) = button_cell(&s, ButtonRole::ViewOnly);
        s.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), col, row));
        s.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), col, row));
        assert!(s.container().is_view_only());
        assert!(s.container().toolbar().handle_for(ButtonRole::KeyInterception).is_none());
    }
}
