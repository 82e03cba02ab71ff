//! Top-level remote view window: one remote surface, the overlay toolbar
//! above it, a single tooltip popup slot and the status line.
//!
//! The container is the only place that reacts to [`UiSignal`]s. Widgets
//! report what happened; the container decides what it means for the
//! session.

use crossterm::event::{Event, KeyEvent, MouseEventKind};
use ratatui::style::Style;

use crate::components::toolbar::{ButtonRole, ViewFlags};
use crate::components::{
    Component, ComponentContext, EventContext, HoverTooltip, OverlayToolbar, RasterImage,
    StatusBar, ToolbarAction,
};
use crate::constants::STATUS_ROWS;
use crate::geometry::{CellMetrics, Point, PxRect, Size};
use crate::icons::IconSet;
use crate::keybindings::{Action, KeyBindings};
use crate::keys::strokes_for;
use crate::remote::{PointerButtons, RemoteEvent, RemoteView};
use crate::scheduler::Scheduler;
use crate::signals::{TimerTask, UiSignal};
use crate::theme;
use crate::ui::{UiFrame, set_centered_string};

const IDLE_MESSAGE: &str = "Not connected. Move to the top edge and press Connect.";

#[derive(Debug)]
pub struct RemoteViewContainer<V: RemoteView> {
    remote: V,
    frame_view: RasterImage,
    toolbar: OverlayToolbar,
    tooltip: Option<Box<HoverTooltip>>,
    status: StatusBar,
    bindings: KeyBindings,
    host: String,
    size: Size,
    metrics: CellMetrics,
    full_screen: bool,
    key_interception: bool,
    view_only: bool,
    user_label: String,
    title: String,
    title_dirty: bool,
    quit_requested: bool,
    buttons: PointerButtons,
}

impl<V: RemoteView> RemoteViewContainer<V> {
    pub fn new(remote: V, icons: IconSet, host: impl Into<String>, flags: ViewFlags) -> Self {
        let host = host.into();
        let key_interception = flags.key_interception && !flags.view_only;
        let toolbar = OverlayToolbar::new(
            icons,
            host.clone(),
            ViewFlags {
                key_interception,
                ..flags
            },
        );
        let mut frame_view = RasterImage::new();
        frame_view.set_keep_aspect(true);
        let bindings = KeyBindings::default();
        let mut status = StatusBar::new();
        status.set_right(bindings.hint_line());
        let mut container = Self {
            remote,
            frame_view,
            toolbar,
            tooltip: None,
            status,
            bindings,
            host,
            size: Size::default(),
            metrics: CellMetrics::default(),
            full_screen: flags.full_screen,
            key_interception,
            view_only: flags.view_only,
            user_label: String::new(),
            title: String::new(),
            title_dirty: true,
            quit_requested: false,
            buttons: PointerButtons::NONE,
        };
        container.title = container.window_title();
        container
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn remote(&self) -> &V {
        &self.remote
    }

    pub fn remote_mut(&mut self) -> &mut V {
        &mut self.remote
    }

    pub fn toolbar(&self) -> &OverlayToolbar {
        &self.toolbar
    }

    pub fn tooltip(&self) -> Option<&HoverTooltip> {
        self.tooltip.as_deref()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    pub fn key_interception(&self) -> bool {
        self.key_interception
    }

    pub fn is_view_only(&self) -> bool {
        self.view_only
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn user_label(&self) -> &str {
        &self.user_label
    }

    pub fn has_frame(&self) -> bool {
        !self.frame_view.is_empty()
    }

    /// Keys reach the remote side only with interception on and input
    /// allowed.
    pub fn forwards_keys(&self) -> bool {
        self.key_interception && !self.view_only
    }

    /// Window-local rectangle of the remote surface.
    pub fn view_rect(&self) -> PxRect {
        let inset = if self.full_screen {
            0
        } else {
            STATUS_ROWS as i32 * self.metrics.cell_height() as i32
        };
        PxRect::new(0, 0, self.size.width, (self.size.height - inset).max(0))
    }

    fn status_rect(&self) -> PxRect {
        let view = self.view_rect();
        PxRect::new(0, view.bottom(), self.size.width, self.size.height - view.height)
    }

    pub fn resize(&mut self, size: Size, ctx: &ComponentContext) {
        self.size = size;
        self.metrics = ctx.metrics();
        self.toolbar.update_position(size);
        self.relayout(ctx);
    }

    fn relayout(&mut self, ctx: &ComponentContext) {
        let status = self.status_rect();
        self.status.resize(status, ctx);
        self.remote.resize(self.view_rect().size());
        self.sync_tooltip_anchor(ctx);
    }

    /// Switch presentation only; the session itself is untouched.
    pub fn toggle_full_screen(&mut self, enabled: bool) {
        if self.full_screen == enabled {
            return;
        }
        self.full_screen = enabled;
        self.toolbar.set_checked(ButtonRole::FullScreen, enabled);
        let ctx = ComponentContext::new(self.metrics);
        let status = self.status_rect();
        self.status.resize(status, &ctx);
        self.remote.resize(self.view_rect().size());
        tracing::info!(enabled, "full screen toggled");
    }

    pub fn set_key_interception(&mut self, enabled: bool) {
        if self.key_interception == enabled {
            return;
        }
        self.key_interception = enabled;
        self.toolbar.set_checked(ButtonRole::KeyInterception, enabled);
        tracing::info!(enabled, "key interception toggled");
    }

    pub fn set_view_only(&mut self, enabled: bool, timers: &mut Scheduler<TimerTask>) {
        if self.view_only == enabled {
            return;
        }
        self.view_only = enabled;
        self.toolbar
            .set_view_only(enabled, self.key_interception, timers);
        tracing::info!(enabled, "view only toggled");
    }

    /// Ask the remote side to connect. The toolbar follows once the remote
    /// reports that it started.
    pub fn start_connection(&mut self, cx: &mut EventContext<'_>) {
        self.remote.start_connection(cx.timers.now());
    }

    pub fn reveal_toolbar(&mut self, timers: &mut Scheduler<TimerTask>) {
        self.toolbar.reveal(timers);
    }

    /// Viewer hot-keys. Returns true when the key is handled locally and
    /// must not reach the remote side.
    pub fn check_key_event(&mut self, key: &KeyEvent) -> bool {
        match self.bindings.action_for_key(key) {
            Some(Action::ToggleKeyInterception) => {
                self.set_key_interception(!self.key_interception);
                true
            }
            Some(Action::ToggleFullScreen) => {
                self.toggle_full_screen(!self.full_screen);
                true
            }
            Some(Action::Quit) if !self.forwards_keys() => {
                self.quit_requested = true;
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if self.check_key_event(key) {
            return true;
        }
        if !self.forwards_keys() {
            return false;
        }
        for stroke in strokes_for(key) {
            self.remote.send_key(stroke);
        }
        true
    }

    fn forward_pointer(&mut self, p: Point, kind: MouseEventKind) {
        if self.view_only {
            return;
        }
        let view = self.view_rect();
        if !view.contains(p) && self.buttons.is_empty() {
            return;
        }
        let local = p - view.origin();
        match kind {
            MouseEventKind::Down(button) => {
                self.buttons = self.buttons.with(button.into());
                self.remote.send_pointer(local, self.buttons);
            }
            MouseEventKind::Up(button) => {
                self.buttons = self.buttons.without(button.into());
                self.remote.send_pointer(local, self.buttons);
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.remote.send_pointer(local, self.buttons);
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let wheel = if kind == MouseEventKind::ScrollUp {
                    PointerButtons::WHEEL_UP
                } else {
                    PointerButtons::WHEEL_DOWN
                };
                self.remote.send_pointer(local, self.buttons.with(wheel));
                self.remote.send_pointer(local, self.buttons);
            }
            MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => {}
        }
    }

    /// React to one outbox notification.
    pub fn route_signal(&mut self, signal: UiSignal, cx: &mut EventContext<'_>) {
        match signal {
            UiSignal::ButtonActivated(handle) => {
                if let Some(action) = self.toolbar.on_button_activated(handle, cx) {
                    self.apply(action, cx);
                }
            }
            UiSignal::ButtonPointerLeft(handle) => {
                if let Some(tooltip) = self.tooltip.as_mut()
                    && tooltip.anchor() == handle
                {
                    tooltip.close();
                    self.tooltip = None;
                }
            }
            UiSignal::ShowTooltip(tooltip) => {
                if let Some(mut previous) = self.tooltip.replace(tooltip) {
                    previous.close();
                }
            }
        }
        self.sync_tooltip_anchor(&cx.ui);
    }

    fn apply(&mut self, action: ToolbarAction, cx: &mut EventContext<'_>) {
        match action {
            ToolbarAction::Connect => self.start_connection(cx),
            ToolbarAction::ViewOnly(enabled) => self.set_view_only(enabled, cx.timers),
            ToolbarAction::KeyInterception(enabled) => self.set_key_interception(enabled),
            ToolbarAction::FullScreen(enabled) => self.toggle_full_screen(enabled),
            ToolbarAction::Quit => self.quit_requested = true,
        }
    }

    pub fn fire_timer(&mut self, task: TimerTask, cx: &mut EventContext<'_>) {
        match task {
            TimerTask::FadeStep(handle) => self.toolbar.fade_step(handle, cx.timers),
            TimerTask::ConnectPulse => self.toolbar.on_pulse(cx.timers),
            TimerTask::StartupReveal => self.toolbar.end_reveal(cx),
        }
    }

    /// Drain whatever the remote side has ready.
    pub fn poll_remote(&mut self, cx: &mut EventContext<'_>) {
        let now = cx.timers.now();
        while let Some(event) = self.remote.poll_event(now) {
            match event {
                RemoteEvent::ConnectionStarted => {
                    self.toolbar.begin_connecting(cx);
                }
                RemoteEvent::ConnectionEstablished => {
                    self.toolbar.connection_established(cx);
                    self.update_user();
                }
                RemoteEvent::Frame(frame) => {
                    let (width, height) = (frame.width, frame.height);
                    if let Err(err) = self.frame_view.try_set_rgba8(width, height, frame.rgba) {
                        tracing::warn!(%err, "dropping remote frame");
                    }
                }
            }
        }
    }

    /// Refresh the tooltip's anchor rectangle from the live button, or mark
    /// it stale when the button is gone.
    pub fn sync_tooltip_anchor(&mut self, ctx: &ComponentContext) {
        if let Some(tooltip) = self.tooltip.as_mut() {
            let rect = self.toolbar.button_global_rect(tooltip.anchor(), ctx);
            tooltip.sync_anchor(rect);
        }
    }

    pub fn update_user(&mut self) {
        let label = self.remote.session_user().unwrap_or_default();
        if label != self.user_label {
            self.toolbar.set_user(label.clone());
            self.user_label = label;
            self.title_dirty = true;
        }
    }

    pub fn window_title(&self) -> String {
        if self.user_label.is_empty() {
            format!("{} - Remote view", self.host)
        } else {
            format!("{} - {}", self.host, self.user_label)
        }
    }

    /// New window title, once per change.
    pub fn take_title_change(&mut self) -> Option<String> {
        if !self.title_dirty {
            return None;
        }
        self.title_dirty = false;
        self.title = self.window_title();
        Some(self.title.clone())
    }

    fn status_text(&self) -> String {
        let state = if self.toolbar.is_connecting() {
            "connecting".to_string()
        } else if self.user_label.is_empty() {
            if self.has_frame() {
                "connected".to_string()
            } else {
                "not connected".to_string()
            }
        } else {
            format!("connected as {}", self.user_label)
        };
        let mode = if self.view_only {
            " [view only]"
        } else if self.key_interception {
            " [keys captured]"
        } else {
            ""
        };
        format!("{}: {}{}", self.host, state, mode)
    }
}

impl<V: RemoteView> Component for RemoteViewContainer<V> {
    fn resize(&mut self, bounds: PxRect, ctx: &ComponentContext) {
        RemoteViewContainer::resize(self, bounds.size(), ctx);
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, ctx: &ComponentContext) {
        let metrics = ctx.metrics();
        if let Some(view) = metrics.px_to_cells(self.view_rect()).clip(frame.area()) {
            if self.frame_view.is_empty() {
                let style = Style::default().fg(theme::idle_view_fg());
                let y = view.y + view.height / 2;
                set_centered_string(frame.buffer_mut(), view, y, IDLE_MESSAGE, style);
            } else {
                self.frame_view.render(frame, view);
            }
        }
        if !self.full_screen {
            let text = self.status_text();
            self.status.set_left(text);
            self.status.render(frame, ctx);
        }
        self.toolbar.render(frame, ctx);
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.render(frame, ctx);
        }
    }

    fn pointer_leave(&mut self, cx: &mut EventContext<'_>) {
        self.toolbar.pointer_leave(cx);
    }

    fn handle_event(&mut self, event: &Event, cx: &mut EventContext<'_>) -> bool {
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.handle_event(event, cx);
            if tooltip.is_closed() {
                self.tooltip = None;
            }
        }
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                let p = cx.ui.metrics().cell_center(mouse.column, mouse.row);
                let on_toolbar = self.toolbar.handle_pointer(p, mouse.kind, cx);
                // A button held on the remote side keeps its grab across the
                // toolbar until it is released.
                let remote_grab = !self.buttons.is_empty()
                    && !matches!(mouse.kind, MouseEventKind::Down(_));
                if on_toolbar && !remote_grab {
                    return true;
                }
                self.forward_pointer(p, mouse.kind);
                on_toolbar || !self.view_only
            }
            Event::FocusLost => {
                self.pointer_leave(cx);
                false
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::TestPatternView;
    use crate::screens::Desktop;
    use crate::signals::Outbox;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::time::{Duration, Instant};

    fn container(flags: ViewFlags) -> RemoteViewContainer<TestPatternView> {
        let remote = TestPatternView::new(Duration::ZERO, Some("bob".into()));
        let mut c = RemoteViewContainer::new(remote, IconSet::blank(), "lab-pc-07", flags);
        c.resize(Size::new(800, 480), &ComponentContext::default());
        c
    }

    fn key(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn interception_defaults_on_and_hot_keys_are_consumed() {
        let mut c = container(ViewFlags {
            key_interception: true,
            ..ViewFlags::default()
        });
        assert!(c.forwards_keys());
        let toggle = key(KeyCode::Char('k'), KeyModifiers::CONTROL | KeyModifiers::ALT);
        assert!(c.check_key_event(&toggle));
        assert!(!c.key_interception());
        assert!(c.check_key_event(&toggle));
        assert!(c.key_interception());
        assert!(c.check_key_event(&key(KeyCode::F(11), KeyModifiers::NONE)));
        assert!(c.is_full_screen());
        assert!(!c.check_key_event(&key(KeyCode::Char('x'), KeyModifiers::NONE)));
    }

    #[test]
    fn ctrl_q_quits_only_without_interception() {
        let quit = key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        let mut c = container(ViewFlags {
            key_interception: true,
            ..ViewFlags::default()
        });
        assert!(!c.check_key_event(&quit));
        assert!(!c.quit_requested());
        c.set_key_interception(false);
        assert!(c.check_key_event(&quit));
        assert!(c.quit_requested());
    }

    #[test]
    fn view_only_disables_interception() {
        let c = container(ViewFlags {
            view_only: true,
            key_interception: true,
            ..ViewFlags::default()
        });
        assert!(!c.key_interception());
        assert!(!c.forwards_keys());
    }

    #[test]
    fn full_screen_drops_status_inset() {
        let mut c = container(ViewFlags::default());
        assert_eq!(c.view_rect(), PxRect::new(0, 0, 800, 464));
        assert_eq!(c.remote().view_size(), Size::new(800, 464));
        c.toggle_full_screen(true);
        assert_eq!(c.view_rect(), PxRect::new(0, 0, 800, 480));
        assert_eq!(c.remote().view_size(), Size::new(800, 480));
        assert!(
            c.toolbar()
                .button_for(ButtonRole::FullScreen)
                .unwrap()
                .is_checked()
        );
    }

    #[test]
    fn title_follows_session_user() {
        let mut c = container(ViewFlags::default());
        assert_eq!(c.take_title_change().as_deref(), Some("lab-pc-07 - Remote view"));
        assert_eq!(c.take_title_change(), None);

        let mut timers = Scheduler::new(Instant::now());
        let mut signals = Outbox::new();
        let desktop = Desktop::default();
        let mut cx = EventContext::new(
            &mut timers,
            &mut signals,
            &desktop,
            ComponentContext::default(),
        );
        c.start_connection(&mut cx);
        c.poll_remote(&mut cx);
        assert!(!c.toolbar().is_connecting());
        assert!(c.has_frame());
        assert_eq!(c.user_label(), "bob");
        assert_eq!(c.take_title_change().as_deref(), Some("lab-pc-07 - bob"));
    }
}
