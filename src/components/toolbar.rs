//! Floating, auto-hiding control strip shown above the remote view.
//!
//! The toolbar appears while the pointer is inside its activation region (a
//! thin strip along the window's top edge, or the toolbar itself) and hides
//! the moment a pointer event lands outside both. It owns its buttons in a
//! generational table so tooltips and deferred fade steps can refer to a
//! button without keeping it alive.

use std::time::Instant;

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::style::{Modifier, Style};

use crate::components::button::{AnimatedButton, ButtonHandle};
use crate::components::{Component, ComponentContext, EventContext};
use crate::constants::{
    ACTIVATION_STRIP_HEIGHT, BUTTON_HEIGHT, BUTTON_WIDTH, CONNECT_PULSE_INTERVAL,
    CONNECT_PULSE_PERIOD_MS, STARTUP_REVEAL, TOOLBAR_CAPTION_WIDTH, TOOLBAR_PADDING_X,
    TOOLBAR_PADDING_Y, TOOLBAR_SPACING, TOOLBAR_TOP_MARGIN,
};
use crate::geometry::{Point, PxRect, Size};
use crate::icons::{IconKind, IconSet};
use crate::scheduler::{Scheduler, TimerId};
use crate::signals::TimerTask;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

const BUSY_LABEL: &str = "Connecting";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ButtonRole {
    Connect,
    ViewOnly,
    KeyInterception,
    FullScreen,
    Quit,
}

impl ButtonRole {
    pub const ALL: [ButtonRole; 5] = [
        ButtonRole::Connect,
        ButtonRole::ViewOnly,
        ButtonRole::KeyInterception,
        ButtonRole::FullScreen,
        ButtonRole::Quit,
    ];

    fn icon(self) -> IconKind {
        match self {
            ButtonRole::Connect => IconKind::Connect,
            ButtonRole::ViewOnly => IconKind::ViewOnly,
            ButtonRole::KeyInterception => IconKind::Keyboard,
            ButtonRole::FullScreen => IconKind::FullScreen,
            ButtonRole::Quit => IconKind::Quit,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ButtonRole::Connect => "Connect",
            ButtonRole::ViewOnly => "View only",
            ButtonRole::KeyInterception => "Keys",
            ButtonRole::FullScreen => "Full screen",
            ButtonRole::Quit => "Quit",
        }
    }

    fn title(self) -> &'static str {
        match self {
            ButtonRole::Connect => "Connect",
            ButtonRole::ViewOnly => "View only mode",
            ButtonRole::KeyInterception => "Capture keyboard",
            ButtonRole::FullScreen => "Full screen",
            ButtonRole::Quit => "Quit",
        }
    }

    fn description(self) -> &'static str {
        match self {
            ButtonRole::Connect => "Open a session to the remote computer.",
            ButtonRole::ViewOnly => {
                "Watch the remote screen without sending any keyboard or mouse input."
            }
            ButtonRole::KeyInterception => {
                "Send every key, shortcuts included, to the remote computer. Ctrl+Alt+K toggles."
            }
            ButtonRole::FullScreen => {
                "Hide the status line and use the whole terminal. F11 toggles."
            }
            ButtonRole::Quit => "Close the remote view.",
        }
    }

    fn checkable(self) -> bool {
        matches!(
            self,
            ButtonRole::ViewOnly | ButtonRole::KeyInterception | ButtonRole::FullScreen
        )
    }
}

/// What the owner should do after a button was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Connect,
    ViewOnly(bool),
    KeyInterception(bool),
    FullScreen(bool),
    Quit,
}

/// Initial checked state of the toggle buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFlags {
    pub view_only: bool,
    pub key_interception: bool,
    pub full_screen: bool,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    button: Option<AnimatedButton>,
}

/// Generational slot table. Removing a button bumps its slot's generation,
/// which invalidates every handle issued for it.
#[derive(Debug, Default)]
pub struct ButtonTable {
    slots: Vec<Slot>,
}

impl ButtonTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_with(
        &mut self,
        build: impl FnOnce(ButtonHandle) -> AnimatedButton,
    ) -> ButtonHandle {
        let index = match self.slots.iter().position(|slot| slot.button.is_none()) {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    button: None,
                });
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        let handle = ButtonHandle::new(index as u32, slot.generation);
        slot.button = Some(build(handle));
        handle
    }

    pub fn remove(&mut self, handle: ButtonHandle) -> Option<AnimatedButton> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation() {
            return None;
        }
        let button = slot.button.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        Some(button)
    }

    pub fn get(&self, handle: ButtonHandle) -> Option<&AnimatedButton> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.button.as_ref())
    }

    pub fn get_mut(&mut self, handle: ButtonHandle) -> Option<&mut AnimatedButton> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.button.as_mut())
    }

    pub fn contains(&self, handle: ButtonHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.button.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Triangle wave over one pulse period: 0 at the start, fully gray halfway.
pub fn pulse_desaturation(elapsed_ms: u128) -> u8 {
    let half = CONNECT_PULSE_PERIOD_MS / 2;
    let phase = elapsed_ms % CONNECT_PULSE_PERIOD_MS;
    let ramp = if phase < half {
        phase
    } else {
        CONNECT_PULSE_PERIOD_MS - phase
    };
    (ramp * 255 / half) as u8
}

#[derive(Debug)]
pub struct OverlayToolbar {
    buttons: ButtonTable,
    order: Vec<(ButtonRole, ButtonHandle)>,
    icons: IconSet,
    visible: bool,
    connecting: bool,
    position: Point,
    size: Size,
    owner: Size,
    hovered: Option<ButtonHandle>,
    pressed: Option<ButtonHandle>,
    pointer: Option<Point>,
    host: String,
    user: String,
    pulse_timer: Option<TimerId>,
    reveal_timer: Option<TimerId>,
    connect_started_at: Option<Instant>,
}

impl OverlayToolbar {
    pub fn new(icons: IconSet, host: impl Into<String>, flags: ViewFlags) -> Self {
        let mut toolbar = Self {
            buttons: ButtonTable::new(),
            order: Vec::new(),
            icons,
            visible: false,
            connecting: false,
            position: Point::new(0, TOOLBAR_TOP_MARGIN),
            size: Self::fixed_size(),
            owner: Size::default(),
            hovered: None,
            pressed: None,
            pointer: None,
            host: host.into(),
            user: String::new(),
            pulse_timer: None,
            reveal_timer: None,
            connect_started_at: None,
        };
        for role in ButtonRole::ALL {
            let checked = match role {
                ButtonRole::KeyInterception if flags.view_only => continue,
                ButtonRole::ViewOnly => flags.view_only,
                ButtonRole::KeyInterception => flags.key_interception,
                ButtonRole::FullScreen => flags.full_screen,
                _ => false,
            };
            toolbar.add_button(role, checked);
        }
        toolbar.layout();
        toolbar
    }

    /// Room for every role, whether or not all buttons are present.
    fn fixed_size() -> Size {
        let n = ButtonRole::ALL.len() as i32;
        Size::new(
            TOOLBAR_PADDING_X * 2
                + n * BUTTON_WIDTH
                + (n - 1) * TOOLBAR_SPACING
                + TOOLBAR_SPACING
                + TOOLBAR_CAPTION_WIDTH,
            TOOLBAR_PADDING_Y * 2 + BUTTON_HEIGHT,
        )
    }

    fn add_button(&mut self, role: ButtonRole, checked: bool) -> ButtonHandle {
        let icons = &self.icons;
        let handle = self.buttons.insert_with(|handle| {
            let button = AnimatedButton::new(
                handle,
                icons.button_icon(role.icon()),
                icons.tooltip_icon(role.icon()),
                role.label(),
                role.title(),
                role.description(),
            );
            if role.checkable() {
                button.with_checkable(checked)
            } else {
                button
            }
        });
        let at = self
            .order
            .iter()
            .position(|(existing, _)| *existing > role)
            .unwrap_or(self.order.len());
        self.order.insert(at, (role, handle));
        handle
    }

    fn layout(&mut self) {
        let origin = self.position.offset(TOOLBAR_PADDING_X, TOOLBAR_PADDING_Y);
        for (i, (_, handle)) in self.order.iter().enumerate() {
            if let Some(button) = self.buttons.get_mut(*handle) {
                button.move_to(origin.offset(i as i32 * (BUTTON_WIDTH + TOOLBAR_SPACING), 0));
            }
        }
    }

    fn caption_rect(&self) -> PxRect {
        let n = ButtonRole::ALL.len() as i32;
        PxRect::new(
            self.position.x + TOOLBAR_PADDING_X + n * (BUTTON_WIDTH + TOOLBAR_SPACING),
            self.position.y + TOOLBAR_PADDING_Y,
            TOOLBAR_CAPTION_WIDTH,
            BUTTON_HEIGHT,
        )
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Window-local bounds.
    pub fn bounds(&self) -> PxRect {
        PxRect::from_origin_size(self.position, self.size)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal_timer.is_some()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_user(&mut self, user: impl Into<String>) {
        self.user = user.into();
    }

    pub fn activation_strip(&self) -> PxRect {
        PxRect::new(0, 0, self.owner.width, ACTIVATION_STRIP_HEIGHT)
    }

    pub fn in_activation_region(&self, p: Point) -> bool {
        self.activation_strip().contains(p) || self.bounds().contains(p)
    }

    pub fn hovered(&self) -> Option<ButtonHandle> {
        self.hovered
    }

    pub fn handle_for(&self, role: ButtonRole) -> Option<ButtonHandle> {
        self.order
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, handle)| *handle)
    }

    pub fn role_of(&self, handle: ButtonHandle) -> Option<ButtonRole> {
        self.order
            .iter()
            .find(|(_, h)| *h == handle)
            .map(|(role, _)| *role)
    }

    pub fn button(&self, handle: ButtonHandle) -> Option<&AnimatedButton> {
        self.buttons.get(handle)
    }

    pub fn button_for(&self, role: ButtonRole) -> Option<&AnimatedButton> {
        self.handle_for(role).and_then(|h| self.buttons.get(h))
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Global rectangle of a live button.
    pub fn button_global_rect(
        &self,
        handle: ButtonHandle,
        ctx: &ComponentContext,
    ) -> Option<PxRect> {
        self.buttons
            .get(handle)
            .map(|button| button.bounds().translated(ctx.window_origin()))
    }

    /// Center horizontally in an owner of the given size. The toolbar keeps
    /// its size even when it is wider than the owner.
    pub fn update_position(&mut self, owner: Size) {
        self.owner = owner;
        let x = ((owner.width - self.size.width) / 2).max(0);
        self.position = Point::new(x, TOOLBAR_TOP_MARGIN);
        self.layout();
    }

    fn appear(&mut self) {
        self.visible = true;
        tracing::debug!("toolbar shown");
    }

    fn disappear(&mut self, cx: &mut EventContext<'_>) {
        self.visible = false;
        self.drop_pointer_state(cx);
        tracing::debug!("toolbar hidden");
    }

    /// Un-hover and un-press whatever button the pointer was on.
    fn drop_pointer_state(&mut self, cx: &mut EventContext<'_>) {
        if let Some(handle) = self.hovered.take()
            && let Some(button) = self.buttons.get_mut(handle)
        {
            button.pointer_leave(cx);
        }
        if let Some(handle) = self.pressed.take()
            && let Some(button) = self.buttons.get_mut(handle)
        {
            button.cancel_press();
        }
    }

    /// Route a pointer event in window-local pixels. Returns true when the
    /// event belongs to the toolbar rather than the remote view.
    pub fn handle_pointer(
        &mut self,
        p: Point,
        kind: MouseEventKind,
        cx: &mut EventContext<'_>,
    ) -> bool {
        self.pointer = Some(p);
        let inside = self.in_activation_region(p);
        if inside && !self.visible {
            self.appear();
        } else if !inside && self.visible && self.reveal_timer.is_none() {
            self.disappear(cx);
        }
        if !self.visible {
            return false;
        }

        let under = self
            .order
            .iter()
            .map(|(_, handle)| *handle)
            .find(|handle| self.buttons.get(*handle).is_some_and(|b| b.contains(p)));
        if under != self.hovered {
            if let Some(old) = self.hovered.take()
                && let Some(button) = self.buttons.get_mut(old)
            {
                button.pointer_leave(cx);
            }
            if let Some(new) = under
                && let Some(button) = self.buttons.get_mut(new)
            {
                button.pointer_enter(cx);
            }
            self.hovered = under;
        }

        let mut finished_press = false;
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(handle) = under
                    && let Some(button) = self.buttons.get_mut(handle)
                {
                    button.press(cx);
                    self.pressed = Some(handle);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(handle) = self.pressed.take()
                    && let Some(button) = self.buttons.get_mut(handle)
                {
                    button.release(under == Some(handle), cx);
                    finished_press = true;
                }
            }
            _ => {}
        }
        finished_press || self.bounds().contains(p)
    }

    /// The pointer left the window or the window lost focus.
    pub fn pointer_left_window(&mut self, cx: &mut EventContext<'_>) {
        self.pointer = None;
        self.drop_pointer_state(cx);
        if self.visible && self.reveal_timer.is_none() {
            self.disappear(cx);
        }
    }

    /// Show the toolbar for a while regardless of the pointer.
    pub fn reveal(&mut self, timers: &mut Scheduler<TimerTask>) {
        if let Some(id) = self.reveal_timer.take() {
            timers.cancel(id);
        }
        self.appear();
        self.reveal_timer = Some(timers.single_shot(STARTUP_REVEAL, TimerTask::StartupReveal));
    }

    pub fn end_reveal(&mut self, cx: &mut EventContext<'_>) {
        self.reveal_timer = None;
        let pointer_inside = self.pointer.is_some_and(|p| self.in_activation_region(p));
        if self.visible && !pointer_inside {
            self.disappear(cx);
        }
    }

    pub fn fade_step(&mut self, handle: ButtonHandle, timers: &mut Scheduler<TimerTask>) {
        if let Some(button) = self.buttons.get_mut(handle) {
            button.fade_step(timers);
        }
    }

    pub fn on_button_activated(
        &mut self,
        handle: ButtonHandle,
        cx: &mut EventContext<'_>,
    ) -> Option<ToolbarAction> {
        let role = self.role_of(handle)?;
        let checked = self.buttons.get(handle).is_some_and(|b| b.is_checked());
        match role {
            ButtonRole::Connect => self.begin_connecting(cx).then_some(ToolbarAction::Connect),
            ButtonRole::ViewOnly => Some(ToolbarAction::ViewOnly(checked)),
            ButtonRole::KeyInterception => Some(ToolbarAction::KeyInterception(checked)),
            ButtonRole::FullScreen => Some(ToolbarAction::FullScreen(checked)),
            ButtonRole::Quit => Some(ToolbarAction::Quit),
        }
    }

    /// Enter the connecting state. Returns false if already connecting.
    pub fn begin_connecting(&mut self, cx: &mut EventContext<'_>) -> bool {
        if self.connecting {
            return false;
        }
        self.connecting = true;
        self.connect_started_at = Some(cx.timers.now());
        let busy_icon = self.icons.button_icon(IconKind::Busy);
        if let Some(handle) = self.handle_for(ButtonRole::Connect)
            && let Some(button) = self.buttons.get_mut(handle)
        {
            button.set_busy(busy_icon, BUSY_LABEL);
        }
        self.pulse_timer = Some(
            cx.timers
                .single_shot(CONNECT_PULSE_INTERVAL, TimerTask::ConnectPulse),
        );
        tracing::info!(host = %self.host, "connection requested");
        true
    }

    pub fn connection_established(&mut self, cx: &mut EventContext<'_>) {
        if !self.connecting {
            return;
        }
        self.connecting = false;
        self.connect_started_at = None;
        if let Some(id) = self.pulse_timer.take() {
            cx.timers.cancel(id);
        }
        if let Some(handle) = self.handle_for(ButtonRole::Connect)
            && let Some(button) = self.buttons.get_mut(handle)
        {
            button.clear_busy();
            button.resume_fade(self.hovered == Some(handle), cx.timers);
        }
        tracing::info!(host = %self.host, "connection established");
    }

    /// One tick of the busy pulse; re-arms only while connecting.
    pub fn on_pulse(&mut self, timers: &mut Scheduler<TimerTask>) {
        self.pulse_timer = None;
        if !self.connecting {
            return;
        }
        let elapsed = self
            .connect_started_at
            .map(|start| timers.now().saturating_duration_since(start).as_millis())
            .unwrap_or(0);
        if let Some(handle) = self.handle_for(ButtonRole::Connect)
            && let Some(button) = self.buttons.get_mut(handle)
        {
            button.set_icon_desaturation(pulse_desaturation(elapsed));
        }
        self.pulse_timer =
            Some(timers.single_shot(CONNECT_PULSE_INTERVAL, TimerTask::ConnectPulse));
    }

    pub fn set_checked(&mut self, role: ButtonRole, checked: bool) {
        if let Some(handle) = self.handle_for(role)
            && let Some(button) = self.buttons.get_mut(handle)
        {
            button.set_checked(checked);
        }
    }

    /// View-only sessions have no use for key capture, so its button goes
    /// away and comes back when view-only is turned off.
    pub fn set_view_only(
        &mut self,
        view_only: bool,
        key_interception: bool,
        timers: &mut Scheduler<TimerTask>,
    ) {
        self.set_checked(ButtonRole::ViewOnly, view_only);
        match (view_only, self.handle_for(ButtonRole::KeyInterception)) {
            (true, Some(handle)) => {
                self.order.retain(|(_, h)| *h != handle);
                if self.hovered == Some(handle) {
                    self.hovered = None;
                }
                if self.pressed == Some(handle) {
                    self.pressed = None;
                }
                if let Some(mut button) = self.buttons.remove(handle) {
                    button.cancel_fade(timers);
                }
            }
            (false, None) => {
                self.add_button(ButtonRole::KeyInterception, key_interception);
            }
            _ => {}
        }
        self.layout();
    }

    fn render_caption(&self, frame: &mut UiFrame<'_>, ctx: &ComponentContext) {
        let Some(area) = ctx
            .metrics()
            .px_to_cells(self.caption_rect())
            .clip(frame.area())
        else {
            return;
        };
        let host_style = Style::default()
            .fg(theme::TOOLBAR_CAPTION_RGB.to_color())
            .add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(theme::TOOLBAR_CAPTION_DIM_RGB.to_color());
        let user = if self.user.is_empty() {
            "no user logged in"
        } else {
            self.user.as_str()
        };
        let status = if self.connecting { "connecting" } else { "" };
        let lines = [(self.host.as_str(), host_style), (user, dim), (status, dim)];
        let buffer = frame.buffer_mut();
        for (row, (text, style)) in lines.iter().enumerate() {
            let y = area.y.saturating_add(row as u16);
            safe_set_string(buffer, area, area.x, y, text, *style);
        }
    }
}

impl Component for OverlayToolbar {
    fn resize(&mut self, bounds: PxRect, _ctx: &ComponentContext) {
        self.update_position(bounds.size());
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, ctx: &ComponentContext) {
        if !self.visible {
            return;
        }
        if let Some(area) = ctx.metrics().px_to_cells(self.bounds()).clip(frame.area()) {
            frame.fill(area, Style::default().bg(theme::TOOLBAR_BG_RGB.to_color()));
        }
        for (_, handle) in &self.order {
            if let Some(button) = self.buttons.get_mut(*handle) {
                button.render(frame, ctx);
            }
        }
        self.render_caption(frame, ctx);
    }

    fn pointer_leave(&mut self, cx: &mut EventContext<'_>) {
        self.pointer_left_window(cx);
    }

    fn handle_event(&mut self, event: &Event, cx: &mut EventContext<'_>) -> bool {
        match event {
            Event::Mouse(mouse) => {
                let p = cx.ui.metrics().cell_center(mouse.column, mouse.row);
                self.handle_pointer(p, mouse.kind, cx)
            }
            Event::FocusLost => {
                self.pointer_left_window(cx);
                false
            }
            _ => false,
        }
    }
}
