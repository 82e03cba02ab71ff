//! The remote-desktop endpoint behind the view.
//!
//! The viewer only needs a narrow slice of a real protocol client: start a
//! connection, learn when it is up, receive frames, and push keys and pointer
//! state the other way. [`TestPatternView`] is a local stand-in that behaves
//! like a slow-to-connect server painting a moving test card.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::MouseButton;

use crate::geometry::{Point, Size};
pub use crate::keys::KeyStroke;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteEvent {
    ConnectionStarted,
    ConnectionEstablished,
    Frame(RemoteFrame),
}

/// Pointer button mask in the usual remote framebuffer layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: PointerButtons = PointerButtons(0);
    pub const LEFT: PointerButtons = PointerButtons(1);
    pub const MIDDLE: PointerButtons = PointerButtons(1 << 1);
    pub const RIGHT: PointerButtons = PointerButtons(1 << 2);
    pub const WHEEL_UP: PointerButtons = PointerButtons(1 << 3);
    pub const WHEEL_DOWN: PointerButtons = PointerButtons(1 << 4);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: PointerButtons) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn with(self, other: PointerButtons) -> PointerButtons {
        PointerButtons(self.0 | other.0)
    }

    pub const fn without(self, other: PointerButtons) -> PointerButtons {
        PointerButtons(self.0 & !other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<MouseButton> for PointerButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => PointerButtons::LEFT,
            MouseButton::Middle => PointerButtons::MIDDLE,
            MouseButton::Right => PointerButtons::RIGHT,
        }
    }
}

pub trait RemoteView {
    /// Next pending event, if any. Called on every idle tick.
    fn poll_event(&mut self, now: Instant) -> Option<RemoteEvent>;

    fn start_connection(&mut self, now: Instant);

    fn send_key(&mut self, stroke: KeyStroke);

    /// `point` is relative to the view's top-left, in device pixels.
    fn send_pointer(&mut self, point: Point, buttons: PointerButtons);

    /// The view area changed size.
    fn resize(&mut self, size: Size);

    /// Login name of the user on the remote machine, once known.
    fn session_user(&self) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkState {
    Idle,
    Connecting { ready_at: Instant },
    Connected,
}

const PATTERN_WIDTH: u32 = 320;
const PATTERN_HEIGHT: u32 = 200;
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

const BARS: [[u8; 3]; 8] = [
    [192, 192, 192],
    [192, 192, 0],
    [0, 192, 192],
    [0, 192, 0],
    [192, 0, 192],
    [192, 0, 0],
    [0, 0, 192],
    [16, 16, 16],
];

/// Local endpoint that connects after a fixed delay and then streams a
/// test card with a sweeping bar and the last pointer position marked.
#[derive(Debug)]
pub struct TestPatternView {
    state: LinkState,
    connect_delay: Duration,
    user: Option<String>,
    pending: VecDeque<RemoteEvent>,
    view_size: Size,
    frame_index: u32,
    last_frame_at: Option<Instant>,
    pointer: Option<Point>,
    buttons: PointerButtons,
    keys: Vec<KeyStroke>,
}

impl TestPatternView {
    pub fn new(connect_delay: Duration, user: Option<String>) -> Self {
        Self {
            state: LinkState::Idle,
            connect_delay,
            user,
            pending: VecDeque::new(),
            view_size: Size::default(),
            frame_index: 0,
            last_frame_at: None,
            pointer: None,
            buttons: PointerButtons::NONE,
            keys: Vec::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.state, LinkState::Connecting { .. })
    }

    pub fn sent_keys(&self) -> &[KeyStroke] {
        &self.keys
    }

    pub fn last_pointer(&self) -> Option<(Point, PointerButtons)> {
        self.pointer.map(|p| (p, self.buttons))
    }

    pub fn view_size(&self) -> Size {
        self.view_size
    }

    fn pattern(&self) -> RemoteFrame {
        let (w, h) = (PATTERN_WIDTH, PATTERN_HEIGHT);
        let mut rgba = Vec::with_capacity((w * h * 4) as usize);
        let sweep = (self.frame_index * 4) % w;
        // Pointer position scaled from view pixels onto the card.
        let marker = self.pointer.and_then(|p| {
            (self.view_size.width > 0 && self.view_size.height > 0).then(|| {
                (
                    (p.x.max(0) as i64 * w as i64 / self.view_size.width as i64) as u32,
                    (p.y.max(0) as i64 * h as i64 / self.view_size.height as i64) as u32,
                )
            })
        });
        for y in 0..h {
            for x in 0..w {
                let mut px = BARS[(x * BARS.len() as u32 / w) as usize];
                if y > h * 3 / 4 {
                    let v = (x * 255 / w) as u8;
                    px = [v, v, v];
                }
                if x.abs_diff(sweep) < 3 {
                    px = [255, 255, 255];
                }
                if let Some((mx, my)) = marker
                    && (x.abs_diff(mx) < 2 || y.abs_diff(my) < 2)
                    && x.abs_diff(mx) < 12
                    && y.abs_diff(my) < 12
                {
                    px = if self.buttons.is_empty() {
                        [255, 64, 64]
                    } else {
                        [64, 255, 64]
                    };
                }
                rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        RemoteFrame {
            width: w,
            height: h,
            rgba,
        }
    }
}

impl RemoteView for TestPatternView {
    fn poll_event(&mut self, now: Instant) -> Option<RemoteEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        match self.state {
            LinkState::Idle => None,
            LinkState::Connecting { ready_at } => {
                if now < ready_at {
                    return None;
                }
                self.state = LinkState::Connected;
                Some(RemoteEvent::ConnectionEstablished)
            }
            LinkState::Connected => {
                let due = self
                    .last_frame_at
                    .is_none_or(|last| now.saturating_duration_since(last) >= FRAME_INTERVAL);
                if !due {
                    return None;
                }
                self.last_frame_at = Some(now);
                self.frame_index = self.frame_index.wrapping_add(1);
                Some(RemoteEvent::Frame(self.pattern()))
            }
        }
    }

    fn start_connection(&mut self, now: Instant) {
        if self.state != LinkState::Idle {
            return;
        }
        self.state = LinkState::Connecting {
            ready_at: now + self.connect_delay,
        };
        self.pending.push_back(RemoteEvent::ConnectionStarted);
    }

    fn send_key(&mut self, stroke: KeyStroke) {
        if self.is_connected() {
            self.keys.push(stroke);
        }
    }

    fn send_pointer(&mut self, point: Point, buttons: PointerButtons) {
        self.pointer = Some(point);
        self.buttons = buttons;
    }

    fn resize(&mut self, size: Size) {
        self.view_size = size;
    }

    fn session_user(&self) -> Option<String> {
        if self.is_connected() {
            self.user.clone()
        } else {
            None
        }
    }
}
