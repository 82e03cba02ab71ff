use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use term_rview::components::ComponentContext;
use term_rview::components::toolbar::{ButtonRole, ViewFlags};
use term_rview::constants::STARTUP_REVEAL;
use term_rview::container::RemoteViewContainer;
use term_rview::geometry::{Point, PxRect, Size};
use term_rview::icons::IconSet;
use term_rview::remote::{PointerButtons, TestPatternView};
use term_rview::screens::{Desktop, Screen};
use term_rview::session::ViewerSession;

fn session_with(desktop: Desktop, ctx: ComponentContext) -> ViewerSession<TestPatternView> {
    let remote = TestPatternView::new(Duration::from_millis(150), Some("dave".into()));
    let container = RemoteViewContainer::new(
        remote,
        IconSet::blank(),
        "class-room-3",
        ViewFlags {
            key_interception: true,
            ..ViewFlags::default()
        },
    );
    let mut s = ViewerSession::new(container, desktop, ctx, Instant::now());
    s.resize_cells(120, 40);
    s
}

fn session() -> ViewerSession<TestPatternView> {
    session_with(Desktop::single(Size::default()), ComponentContext::default())
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn button_cell(s: &ViewerSession<TestPatternView>, role: ButtonRole) -> (u16, u16) {
    let rect = s.container().toolbar().button_for(role).unwrap().bounds();
    let m = s.context().metrics();
    (
        ((rect.x + rect.width / 2) / m.cell_width() as i32) as u16,
        ((rect.y + rect.height / 2) / m.cell_height() as i32) as u16,
    )
}

fn click(s: &mut ViewerSession<TestPatternView>, role: ButtonRole) {
    let (col, row) = button_cell(s, role);
    s.handle_event(&mouse(MouseEventKind::Moved, col, row));
    s.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), col, row));
    s.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), col, row));
}

#[test]
fn top_edge_shows_toolbar_and_leaving_hides_it() {
    let mut s = session();
    assert!(!s.container().toolbar().is_visible());
    s.handle_event(&mouse(MouseEventKind::Moved, 3, 0));
    assert!(s.container().toolbar().is_visible());
    s.handle_event(&mouse(MouseEventKind::Moved, 3, 20));
    assert!(!s.container().toolbar().is_visible());
}

#[test]
fn terminal_resize_recenters_toolbar() {
    let mut s = session();
    let before = s.container().toolbar().position();
    s.handle_event(&Event::Resize(200, 50));
    let after = s.container().toolbar().position();
    assert_eq!(after.x, (200 * 8 - 656) / 2);
    assert!(after.x > before.x);
    assert_eq!(s.container().size(), Size::new(1600, 800));
}

#[test]
fn narrow_window_pins_toolbar_to_left_edge() {
    let mut s = session();
    s.resize_cells(40, 20);
    assert_eq!(s.container().toolbar().position().x, 0);
}

#[test]
fn startup_reveal_holds_then_hides() {
    let mut s = session();
    s.reveal_toolbar();
    let t0 = s.now();
    s.handle_event(&mouse(MouseEventKind::Moved, 60, 30));
    assert!(s.container().toolbar().is_visible(), "reveal ignores the pointer");
    s.tick(t0 + STARTUP_REVEAL);
    assert!(!s.container().toolbar().is_visible());
}

#[test]
fn connect_click_pulses_until_established() {
    let mut s = session();
    click(&mut s, ButtonRole::Connect);
    let t0 = s.now();
    s.tick(t0);
    assert!(s.container().toolbar().is_connecting());
    assert!(s.next_deadline().is_some());
    s.tick(t0 + Duration::from_millis(400));
    assert!(!s.container().toolbar().is_connecting());
    assert_eq!(s.container().user_label(), "dave");
    assert!(s.container().remote().is_connected());
}

#[test]
fn tooltip_lands_on_the_monitor_under_the_button() {
    let desktop = Desktop::new(vec![
        Screen::from_geometry(PxRect::new(0, 0, 1920, 1080)),
        Screen::from_geometry(PxRect::new(1920, 0, 1280, 1024)),
    ]);
    let ctx = ComponentContext::default().with_window_origin(Point::new(1920, 0));
    let mut s = session_with(desktop, ctx);
    let (col, row) = button_cell(&s, ButtonRole::Quit);
    s.handle_event(&mouse(MouseEventKind::Moved, col, row));
    let tooltip = s.container().tooltip().expect("hover opens a tooltip");
    let secondary = PxRect::new(1920, 0, 1280, 1024);
    assert!(tooltip.bounds().x >= secondary.x - 4);
    assert!(tooltip.bounds().right() <= secondary.right());
}

#[test]
fn full_screen_button_drops_status_row() {
    let mut s = session();
    let full = s.container().view_rect();
    assert_eq!(full.height, 40 * 16 - 16);
    click(&mut s, ButtonRole::FullScreen);
    assert!(s.container().is_full_screen());
    assert_eq!(s.container().view_rect().height, 40 * 16);
}

#[test]
fn typed_keys_reach_connected_remote() {
    let mut s = session();
    s.start_connection();
    let t0 = s.now();
    s.tick(t0 + Duration::from_millis(200));
    assert!(s.container().remote().is_connected());
    let consumed = s.handle_event(&Event::Key(KeyEvent::new(
        KeyCode::Char('a'),
        KeyModifiers::NONE,
    )));
    assert!(consumed);
    let keys = s.container().remote().sent_keys();
    assert_eq!(keys.len(), 2);
    assert!(keys[0].down && !keys[1].down);
    assert_eq!(keys[0].keysym, 'a' as u32);
}

#[test]
fn remote_drag_released_over_toolbar_lets_go() {
    let mut s = session();
    s.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 60, 20));
    s.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 60, 2));
    assert!(s.container().toolbar().is_visible());
    s.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 60, 2));
    assert_eq!(
        s.container().remote().last_pointer(),
        Some((Point::new(484, 40), PointerButtons::NONE))
    );
    assert!(!s.container().is_view_only(), "release is not a toolbar click");

    s.handle_event(&mouse(MouseEventKind::Moved, 60, 20));
    assert_eq!(
        s.container().remote().last_pointer(),
        Some((Point::new(484, 328), PointerButtons::NONE))
    );
}

#[test]
fn focus_loss_during_reveal_closes_the_tooltip() {
    let mut s = session();
    s.reveal_toolbar();
    let (col, row) = button_cell(&s, ButtonRole::Quit);
    s.handle_event(&mouse(MouseEventKind::Moved, col, row));
    assert!(s.container().tooltip().is_some());
    s.handle_event(&Event::FocusLost);
    assert!(s.container().tooltip().is_none());
    assert!(s.container().toolbar().hovered().is_none());
    assert!(s.container().toolbar().is_visible());
}
