use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use term_rview::components::ComponentContext;
use term_rview::components::toolbar::{ButtonRole, ViewFlags};
use term_rview::container::RemoteViewContainer;
use term_rview::drivers::scripted::{BufferOutputDriver, ScriptedInputDriver};
use term_rview::geometry::Size;
use term_rview::icons::IconSet;
use term_rview::remote::TestPatternView;
use term_rview::runner::run_viewer;
use term_rview::screens::Desktop;
use term_rview::session::ViewerSession;

fn session(flags: ViewFlags) -> ViewerSession<TestPatternView> {
    let container = RemoteViewContainer::new(
        TestPatternView::new(Duration::ZERO, Some("erin".into())),
        IconSet::blank(),
        "lab-pc-07",
        flags,
    );
    ViewerSession::new(
        container,
        Desktop::single(Size::default()),
        ComponentContext::default(),
        Instant::now(),
    )
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

/// Cell of the Quit button in a 100 column terminal.
fn quit_cell() -> (u16, u16) {
    let mut layout = session(ViewFlags::default());
    layout.resize_cells(100, 30);
    let rect = layout
        .container()
        .toolbar()
        .button_for(ButtonRole::Quit)
        .unwrap()
        .bounds();
    (
        ((rect.x + rect.width / 2) / 8) as u16,
        ((rect.y + rect.height / 2) / 16) as u16,
    )
}

#[test]
fn quit_button_ends_the_run() {
    let (col, row) = quit_cell();
    let mut input = ScriptedInputDriver::new([
        mouse(MouseEventKind::Moved, col, 0),
        mouse(MouseEventKind::Moved, col, row),
        mouse(MouseEventKind::Down(MouseButton::Left), col, row),
        mouse(MouseEventKind::Up(MouseButton::Left), col, row),
    ]);
    let mut output = BufferOutputDriver::new(100, 30).unwrap();
    let mut s = session(ViewFlags::default());

    run_viewer(&mut input, &mut output, &mut s, Duration::ZERO).unwrap();

    assert!(s.should_quit());
    assert_eq!(input.remaining(), 0);
    assert!(!input.mouse_capture(), "capture is released on the way out");
    assert!(output.frames() >= 1);
    assert_eq!(
        output.titles().first().map(String::as_str),
        Some("lab-pc-07 - Remote view")
    );
    assert!(output.row_text(29).contains("lab-pc-07"));
}

#[test]
fn ctrl_q_quits_when_keys_stay_local() {
    let mut input = ScriptedInputDriver::new([Event::Key(KeyEvent::new(
        KeyCode::Char('q'),
        KeyModifiers::CONTROL,
    ))]);
    let mut output = BufferOutputDriver::new(100, 30).unwrap();
    let mut s = session(ViewFlags::default());

    run_viewer(&mut input, &mut output, &mut s, Duration::ZERO).unwrap();

    assert!(s.should_quit());
    assert!(output.row_text(29).contains("Ctrl+Q quit"));
}

#[test]
fn idle_screen_prompts_to_connect() {
    let mut input = ScriptedInputDriver::new([Event::Key(KeyEvent::new(
        KeyCode::Char('q'),
        KeyModifiers::CONTROL,
    ))]);
    let mut output = BufferOutputDriver::new(100, 30).unwrap();
    let mut s = session(ViewFlags::default());
    run_viewer(&mut input, &mut output, &mut s, Duration::ZERO).unwrap();

    let screen: String = (0..29).map(|row| output.row_text(row)).collect();
    assert!(screen.contains("Not connected"));
}
