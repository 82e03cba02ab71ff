//! The tooltip switch is process-wide, so it gets a test binary of its own.

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyModifiers, MouseEvent, MouseEventKind};

use term_rview::components::toolbar::{ButtonRole, ViewFlags};
use term_rview::components::{ComponentContext, set_tooltips_disabled, tooltips_disabled};
use term_rview::container::RemoteViewContainer;
use term_rview::geometry::Size;
use term_rview::icons::IconSet;
use term_rview::remote::TestPatternView;
use term_rview::screens::Desktop;
use term_rview::session::ViewerSession;

fn hover(s: &mut ViewerSession<TestPatternView>, role: ButtonRole) {
    let rect = s.container().toolbar().button_for(role).unwrap().bounds();
    s.handle_event(&Event::Mouse(MouseEvent {
        kind: MouseEventKind::Moved,
        column: ((rect.x + rect.width / 2) / 8) as u16,
        row: ((rect.y + rect.height / 2) / 16) as u16,
        modifiers: KeyModifiers::NONE,
    }));
}

#[test]
fn disabled_tooltips_never_open_but_hover_still_fades() {
    let container = RemoteViewContainer::new(
        TestPatternView::new(Duration::ZERO, None),
        IconSet::blank(),
        "lab-pc-07",
        ViewFlags::default(),
    );
    let mut s = ViewerSession::new(
        container,
        Desktop::single(Size::default()),
        ComponentContext::default(),
        Instant::now(),
    );
    s.resize_cells(100, 30);

    set_tooltips_disabled(true);
    assert!(tooltips_disabled());
    hover(&mut s, ButtonRole::Connect);
    assert!(s.container().toolbar().hovered().is_some());
    assert!(s.container().tooltip().is_none());
    assert!(s.next_deadline().is_some(), "the hover fade still runs");

    set_tooltips_disabled(false);
    hover(&mut s, ButtonRole::Quit);
    assert!(s.container().tooltip().is_some());
}
