//! Smooths over how terminals report keys before the viewer sees them.
//!
//! Terminals with the enhanced keyboard protocol (and Windows consoles)
//! report releases as separate events. Key strokes sent to the remote side
//! already pair every press with its release, so releases are dropped here.
//! Shift+Tab arrives as either `BackTab` or `Tab` with Shift depending on the
//! terminal; both become `BackTab`.

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    dropped_releases: u64,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of release events swallowed so far.
    pub fn dropped_releases(&self) -> u64 {
        self.dropped_releases
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(mut key) => {
                if key.kind == KeyEventKind::Release {
                    self.dropped_releases += 1;
                    return None;
                }
                if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                    key.code = KeyCode::BackTab;
                    key.modifiers.remove(KeyModifiers::SHIFT);
                }
                Some(Event::Key(key))
            }
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn tab_with_shift_becomes_backtab() {
        let mut norm = KeyboardNormalizer::new();
        let key = KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT);
        match norm.normalize(Event::Key(key)) {
            Some(Event::Key(k)) => {
                assert_eq!(k.code, KeyCode::BackTab);
                assert!(!k.modifiers.contains(KeyModifiers::SHIFT));
            }
            other => panic!("expected key event, got {other:?}"),
        }
    }

    #[test]
    fn releases_are_dropped_and_counted() {
        let mut norm = KeyboardNormalizer::new();
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(norm.normalize(Event::Key(key)).is_none());
        assert_eq!(norm.dropped_releases(), 1);
    }

    #[test]
    fn repeats_and_other_events_pass_through() {
        let mut norm = KeyboardNormalizer::new();
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Repeat;
        assert!(norm.normalize(Event::Key(key)).is_some());
        assert!(norm.normalize(Event::FocusLost).is_some());
        assert!(norm.normalize(Event::Resize(10, 20)).is_some());
    }
}
