//! Terminal key events to X11 keysym strokes for the remote side.
//!
//! Terminals report a key once per press, with modifiers folded in, so a
//! press becomes the full sequence the remote expects: modifiers down, key
//! down, key up, modifiers up.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub mod keysym {
    pub const BACKSPACE: u32 = 0xff08;
    pub const TAB: u32 = 0xff09;
    pub const RETURN: u32 = 0xff0d;
    pub const ESCAPE: u32 = 0xff1b;
    pub const HOME: u32 = 0xff50;
    pub const LEFT: u32 = 0xff51;
    pub const UP: u32 = 0xff52;
    pub const RIGHT: u32 = 0xff53;
    pub const DOWN: u32 = 0xff54;
    pub const PAGE_UP: u32 = 0xff55;
    pub const PAGE_DOWN: u32 = 0xff56;
    pub const END: u32 = 0xff57;
    pub const INSERT: u32 = 0xff63;
    pub const MENU: u32 = 0xff67;
    pub const F1: u32 = 0xffbe;
    pub const SHIFT_L: u32 = 0xffe1;
    pub const CONTROL_L: u32 = 0xffe3;
    pub const ALT_L: u32 = 0xffe9;
    pub const SUPER_L: u32 = 0xffeb;
    pub const DELETE: u32 = 0xffff;
    /// Prefix for characters outside Latin-1.
    pub const UNICODE_OFFSET: u32 = 0x0100_0000;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub keysym: u32,
    pub down: bool,
}

impl KeyStroke {
    pub const fn down(keysym: u32) -> Self {
        Self { keysym, down: true }
    }

    pub const fn up(keysym: u32) -> Self {
        Self {
            keysym,
            down: false,
        }
    }
}

pub fn keysym_for(code: KeyCode) -> Option<u32> {
    let sym = match code {
        KeyCode::Char(c) => {
            let cp = c as u32;
            if (0x20..=0x7e).contains(&cp) || (0xa0..=0xff).contains(&cp) {
                cp
            } else if cp < 0x20 {
                return None;
            } else {
                keysym::UNICODE_OFFSET | cp
            }
        }
        KeyCode::Backspace => keysym::BACKSPACE,
        KeyCode::Tab | KeyCode::BackTab => keysym::TAB,
        KeyCode::Enter => keysym::RETURN,
        KeyCode::Esc => keysym::ESCAPE,
        KeyCode::Home => keysym::HOME,
        KeyCode::End => keysym::END,
        KeyCode::Left => keysym::LEFT,
        KeyCode::Right => keysym::RIGHT,
        KeyCode::Up => keysym::UP,
        KeyCode::Down => keysym::DOWN,
        KeyCode::PageUp => keysym::PAGE_UP,
        KeyCode::PageDown => keysym::PAGE_DOWN,
        KeyCode::Insert => keysym::INSERT,
        KeyCode::Delete => keysym::DELETE,
        KeyCode::Menu => keysym::MENU,
        KeyCode::F(n) if (1..=35).contains(&n) => keysym::F1 + u32::from(n) - 1,
        _ => return None,
    };
    Some(sym)
}

const MODIFIER_KEYS: [(KeyModifiers, u32); 4] = [
    (KeyModifiers::CONTROL, keysym::CONTROL_L),
    (KeyModifiers::ALT, keysym::ALT_L),
    (KeyModifiers::SUPER, keysym::SUPER_L),
    (KeyModifiers::SHIFT, keysym::SHIFT_L),
];

/// Strokes for one terminal key event. Releases produce nothing; the press
/// already carried its own release.
pub fn strokes_for(key: &KeyEvent) -> Vec<KeyStroke> {
    if key.kind == KeyEventKind::Release {
        return Vec::new();
    }
    let Some(sym) = keysym_for(key.code) else {
        return Vec::new();
    };
    let mut mods = key.modifiers;
    if key.code == KeyCode::BackTab {
        mods |= KeyModifiers::SHIFT;
    }
    let held: Vec<u32> = MODIFIER_KEYS
        .iter()
        .filter(|(m, _)| mods.contains(*m))
        .map(|(_, sym)| *sym)
        .collect();

    let mut strokes = Vec::with_capacity(held.len() * 2 + 2);
    strokes.extend(held.iter().map(|&m| KeyStroke::down(m)));
    strokes.push(KeyStroke::down(sym));
    strokes.push(KeyStroke::up(sym));
    strokes.extend(held.iter().rev().map(|&m| KeyStroke::up(m)));
    strokes
}
