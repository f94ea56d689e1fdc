//! Keyboard input mapping. Mirrors `minicurses.h`'s `KEY_*` constants,
//! translated from `crossterm`'s key event model instead of a hand-rolled
//! escape-sequence parser.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// A control character, e.g. `^X` is `Ctrl('x')`.
    Ctrl(char),
    Enter,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    /// `Esc` followed immediately by another key (the editor's meta-prefixed
    /// bindings, e.g. `^[ !`).
    Meta(char),
    Esc,
    Unknown,
}

pub(super) fn from_crossterm(ev: KeyEvent) -> Key {
    if ev.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char(c) = ev.code {
            return Key::Ctrl(c);
        }
    }
    match ev.code {
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Esc => Key::Esc,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_char_maps_to_ctrl_variant() {
        let ev = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(from_crossterm(ev), Key::Ctrl('x'));
    }

    #[test]
    fn plain_char_passes_through() {
        let ev = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(from_crossterm(ev), Key::Char('a'));
    }
}
