//! A minimal terminal screen: raw-mode keyboard input plus a double
//! buffered, diff-drawn virtual screen, used by the `spot` editor.
//!
//! Grounded on `mods/minicurses/minicurses.h`/`.c`: `ns`/`cs` (next/current
//! screen) become [`Screen::next`]/[`Screen::current`], `v` becomes
//! [`Screen::cursor`], `printch`/`move_cursor`/`erase`/`refresh` are ported
//! below. The original talks to a real terminal through raw `termios` and
//! ANSI escapes by hand; here `crossterm` owns raw-mode setup and cursor/
//! attribute control, since that is the crate this codebase reaches for
//! whenever it needs a terminal (see DESIGN.md).
//!
//! | Rust                  | C (`mods/minicurses/minicurses.c`) |
//! |-------------------------|---------------------------------------|
//! | `Screen::new`            | `initscr`                             |
//! | `Screen::print_ch`       | `printch`                              |
//! | `Screen::move_cursor`    | `move_cursor`                          |
//! | `Screen::erase`          | `erase`                                |
//! | `Screen::refresh`        | `refresh`                              |
//! | `Screen::close`          | `endwin`                               |
//! | `read_key`               | `getch`                                |

mod key;

pub use key::Key;

use crossterm::{cursor, event, execute, queue, style, terminal};
use std::io::{self, Write};

const TABSIZE: usize = 4;

/// The double-buffered virtual screen: `current` is what's physically on
/// the terminal (as far as this process knows), `next` is what the next
/// `refresh` should make it look like.
pub struct Screen {
    w: usize,
    h: usize,
    current: Vec<u8>,
    next: Vec<u8>,
    /// Flat `y * w + x` index of the virtual cursor.
    cursor: usize,
    inverse: bool,
    hard: bool,
    raw_mode_active: bool,
}

impl Screen {
    /// Enters raw mode and the alternate screen, sizing to the current
    /// terminal dimensions (`initscr`).
    pub fn new() -> io::Result<Self> {
        let (w, h) = terminal::size().map(|(w, h)| (w as usize, h as usize))?;
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        let sa = w * h;
        Ok(Screen {
            w,
            h,
            current: vec![b' '; sa],
            next: vec![b' '; sa],
            cursor: 0,
            inverse: false,
            hard: true,
            raw_mode_active: true,
        })
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn standout(&mut self) {
        self.inverse = true;
    }

    pub fn standend(&mut self) {
        self.inverse = false;
    }

    fn ivch(&self, ch: u8) -> u8 {
        if self.inverse { ch | 0x80 } else { ch }
    }

    /// Zero-based; top-left is `(0, 0)`. Returns `Err` if out of bounds
    /// (`move_cursor`).
    pub fn move_cursor(&mut self, y: usize, x: usize) -> Result<(), ()> {
        if y < self.h && x < self.w {
            self.cursor = y * self.w + x;
            Ok(())
        } else {
            Err(())
        }
    }

    pub fn get_cursor(&self) -> (usize, usize) {
        (self.cursor / self.w, self.cursor % self.w)
    }

    /// Clears from the cursor to the end of the virtual screen (`erase_down`
    /// when the cursor isn't at the origin; `erase` calls this at (0,0)).
    pub fn erase_down(&mut self) -> Result<(), ()> {
        if self.cursor < self.next.len() {
            for b in &mut self.next[self.cursor..] {
                *b = b' ';
            }
            Ok(())
        } else {
            Err(())
        }
    }

    pub fn erase(&mut self) -> Result<(), ()> {
        self.cursor = 0;
        self.erase_down()
    }

    pub fn clear(&mut self) -> Result<(), ()> {
        self.erase()?;
        self.hard = true;
        Ok(())
    }

    /// Prints one character to the virtual screen at the cursor, advancing
    /// it. Tabs expand to `TABSIZE` spaces; non-graphic, non-space,
    /// non-newline, non-tab bytes render as `?` (`printch`).
    pub fn print_ch(&mut self, ch: u8) -> Result<(), ()> {
        if self.cursor >= self.next.len() {
            return Err(());
        }
        if ch.is_ascii_graphic() || ch == b' ' {
            self.next[self.cursor] = self.ivch(ch);
            self.cursor += 1;
        } else if ch == b'\n' {
            self.next[self.cursor] = self.ivch(b' ');
            self.cursor += 1;
            if self.cursor % self.w != 0 {
                self.cursor = (self.cursor / self.w + 1) * self.w;
            }
        } else if ch == b'\t' {
            let end = (self.cursor + TABSIZE).min(self.next.len());
            for b in &mut self.next[self.cursor..end] {
                *b = self.ivch(b' ');
            }
            self.cursor += TABSIZE;
        } else {
            self.next[self.cursor] = self.ivch(b'?');
            self.cursor += 1;
        }
        if self.cursor >= self.next.len() {
            Err(())
        } else {
            Ok(())
        }
    }

    pub fn print_str(&mut self, s: &[u8]) {
        for &b in s {
            if self.print_ch(b).is_err() {
                break;
            }
        }
    }

    /// Flushes the diff between `current` and `next` to the real terminal,
    /// moving the physical cursor only for runs that actually changed
    /// (`refresh`).
    pub fn refresh(&mut self) -> io::Result<()> {
        let mut out = io::stdout();
        if self.hard {
            queue!(out, terminal::Clear(terminal::ClearType::All))?;
            self.hard = false;
        }

        let mut i = 0;
        while i < self.next.len() {
            if self.next[i] != self.current[i] {
                let y = i / self.w;
                let x = i % self.w;
                queue!(out, cursor::MoveTo(x as u16, y as u16))?;
                let run_start = i;
                while i < self.next.len() && i / self.w == y && self.next[i] != self.current[i] {
                    i += 1;
                }
                self.write_run(&mut out, run_start, i)?;
            } else {
                i += 1;
            }
        }

        self.current.copy_from_slice(&self.next);
        let (y, x) = self.get_cursor();
        queue!(out, cursor::MoveTo(x as u16, y as u16))?;
        out.flush()
    }

    fn write_run(&self, out: &mut impl Write, start: usize, end: usize) -> io::Result<()> {
        for &byte in &self.next[start..end] {
            let plain = byte & 0x7f;
            if byte & 0x80 != 0 {
                queue!(out, style::SetAttribute(style::Attribute::Reverse))?;
                queue!(out, style::Print(plain as char))?;
                queue!(out, style::SetAttribute(style::Attribute::NoReverse))?;
            } else {
                queue!(out, style::Print(plain as char))?;
            }
        }
        Ok(())
    }

    /// Leaves the alternate screen and restores normal terminal mode
    /// (`endwin`).
    pub fn close(&mut self) -> io::Result<()> {
        if self.raw_mode_active {
            execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
            terminal::disable_raw_mode()?;
            self.raw_mode_active = false;
        }
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Blocks for the next key event (`getch`).
pub fn read_key() -> io::Result<Key> {
    loop {
        if let event::Event::Key(k) = event::read()? {
            if k.kind == event::KeyEventKind::Press {
                return Ok(key::from_crossterm(k));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_screen(w: usize, h: usize) -> Screen {
        Screen {
            w,
            h,
            current: vec![b' '; w * h],
            next: vec![b' '; w * h],
            cursor: 0,
            inverse: false,
            hard: true,
            raw_mode_active: false,
        }
    }

    #[test]
    fn print_ch_advances_cursor() {
        let mut s = bare_screen(10, 3);
        s.print_ch(b'a').unwrap();
        s.print_ch(b'b').unwrap();
        assert_eq!(s.get_cursor(), (0, 2));
        assert_eq!(&s.next[0..2], b"ab");
    }

    #[test]
    fn newline_wraps_to_next_row_start() {
        let mut s = bare_screen(5, 3);
        s.move_cursor(0, 2).unwrap();
        s.print_ch(b'\n').unwrap();
        assert_eq!(s.get_cursor(), (1, 0));
    }

    #[test]
    fn tab_expands_to_tabsize_spaces() {
        let mut s = bare_screen(10, 3);
        s.print_ch(b'\t').unwrap();
        assert_eq!(s.get_cursor(), (0, TABSIZE));
    }

    #[test]
    fn move_cursor_out_of_bounds_errors() {
        let mut s = bare_screen(5, 5);
        assert!(s.move_cursor(10, 0).is_err());
    }

    #[test]
    fn erase_down_clears_from_cursor() {
        let mut s = bare_screen(4, 1);
        s.print_str(b"abcd");
        s.move_cursor(0, 1).unwrap();
        s.erase_down().unwrap();
        assert_eq!(&s.next, b"a   ");
    }
}
