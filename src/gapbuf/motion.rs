//! Cursor motion: line/word/vertical movement with sticky-column tracking,
//! and `trim_clean`. Rust port of `mods/gapbuf/gapbuf.c` lines 195-421.

use super::GapBuf;
use crate::error::GbError;

pub use crate::config::WordCaseMode;

impl GapBuf {
    pub fn start_of_buffer(&mut self) {
        while self.g != 0 {
            self.step_left();
        }
    }

    pub fn end_of_buffer(&mut self) {
        while self.c != self.e() {
            self.step_right();
        }
    }

    pub fn start_of_line(&mut self) {
        while self.g != 0 && self.a[self.g - 1] != b'\n' {
            self.step_left();
        }
    }

    pub fn end_of_line(&mut self) {
        while self.c != self.e() && self.a[self.c] != b'\n' {
            self.step_right();
        }
    }

    /// Zero-based column number of the cursor (`col_num`).
    pub fn col_num(&self) -> usize {
        let mut q = self.g;
        while q != 0 && self.a[q - 1] != b'\n' {
            q -= 1;
        }
        self.g - q
    }

    /// Clears the sticky column. Any non-vertical operation should call
    /// this so the next vertical move re-derives the column from the
    /// cursor's current position (§4.4's sticky-column policy).
    pub fn clear_sticky_column(&mut self) {
        self.sc_set = false;
    }

    pub fn up_line(&mut self, mult: usize) -> Result<(), GbError> {
        if mult == 0 {
            return Ok(());
        }
        let target_row = self.r.checked_sub(mult).ok_or(GbError::OutOfRange)?;
        if target_row == 0 {
            return Err(GbError::OutOfRange);
        }

        let col = if self.sc_set {
            self.sc
        } else {
            let c = self.col_num();
            self.sc = c;
            self.sc_set = true;
            c
        };

        while self.g != 0 && self.r != target_row {
            self.step_left();
        }
        self.start_of_line();
        let mut remaining = col;
        while self.c != self.e() && remaining > 0 && self.a[self.c] != b'\n' {
            self.step_right();
            remaining -= 1;
        }
        Ok(())
    }

    pub fn down_line(&mut self, mult: usize) -> Result<(), GbError> {
        if mult == 0 {
            return Ok(());
        }
        let target_row = self.r.checked_add(mult).ok_or(GbError::Overflow)?;
        let backup = self.c;

        let col = if self.sc_set { self.sc } else { self.col_num() };

        while self.c != self.e() && self.r != target_row {
            self.step_right();
        }

        if self.r != target_row {
            while self.c != backup {
                self.step_left();
            }
            return Err(GbError::OutOfRange);
        }

        if !self.sc_set {
            self.sc = col;
            self.sc_set = true;
        }

        let mut remaining = col;
        while self.c != self.e() && remaining > 0 && self.a[self.c] != b'\n' {
            self.step_right();
            remaining -= 1;
        }
        Ok(())
    }

    /// Moves forward up to `mult` words, optionally upper/lowercasing each
    /// word as it is traversed (`forward_word`). Only ASCII alphanumerics
    /// count as word material.
    pub fn forward_word(&mut self, mode: WordCaseMode, mult: usize) {
        if mult == 0 {
            return;
        }
        let mut modified = false;
        let mut remaining = mult;
        while self.c != self.e() && remaining > 0 {
            remaining -= 1;
            while self.c != self.e() && self.a[self.c].is_ascii() && !self.a[self.c].is_ascii_alphanumeric() {
                self.step_right();
            }
            while self.c != self.e() && self.a[self.c].is_ascii() && self.a[self.c].is_ascii_alphanumeric() {
                match mode {
                    WordCaseMode::PassThrough => {}
                    WordCaseMode::Uppercase => {
                        if self.a[self.c].is_ascii_lowercase() {
                            self.a[self.c] = self.a[self.c].to_ascii_uppercase();
                            modified = true;
                        }
                    }
                    WordCaseMode::Lowercase => {
                        if self.a[self.c].is_ascii_uppercase() {
                            self.a[self.c] = self.a[self.c].to_ascii_lowercase();
                            modified = true;
                        }
                    }
                }
                self.step_right();
            }
        }
        if modified {
            self.set_mod();
        }
    }

    pub fn backward_word(&mut self, mult: usize) {
        if mult == 0 {
            return;
        }
        let mut remaining = mult;
        while self.g != 0 && remaining > 0 {
            remaining -= 1;
            while self.g != 0 && self.a[self.g - 1].is_ascii() && !self.a[self.g - 1].is_ascii_alphanumeric() {
                self.step_left();
            }
            while self.g != 0 && self.a[self.g - 1].is_ascii() && self.a[self.g - 1].is_ascii_alphanumeric() {
                self.step_left();
            }
        }
    }

    /// Deletes trailing whitespace at end-of-line, deletes any byte that is
    /// neither printable, space, tab nor newline, and preserves exactly one
    /// trailing newline at end-of-buffer, restoring the cursor to the
    /// closest feasible row/column afterward (`trim_clean`).
    pub fn trim_clean(&mut self) {
        let r_backup = self.r;
        let mut col = self.col_num();
        let mut nl_found = false;
        let mut modified = false;

        self.end_of_buffer();

        while self.g != 0 {
            self.step_left();
            let ch = self.a[self.c];
            if ch.is_ascii_graphic() {
                break;
            } else if ch == b'\n' && !nl_found {
                nl_found = true;
            } else {
                self.c += 1; // DELETECH
                modified = true;
            }
        }

        let mut at_eol = false;
        while self.g != 0 {
            self.step_left();
            let ch = self.a[self.c];
            if ch == b'\n' {
                at_eol = true;
            } else if ch.is_ascii_graphic() {
                at_eol = false;
            } else if at_eol {
                self.c += 1;
                modified = true;
            } else if ch != b' ' && ch != b'\t' && ch != b'\n' {
                self.c += 1;
                modified = true;
            }
        }

        if modified {
            self.set_mod();
        }

        while self.c != self.e() && self.r != r_backup {
            self.step_right();
        }
        while self.c != self.e() && col > 0 && self.a[self.c] != b'\n' {
            self.step_right();
            col -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_str(s: &str) -> GapBuf {
        let mut b = GapBuf::with_default_size();
        b.insert_str_right(s.as_bytes(), 1).unwrap();
        b.start_of_buffer();
        b
    }

    #[test]
    fn start_end_of_line() {
        let mut b = from_str("abc\ndef\n");
        b.end_of_line();
        assert_eq!(b.cursor_index(), 3);
        b.move_right(1).unwrap();
        b.end_of_line();
        assert_eq!(b.cursor_index(), 7);
        b.start_of_line();
        assert_eq!(b.cursor_index(), 4);
    }

    #[test]
    fn up_down_line_sticky_column() {
        let mut b = from_str("abcdef\nxy\nuvwxyz\n");
        b.move_right(5).unwrap(); // col 5 on line 1
        b.down_line(1).unwrap();
        // line 2 ("xy") is too short: clamp to col 2
        assert_eq!(b.col_num(), 2);
        b.down_line(1).unwrap();
        // sticky column remembers 5 on line 3
        assert_eq!(b.col_num(), 5);
    }

    #[test]
    fn forward_word_uppercases() {
        let mut b = from_str("hello world");
        b.forward_word(WordCaseMode::Uppercase, 1);
        assert_eq!(b.to_string_lossy(), "HELLO world");
    }

    #[test]
    fn backward_word_moves_to_word_start() {
        let mut b = from_str("hello world");
        b.end_of_buffer();
        b.backward_word(1);
        assert_eq!(b.cursor_index(), 6);
    }

    #[test]
    fn trim_clean_strips_trailing_whitespace_and_keeps_one_newline() {
        let mut b = from_str("abc   \ndef\t\n\n\n");
        b.trim_clean();
        assert_eq!(b.to_string_lossy(), "abc\ndef\n");
    }
}
