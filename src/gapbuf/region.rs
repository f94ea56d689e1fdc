//! Mark/region operations: set/clear mark, copy/delete/cut region, paste,
//! cut-to-eol/sol, matching-bracket search, literal Quick-Search, and
//! regex-backed search/replace-region. Rust port of `mods/gapbuf/gapbuf.c`
//! lines 434-826 (`set_mark` through `cut_to_sol`) plus the search/replace
//! helpers (`search`, `regex_replace_region`, `match_bracket`).

use super::GapBuf;
use crate::error::GbError;

impl GapBuf {
    pub fn set_mark(&mut self) {
        self.m = self.cursor_index();
        self.mr = self.r;
        self.m_set = true;
    }

    pub fn clear_mark(&mut self) {
        self.m = 0;
        self.mr = 1;
        self.m_set = false;
    }

    pub fn mark_is_set(&self) -> bool {
        self.m_set
    }

    /// Swaps the cursor and mark positions, moving the cursor to where the
    /// mark was (`switch_cursor_and_mark`).
    pub fn switch_cursor_and_mark(&mut self) {
        let orig = self.cursor_index();
        if !self.m_set || self.m == orig {
            return;
        }
        if self.m < orig {
            while self.cursor_index() != self.m {
                self.step_left();
            }
        } else {
            while self.cursor_index() != self.m {
                self.step_right();
            }
        }
        self.m = orig;
    }

    /// Maps logical index `i` (ignoring the gap) to the physical array index.
    fn index_to_pointer(&self, i: usize) -> usize {
        if i < self.g {
            i
        } else {
            self.c + i - self.g
        }
    }

    /// Copies the region (mark..cursor, NUL-stripped) to an owned `Vec<u8>`.
    /// Returns `None` if the mark is not set (`region_to_str`).
    pub fn region_to_bytes(&self) -> Option<Vec<u8>> {
        if !self.m_set {
            return None;
        }
        let ci = self.cursor_index();
        let (lo, hi) = if self.m < ci { (self.m, ci) } else { (ci, self.m) };
        let mut out = Vec::with_capacity(hi - lo);
        for i in lo..hi {
            let p = self.index_to_pointer(i);
            let ch = self.a[p];
            if ch != 0 {
                out.push(ch);
            }
        }
        Some(out)
    }

    pub fn region_to_string(&self) -> Option<String> {
        self.region_to_bytes().map(|b| String::from_utf8_lossy(&b).into_owned())
    }

    /// Copies the region from `self` into `dst`, moving `dst`'s cursor to
    /// its end first (`copy_region`).
    pub fn copy_region(&self, dst: &mut GapBuf) -> Result<(), GbError> {
        if !self.m_set {
            return Err(GbError::NoMark);
        }
        let ci = self.cursor_index();
        if self.m == ci {
            return Err(GbError::NoMark);
        }
        dst.end_of_buffer();
        let (lo, hi) = if self.m < ci { (self.m, ci) } else { (ci, self.m) };
        let mut region = Vec::with_capacity(hi - lo);
        for i in lo..hi {
            region.push(self.a[self.index_to_pointer(i)]);
        }
        dst.insert_row_adjusted(&region, if self.m < ci { self.r - self.mr } else { self.mr - self.r })?;
        Ok(())
    }

    /// Left-of-gap insert used by `copy_region`/`paste`: appends raw bytes
    /// (including embedded newlines) directly before the cursor and bumps
    /// the row counter by `extra_rows` without re-scanning for `\n`
    /// (mirrors the C source adjusting `p->r` directly).
    fn insert_row_adjusted(&mut self, bytes: &[u8], extra_rows: usize) -> Result<(), GbError> {
        if bytes.is_empty() {
            return Ok(());
        }
        if self.gap_size() < bytes.len() {
            self.grow_gap(bytes.len())?;
        }
        self.a[self.g..self.g + bytes.len()].copy_from_slice(bytes);
        self.g += bytes.len();
        self.r += extra_rows;
        self.set_mod();
        Ok(())
    }

    /// Deletes the region. An empty region with the mark set is a no-op
    /// success (`delete_region`).
    pub fn delete_region(&mut self) -> Result<(), GbError> {
        if !self.m_set {
            return Err(GbError::NoMark);
        }
        let ci = self.cursor_index();
        if self.m == ci {
            self.m_set = false;
            return Ok(());
        }
        if self.m < ci {
            self.g = self.m;
            self.r = self.mr;
        } else {
            self.c = self.index_to_pointer(self.m);
        }
        self.set_mod();
        Ok(())
    }

    pub fn cut_region(&mut self, dst: &mut GapBuf) -> Result<(), GbError> {
        self.copy_region(dst)?;
        self.delete_region()
    }

    /// Pastes (inserts) `src`'s content into `self` `mult` times, left of
    /// the cursor, moving `src`'s cursor to its own end first (`paste`).
    pub fn paste(&mut self, src: &mut GapBuf, mult: usize) -> Result<(), GbError> {
        if mult == 0 {
            return Ok(());
        }
        src.end_of_buffer();
        let content = src.to_bytes();
        if content.is_empty() {
            return Ok(());
        }
        let total = content.len().checked_mul(mult).ok_or(GbError::Overflow)?;
        if self.gap_size() < total {
            self.grow_gap(total)?;
        }
        for _ in 0..mult {
            self.a[self.g..self.g + content.len()].copy_from_slice(&content);
            self.g += content.len();
        }
        let extra_rows = (src.r.saturating_sub(1)).checked_mul(mult).ok_or(GbError::Overflow)?;
        self.r += extra_rows;
        self.set_mod();
        Ok(())
    }

    pub fn cut_to_eol(&mut self, dst: &mut GapBuf) -> Result<(), GbError> {
        if self.c != self.e() && self.a[self.c] == b'\n' {
            return self.delete_ch(1);
        }
        self.set_mark();
        self.end_of_line();
        self.cut_region(dst)
    }

    pub fn cut_to_sol(&mut self, dst: &mut GapBuf) -> Result<(), GbError> {
        self.set_mark();
        self.start_of_line();
        self.cut_region(dst)
    }

    /// Moves the cursor to the matching bracket, or leaves it unchanged and
    /// returns an error if there is no bracket under the cursor or no
    /// match is found (`match_bracket`).
    pub fn match_bracket(&mut self) -> Result<(), GbError> {
        if self.c == self.e() {
            return Err(GbError::NoMatch);
        }
        let orig = self.a[self.c];
        let (target, forward) = match orig {
            b'(' => (b')', true),
            b'{' => (b'}', true),
            b'[' => (b']', true),
            b'<' => (b'>', true),
            b')' => (b'(', false),
            b'}' => (b'{', false),
            b']' => (b'[', false),
            b'>' => (b'<', false),
            _ => return Err(GbError::NoMatch),
        };

        let backup = self.c;
        let mut depth = 1usize;
        if forward {
            while self.c != self.e() {
                self.step_right();
                if self.a[self.c] == orig {
                    depth += 1;
                }
                if self.a[self.c] == target {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
            }
            while self.c != backup {
                self.step_left();
            }
        } else {
            while self.g != 0 {
                self.step_left();
                if self.a[self.c] == orig {
                    depth += 1;
                }
                if self.a[self.c] == target {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
            }
            while self.c != backup {
                self.step_right();
            }
        }
        Err(GbError::NoMatch)
    }

    /// Quick-Search (Sunday's variant of Boyer-Moore): scans strictly after
    /// the cursor for `pattern`, moving the cursor to the match start if
    /// found (`forward_search_literal`).
    pub fn forward_search_literal(&mut self, pattern: &[u8]) -> Result<(), GbError> {
        if pattern.is_empty() || self.c == self.e() {
            return Err(GbError::NoMatch);
        }
        let n = pattern.len();
        let mut bad = [n + 1; 256];
        for (i, &b) in pattern.iter().enumerate() {
            bad[b as usize] = n - i;
        }

        let haystack_start = self.c + 1;
        if haystack_start >= self.e() {
            return Err(GbError::NoMatch);
        }
        let haystack = &self.a[haystack_start..self.e()];
        let hlen = haystack.len();
        if hlen < n {
            return Err(GbError::NoMatch);
        }

        let mut i = 0usize;
        while i + n <= hlen {
            if &haystack[i..i + n] == pattern {
                let match_index = haystack_start + i;
                while self.cursor_index() != match_index {
                    self.step_right();
                }
                return Ok(());
            }
            let next_byte_pos = i + n;
            if next_byte_pos >= hlen {
                break;
            }
            i += bad[haystack[next_byte_pos] as usize];
        }
        Err(GbError::NoMatch)
    }

    /// Regex search strictly after the cursor, optionally newline-sensitive
    /// (anchors per physical line). Moves the cursor to the match start on
    /// success (`regex_forward_search`).
    pub fn regex_forward_search(&mut self, find: &str, nl_sen: bool) -> Result<(), GbError> {
        if self.c == self.e() {
            return Err(GbError::NoMatch);
        }
        let re = crate::rx::compile(find).map_err(GbError::Rx)?;
        let haystack: Vec<u8> = self.a[self.c..self.e()].to_vec();

        let found = if nl_sen {
            let mut offset = 0usize;
            let mut result = None;
            for line in haystack.split(|&b| b == b'\n') {
                if let Some(m) = crate::rx::find_match(&re, line, true) {
                    result = Some(offset + m.start);
                    break;
                }
                offset += line.len() + 1;
            }
            result
        } else {
            crate::rx::find_match(&re, &haystack, true).map(|m| m.start)
        };

        match found {
            Some(off) => {
                let match_index = self.cursor_index() + 1 + off;
                while self.cursor_index() != match_index {
                    self.step_right();
                }
                Ok(())
            }
            None => Err(GbError::NoMatch),
        }
    }

    /// Regex replace over the region. `spec` is `DfindDreplace` where `D` is
    /// any single delimiter byte, e.g. `|cool|wow` (`regex_replace_region`).
    pub fn regex_replace_region(&mut self, spec: &str, nl_sen: bool) -> Result<(), GbError> {
        if !self.m_set || spec.is_empty() {
            return Err(GbError::NoMark);
        }
        let mut bytes = spec.bytes();
        let delim = bytes.next().ok_or(GbError::BadReplaceSpec)?;
        let rest = &spec[1..];
        let split = rest.find(delim as char).ok_or(GbError::BadReplaceSpec)?;
        let find = &rest[..split];
        let replace = &rest[split + 1..];

        let ci = self.cursor_index();
        if self.m == ci {
            return Ok(());
        }

        let region = self.region_to_string().ok_or(GbError::NoMark)?;
        let replaced = crate::rx::regex_replace(&region, find, replace, nl_sen).map_err(GbError::Rx)?;

        self.delete_region()?;
        self.insert_str_right(replaced.as_bytes(), 1)?;
        Ok(())
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
    fn copy_region_appends_to_destination() {
        let mut src = from_str("hello world");
        src.set_mark();
        src.move_right(5).unwrap();
        let mut dst = GapBuf::with_default_size();
        src.copy_region(&mut dst).unwrap();
        assert_eq!(dst.to_string_lossy(), "hello");
    }

    #[test]
    fn delete_region_removes_marked_span() {
        let mut b = from_str("hello world");
        b.set_mark();
        b.move_right(6).unwrap();
        b.delete_region().unwrap();
        assert_eq!(b.to_string_lossy(), "world");
    }

    #[test]
    fn delete_region_empty_is_noop_success() {
        let mut b = from_str("hello");
        b.set_mark();
        b.delete_region().unwrap();
        assert_eq!(b.to_string_lossy(), "hello");
    }

    #[test]
    fn cut_region_moves_text_into_clipboard() {
        let mut b = from_str("hello world");
        let mut clip = GapBuf::with_default_size();
        b.set_mark();
        b.move_right(5).unwrap();
        b.cut_region(&mut clip).unwrap();
        assert_eq!(b.to_string_lossy(), " world");
        assert_eq!(clip.to_string_lossy(), "hello");
    }

    #[test]
    fn paste_inserts_clipboard_content() {
        let mut b = from_str("world");
        let mut clip = from_str("hello ");
        b.paste(&mut clip, 1).unwrap();
        assert_eq!(b.to_string_lossy(), "hello world");
    }

    #[test]
    fn match_bracket_finds_partner() {
        let mut b = from_str("(a(b)c)");
        b.match_bracket().unwrap();
        assert_eq!(b.cursor_index(), 6);
    }

    #[test]
    fn match_bracket_on_non_bracket_errors() {
        let mut b = from_str("abc");
        assert!(b.match_bracket().is_err());
    }

    #[test]
    fn forward_search_literal_finds_first_occurrence_after_cursor() {
        let mut b = from_str("one two three two");
        b.forward_search_literal(b"two").unwrap();
        assert_eq!(b.cursor_index(), 4);
    }

    #[test]
    fn forward_search_literal_no_match() {
        let mut b = from_str("one two three");
        assert!(b.forward_search_literal(b"xyz").is_err());
    }

    #[test]
    fn regex_replace_region_substitutes_match() {
        let mut b = from_str("hello world");
        b.set_mark();
        b.end_of_buffer();
        b.regex_replace_region("|world|there|", false).unwrap();
        assert_eq!(b.to_string_lossy(), "hello there");
    }
}
