//! `Buf` — a push-back byte stack used both as an input re-reading buffer
//! and as an output accumulation buffer.
//!
//! | Rust                  | C (`mods/buf/buf.c`)      |
//! |------------------------|----------------------------|
//! | `Buf::new`             | `init_buf`                 |
//! | `Buf::unget`/`Buf::put`| `unget_ch`/`put_ch` (same fn, two names) |
//! | `Buf::get`             | `get_ch` macro              |
//! | `Buf::del`             | `del_ch`                    |
//! | `Buf::include`         | `include`                   |
//! | `Buf::clear`           | `delete_buf`                |
//! | `Buf::unget_str`       | `unget_str`                 |
//! | `Buf::put_str`/`put_mem`| `put_str`/`put_mem`         |
//! | `Buf::dump_into`       | `buf_dump_buf`              |
//!
//! The C struct tracks a capacity `s` and length `i` over a manually grown
//! `malloc`/`realloc` array; `Vec<u8>` already gives overflow-checked growth,
//! so `Buf` is a thin semantic wrapper rather than a reimplementation of
//! `grow_buf`.

use crate::error::BufError;
use crate::fs_util;
use std::path::Path;

/// A byte stack: index 0 is the bottom, the last element is the top.
/// Reading (`get`) pops from the top; writing (`put`/`unget`) pushes.
#[derive(Debug, Default, Clone)]
pub struct Buf {
    a: Vec<u8>,
}

impl Buf {
    pub fn new() -> Self {
        Buf {
            a: Vec::with_capacity(crate::config::INIT_BUF_SIZE),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Buf { a: Vec::with_capacity(cap) }
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Pushes one byte onto the top of the stack. Used for both `unget_ch`
    /// (input re-reading) and `put_ch` (output) in the C source — the C
    /// names are preserved as two thin aliases below.
    pub fn push(&mut self, byte: u8) {
        self.a.push(byte);
    }

    pub fn unget(&mut self, byte: u8) {
        self.push(byte);
    }

    pub fn put(&mut self, byte: u8) {
        self.push(byte);
    }

    /// Pops the top byte, or `None` at the bottom of the stack
    /// (`get_ch`'s `EOF` case when `read_stdin` is false).
    pub fn get(&mut self) -> Option<u8> {
        self.a.pop()
    }

    /// Removes the top byte without returning it. Returns `Err` if the
    /// stack is already empty (`del_ch` returning 1).
    pub fn del(&mut self) -> Result<(), BufError> {
        if self.a.pop().is_some() {
            Ok(())
        } else {
            Err(BufError::Overflow)
        }
    }

    pub fn clear(&mut self) {
        self.a.clear();
    }

    /// Pushes each byte of `s` so that popping the buffer afterward yields
    /// the bytes of `s` back in forward order (`unget_str`).
    pub fn unget_str(&mut self, s: &[u8]) {
        self.a.extend(s.iter().rev());
    }

    /// Appends `s` in forward order, top-of-stack last (`put_str`).
    pub fn put_str(&mut self, s: &[u8]) {
        self.a.extend_from_slice(s);
    }

    pub fn put_mem(&mut self, mem: &[u8]) {
        self.a.extend_from_slice(mem);
    }

    /// Loads the contents of `path` so that popping this buffer yields the
    /// file's bytes in forward (start-to-end) order — the file is pushed in
    /// reverse, mirroring `include`'s backwards `getc` loop.
    pub fn include<P: AsRef<Path>>(&mut self, path: P) -> Result<(), BufError> {
        let contents = fs_util::read_file_bytes(path.as_ref())?;
        self.a.reserve(contents.len());
        self.a.extend(contents.iter().rev());
        Ok(())
    }

    /// Moves all of `src`'s content onto the top of `self`, emptying `src`
    /// (`buf_dump_buf`).
    pub fn dump_into(&mut self, src: &mut Buf) {
        self.a.extend_from_slice(&src.a);
        src.a.clear();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.a
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.a
    }

    /// Writes the buffer's bottom-to-top bytes to `path` using the shared
    /// atomic write protocol (`write_buf`).
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), BufError> {
        fs_util::atomic_write(path.as_ref(), &self.a)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut b = Buf::new();
        b.push(b'a');
        b.push(b'b');
        assert_eq!(b.get(), Some(b'b'));
        assert_eq!(b.get(), Some(b'a'));
        assert_eq!(b.get(), None);
    }

    #[test]
    fn unget_str_reads_back_forward() {
        let mut b = Buf::new();
        b.unget_str(b"abc");
        assert_eq!(b.get(), Some(b'a'));
        assert_eq!(b.get(), Some(b'b'));
        assert_eq!(b.get(), Some(b'c'));
    }

    #[test]
    fn include_round_trips_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, b"hello").unwrap();
        let mut b = Buf::new();
        b.include(&path).unwrap();
        let mut out = Vec::new();
        while let Some(c) = b.get() {
            out.push(c);
        }
        assert_eq!(out, b"hello");
    }

    #[test]
    fn del_on_empty_errs() {
        let mut b = Buf::new();
        assert!(b.del().is_err());
    }

    #[test]
    fn dump_into_moves_and_empties_source() {
        let mut dst = Buf::new();
        let mut src = Buf::new();
        src.put_str(b"xyz");
        dst.dump_into(&mut src);
        assert!(src.is_empty());
        assert_eq!(dst.as_slice(), b"xyz");
    }
}
