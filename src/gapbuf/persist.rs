//! File I/O: reading a file into the buffer and writing the buffer back out
//! atomically. Rust port of `mods/gapbuf/gapbuf.c`'s `insert_file`/`write_file`.

use super::GapBuf;
use crate::error::GbError;
use std::path::Path;

impl GapBuf {
    /// Reads `path` and inserts its bytes right of the cursor
    /// (`insert_file`). Does not set `filename`.
    pub fn insert_file(&mut self, path: impl AsRef<Path>) -> Result<(), GbError> {
        let bytes = crate::fs_util::read_file_bytes(path.as_ref())?;
        self.insert_str_right(&bytes, 1)
    }

    /// Reads `path` into a fresh, empty buffer and records it as the
    /// buffer's filename (used when opening a file for editing).
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, GbError> {
        let bytes = crate::fs_util::read_file_bytes(path.as_ref())?;
        let mut b = GapBuf::with_default_size();
        b.insert_str_right(&bytes, 1)?;
        b.start_of_buffer();
        b.set_filename(path.as_ref().to_path_buf());
        b.modified = false;
        Ok(b)
    }

    /// Atomically writes the buffer's content to its associated filename,
    /// clearing the modified flag on success (`write_file`).
    pub fn write_file(&mut self) -> Result<(), GbError> {
        let path = self.filename.clone().ok_or(GbError::NoFilename)?;
        self.write_file_as(&path)?;
        Ok(())
    }

    /// Atomically writes the buffer's content to an explicit path without
    /// requiring (or changing) the buffer's associated filename
    /// (`write_file` invoked with an explicit name, e.g. `write-as`).
    pub fn write_file_as(&mut self, path: impl AsRef<Path>) -> Result<(), GbError> {
        crate::fs_util::atomic_write(path.as_ref(), &self.to_bytes())?;
        self.modified = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.txt");

        let mut b = GapBuf::with_default_size();
        b.insert_str_right(b"hello, gap buffer\n", 1).unwrap();
        b.set_filename(&path);
        b.write_file().unwrap();
        assert!(!b.is_modified());

        let loaded = GapBuf::load_file(&path).unwrap();
        assert_eq!(loaded.to_string_lossy(), "hello, gap buffer\n");
        assert!(!loaded.is_modified());
    }

    #[test]
    fn write_file_without_filename_errors() {
        let mut b = GapBuf::with_default_size();
        b.insert_str_right(b"x", 1).unwrap();
        assert!(matches!(b.write_file(), Err(GbError::NoFilename)));
    }

    #[test]
    fn insert_file_splices_at_cursor() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chunk.txt");
        std::fs::write(&path, b"inserted").unwrap();

        let mut b = GapBuf::with_default_size();
        b.insert_str_right(b"before after", 1).unwrap();
        b.start_of_buffer();
        b.move_right(7).unwrap();
        b.insert_file(&path).unwrap();
        assert_eq!(b.to_string_lossy(), "before insertedafter");
        assert!(b.is_modified());
    }
}
