//! Filesystem helpers shared by every component.
//!
//! | Rust                    | C (`mods/fs/fs.c`)   |
//! |--------------------------|-----------------------|
//! | `read_file_bytes`         | `file_to_str`          |
//! | `atomic_write`            | `atomic_write`         |
//! | `read_pair_file`          | `read_pair_file`       |
//! | `walk_files`              | `walk_dir`             |
//!
//! `std::fs`/`walkdir` already give overflow-safe, portable versions of
//! `filesize`/`is_dir`/`walk_dir`, so those are not reimplemented as
//! separate functions here.

use crate::error::FsError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn read_file_bytes(path: &Path) -> Result<Vec<u8>, FsError> {
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    Ok(buf)
}

pub fn read_file_string(path: &Path) -> Result<String, FsError> {
    let bytes = read_file_bytes(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes `contents` to `path` atomically: write to `path~`, fsync the
/// file, preserve the mode of an existing file at `path`, fsync the
/// containing directory, then rename over `path`. Mirrors `atomic_write`.
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<(), FsError> {
    let tmp = sibling_tilde_path(path);
    {
        let mut f = File::create(&tmp)?;
        use std::io::Write;
        f.write_all(contents)?;
        f.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(meta) = std::fs::metadata(path) {
                let perm = std::fs::Permissions::from_mode(meta_mode(&meta));
                std::fs::set_permissions(&tmp, perm)?;
            }
            f.sync_all()?;
        }
        #[cfg(not(unix))]
        {
            f.sync_all()?;
        }
    }

    std::fs::rename(&tmp, path)?;

    #[cfg(unix)]
    fsync_parent_dir(path)?;

    Ok(())
}

#[cfg(unix)]
fn meta_mode(meta: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o777
}

#[cfg(unix)]
fn fsync_parent_dir(path: &Path) -> Result<(), FsError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = dir.unwrap_or_else(|| Path::new("."));
    let d = File::open(dir)?;
    d.sync_all()?;
    Ok(())
}

fn sibling_tilde_path(path: &Path) -> std::path::PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push("~");
    std::path::PathBuf::from(s)
}

/// Parses a `name\0def\0name\0def\0...` file, trailing `\0` required,
/// calling `on_pair` for each `(name, def)`. Mirrors `read_pair_file`.
pub fn read_pair_file(
    path: &Path,
    mut on_pair: impl FnMut(&[u8], &[u8]),
) -> Result<(), FsError> {
    let data = match std::fs::read(path) {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    if data.is_empty() {
        return Ok(());
    }
    if *data.last().unwrap() != 0 {
        return Err(FsError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "pair file does not end in a nul byte",
        )));
    }
    let mut rest = &data[..data.len() - 1];
    while let Some(nul) = rest.iter().position(|&b| b == 0) {
        let name = &rest[..nul];
        let after = &rest[nul + 1..];
        if let Some(nul2) = after.iter().position(|&b| b == 0) {
            let def = &after[..nul2];
            on_pair(name, def);
            rest = &after[nul2 + 1..];
        } else {
            let def = after;
            on_pair(name, def);
            break;
        }
    }
    Ok(())
}

/// Recursively visits every regular file under `root`, calling `visit`
/// with each file's path. Mirrors `walk_dir`.
pub fn walk_files(root: &Path, mut visit: impl FnMut(&Path) -> Result<(), FsError>) -> Result<(), FsError> {
    for entry in walkdir::WalkDir::new(root).into_iter() {
        let entry = entry.map_err(|e| {
            FsError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        })?;
        if entry.file_type().is_file() {
            visit(entry.path())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        atomic_write(&path, b"hello world").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
        // no leftover tilde file
        assert!(!dir.path().join("out.txt~").exists());
    }

    #[test]
    fn atomic_write_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, b"old").unwrap();
        atomic_write(&path, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn read_pair_file_parses_name_def_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairs");
        let mut data = Vec::new();
        data.extend_from_slice(b"foo\0bar\0baz\0qux\0");
        std::fs::write(&path, &data).unwrap();
        let mut pairs = Vec::new();
        read_pair_file(&path, |name, def| {
            pairs.push((name.to_vec(), def.to_vec()));
        })
        .unwrap();
        assert_eq!(pairs, vec![
            (b"foo".to_vec(), b"bar".to_vec()),
            (b"baz".to_vec(), b"qux".to_vec()),
        ]);
    }

    #[test]
    fn read_pair_file_rejects_missing_trailing_nul() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad");
        std::fs::write(&path, b"foo\0bar").unwrap();
        assert!(read_pair_file(&path, |_, _| {}).is_err());
    }
}
