//! SHA-256 file hashing, used by `lsha256` and `capybara`.
//!
//! `mods/sha256/sha256.c`'s `sha256(char *fn)` contract (file path in, hex
//! digest out) is preserved; the round function itself is not hand-ported —
//! cryptographic primitives are the ecosystem's job, so this wraps `sha2`.

use crate::config::READ_CHUNK_SIZE;
use crate::error::FsError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Hashes the file at `path`, returning its digest as a lowercase hex string.
pub fn sha256_file(path: &Path) -> Result<String, FsError> {
    let mut f = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let n = f.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        hasher.update(&chunk[..n]);
    }
    Ok(hex_digest(&hasher.finalize()))
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_has_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        std::fs::write(&path, b"").unwrap();
        let digest = sha256_file(&path).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn same_content_same_digest() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, b"identical content").unwrap();
        std::fs::write(&b, b"identical content").unwrap();
        assert_eq!(sha256_file(&a).unwrap(), sha256_file(&b).unwrap());
    }
}
