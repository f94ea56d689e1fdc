//! Compile-time tunables, centralized the way the teacher centralizes
//! `lz4conf.h`'s constants in its own `config.rs`.

/// Initial allocation for `Buf` (`mods/buf/buf.c`'s `INIT_BUF_SIZE`).
pub const INIT_BUF_SIZE: usize = 512;

/// Initial gap size for a freshly created gap buffer (`mods/gapbuf/gapbuf.c`).
pub const INIT_GAP_SIZE: usize = 256;

/// Bucket count for the m4 macro symbol table (`apps/m4/m4.c`'s
/// `HASH_TABLE_SIZE`).
pub const M4_HASH_TABLE_SIZE: usize = 16384;

/// Bucket count for capybara's whole-store dedup index
/// (`apps/capybara/capybara.c`).
pub const CAPYBARA_HASH_TABLE_SIZE: usize = 262144;

/// Maximum number of regex capture groups (`mods/regex/regex.c`'s
/// `NUM_CAP_GRP`).
pub const NUM_CAP_GRP: usize = 10;

/// Chunk size used by streaming readers (`freq`, `sha256`, `delim`) —
/// mirrors the C sources' use of `BUFSIZ`-sized reads.
pub const READ_CHUNK_SIZE: usize = 8192;

/// Number of m4 output diversions, including diversion 0 (direct output)
/// and the discard slot 10 (`apps/m4/m4.c`).
pub const NUM_DIVERSIONS: usize = 11;
pub const DISCARD_DIVERSION: usize = 10;

/// `forward_word`/`backward_word` case-conversion mode (`mods/gapbuf/gapbuf.c`'s
/// `mode` parameter: 0 = pass through, 1 = uppercase, 2 = lowercase).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCaseMode {
    PassThrough,
    Uppercase,
    Lowercase,
}
