//! Shared library backing the `spot`, `m4`, `delim`, `freq`, `lsha256`,
//! `regr`, and `capybara` binaries: a gap-buffered text model, an m4-style
//! macro engine, a backtracking regex engine, and the small utility layers
//! (push-back byte buffer, hash table, SHA-256, filesystem helpers,
//! logging) they all share.

pub mod buf;
pub mod config;
pub mod error;
pub mod fs_util;
pub mod gapbuf;
pub mod hashtable;
pub mod logging;
pub mod m4;
pub mod rx;
pub mod sha256;
pub mod tui;

pub use buf::Buf;
pub use gapbuf::{GapBuf, GapBufRing};
pub use hashtable::HashTable;
pub use m4::M4;
