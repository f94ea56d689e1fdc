//! RX — the backtracking regex engine (§4.3).
//!
//! Split the way the teacher splits `block/` into `compress.rs` /
//! `decompress_core.rs` / `decompress_api.rs`: `compile.rs` turns a pattern
//! string into a `CompiledRegex`, `matcher.rs` walks it against a subject,
//! `replace.rs` implements the line-sensitive find/replace built on top.
//!
//! Grounded on `mods/regex/regex.c` (atom-chain + capture-group table +
//! match-count bookkeeping) but extended with `\w\d\s` classes and `{m,n}`
//! quantifiers per spec — the C source predates those (see DESIGN.md).

mod compile;
mod matcher;
mod replace;

pub use compile::{compile, CompiledRegex};
pub use replace::regex_replace;

pub(crate) use matcher::find_match;

/// Maximum number of numbered capture groups, including group 0
/// (`mods/regex/regex.c`'s `NUM_CAP_GRP`).
pub const NUM_CAP_GRP: usize = crate::config::NUM_CAP_GRP;

#[derive(Debug, Clone, Copy)]
pub struct Atom {
    pub(crate) set: [bool; 256],
    pub(crate) negate: bool,
    pub(crate) min_occ: isize,
    pub(crate) max_occ: isize, // -1 means unbounded
}

impl Atom {
    fn new_literal(byte: u8) -> Self {
        let mut set = [false; 256];
        set[byte as usize] = true;
        Atom { set, negate: false, min_occ: 1, max_occ: 1 }
    }

    fn new_any() -> Self {
        Atom { set: [true; 256], negate: false, min_occ: 1, max_occ: 1 }
    }

    fn new_empty_class() -> Self {
        Atom { set: [false; 256], negate: false, min_occ: 1, max_occ: 1 }
    }

    pub(crate) fn matches(&self, byte: u8) -> bool {
        self.set[byte as usize] != self.negate
    }

    pub(crate) fn is_fixed_one(&self) -> bool {
        self.min_occ == 1 && self.max_occ == 1
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CaptureSlot {
    pub atom_start: Option<usize>,
    pub atom_end: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_atom_matches_only_its_byte() {
        let a = Atom::new_literal(b'x');
        assert!(a.matches(b'x'));
        assert!(!a.matches(b'y'));
    }

    #[test]
    fn any_atom_matches_everything() {
        let a = Atom::new_any();
        assert!(a.matches(0));
        assert!(a.matches(255));
    }
}
