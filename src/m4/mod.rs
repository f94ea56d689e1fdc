//! M4 — the macro processor (§4.5).
//!
//! Grounded on `apps/m4/m4.c` (897 lines, full read): the token loop, quote
//! handling (`quote_on`/`quote_depth`), the `mcall` call-stack
//! (generalized here into [`frame::Frame`] pushed on a `Vec`, since Rust has
//! no need for the C source's hand-rolled linked list), `sub_args`/
//! `strip_def` (`expand_definition` below), and the diversion array.
//!
//! | Rust                        | C (`apps/m4/m4.c`)            |
//! |-------------------------------|----------------------------------|
//! | `M4::new`                     | `main`'s setup + `init_hashtable` |
//! | `M4::run`                     | `main`'s token loop               |
//! | `M4::collect_args`            | argument-collection branch of `main` |
//! | `M4::expand_definition`       | `sub_args`/`strip_def`            |
//! | `builtins::dispatch`          | `process_bi_with_args`/`process_bi_no_args`/`process_bi_with_args_extra` |
//! | `Frame`                       | `struct mcall`                    |

mod builtins;
mod frame;

pub use frame::Frame;

use crate::buf::Buf;
use crate::config::{M4_HASH_TABLE_SIZE, NUM_DIVERSIONS};
use crate::error::M4Error;
use crate::hashtable::HashTable;
use std::path::Path;

const BUILTIN_NAMES: &[&str] = &[
    "define", "undefine", "changequote", "divert", "undivert", "divnum", "dumpdef", "errprint",
    "ifdef", "ifelse", "include", "len", "index", "substr", "translit", "dnl", "esyscmd",
    "maketemp", "incr", "add", "mult", "sub", "div", "mod", "htdist", "dirsep",
];

/// Discard slot: `divert(-1)` routes here and its content is never flushed.
const DISCARD_SLOT: usize = crate::config::DISCARD_DIVERSION;

pub struct M4 {
    ht: HashTable,
    diversions: Vec<Buf>,
    active_div: usize,
    left_quote: u8,
    right_quote: u8,
}

impl M4 {
    pub fn new() -> Self {
        let mut ht = HashTable::new(M4_HASH_TABLE_SIZE);
        for name in BUILTIN_NAMES {
            ht.upsert(name, None);
        }
        M4 {
            ht,
            diversions: (0..NUM_DIVERSIONS).map(|_| Buf::new()).collect(),
            active_div: 0,
            left_quote: b'`',
            right_quote: b'\'',
        }
    }

    fn emit(&mut self, byte: u8) {
        self.diversions[self.active_div].put(byte);
    }

    fn emit_slice(&mut self, bytes: &[u8]) {
        self.diversions[self.active_div].put_str(bytes);
    }

    /// Runs `files` (or stdin if empty) to completion and returns the fully
    /// expanded, flushed output.
    pub fn run(&mut self, files: &[impl AsRef<Path>]) -> Result<Vec<u8>, M4Error> {
        let mut input = Buf::new();
        if files.is_empty() {
            use std::io::Read;
            let mut stdin_bytes = Vec::new();
            std::io::stdin().read_to_end(&mut stdin_bytes)?;
            input.unget_str(&stdin_bytes);
        } else {
            for path in files.iter().rev() {
                input.include(path.as_ref()).map_err(|e| match e {
                    crate::error::BufError::Io(io) => M4Error::Io(io),
                    crate::error::BufError::Overflow => {
                        M4Error::Fatal("input buffer overflow".into())
                    }
                })?;
            }
        }

        self.process(&mut input)?;
        self.flush_diversion_zero_at_eof();
        Ok(self.diversions[0].as_slice().to_vec())
    }

    /// At end of input, undivert any non-discarded diversion still holding
    /// content into diversion 0, in numeric order.
    fn flush_diversion_zero_at_eof(&mut self) {
        for n in 1..DISCARD_SLOT {
            let mut taken = std::mem::take(&mut self.diversions[n]);
            self.diversions[0].dump_into(&mut taken);
        }
    }

    fn is_ident_start(b: u8) -> bool {
        b.is_ascii_alphabetic() || b == b'_'
    }

    fn is_ident_cont(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_'
    }

    /// The main token loop: consumes `input` to exhaustion, expanding macro
    /// calls and routing literal text (and unshifted expansions) to the
    /// active diversion.
    fn process(&mut self, input: &mut Buf) -> Result<(), M4Error> {
        let mut quote_depth = 0u32;

        loop {
            let Some(ch) = input.get() else {
                if quote_depth > 0 {
                    return Err(M4Error::UnclosedQuote);
                }
                return Ok(());
            };

            if quote_depth > 0 {
                if ch == self.left_quote {
                    quote_depth += 1;
                    self.emit(ch);
                } else if ch == self.right_quote {
                    quote_depth -= 1;
                    if quote_depth > 0 {
                        self.emit(ch);
                    }
                } else {
                    self.emit(ch);
                }
                continue;
            }

            if ch == self.left_quote {
                quote_depth = 1;
                continue;
            }

            if Self::is_ident_start(ch) {
                let mut name = vec![ch];
                while let Some(c) = input.get() {
                    if Self::is_ident_cont(c) {
                        name.push(c);
                    } else {
                        input.unget(c);
                        break;
                    }
                }
                let word = String::from_utf8_lossy(&name).into_owned();

                if self.ht.contains(&word) {
                    let has_args = match input.get() {
                        Some(b'(') => true,
                        Some(c) => {
                            input.unget(c);
                            false
                        }
                        None => false,
                    };
                    let args = if has_args {
                        Some(self.collect_args(input)?)
                    } else {
                        None
                    };
                    self.invoke(&word, args, input)?;
                } else {
                    self.emit_slice(&name);
                }
                continue;
            }

            self.emit(ch);
        }
    }

    /// Collects comma-separated, bracket/quote-aware arguments after an
    /// already-consumed opening `(`, leaving the closing `)` consumed too.
    fn collect_args(&mut self, input: &mut Buf) -> Result<Vec<Vec<u8>>, M4Error> {
        let mut args = Vec::new();
        let mut current = Vec::new();
        let mut bracket_depth = 1u32;
        let mut quote_depth = 0u32;
        self.skip_arg_whitespace(input);

        loop {
            let Some(ch) = input.get() else {
                return Err(M4Error::UnclosedCall);
            };

            if quote_depth > 0 {
                if ch == self.left_quote {
                    quote_depth += 1;
                    current.push(ch);
                } else if ch == self.right_quote {
                    quote_depth -= 1;
                    if quote_depth > 0 {
                        current.push(ch);
                    }
                } else {
                    current.push(ch);
                }
                continue;
            }

            match ch {
                c if c == self.left_quote => {
                    quote_depth = 1;
                }
                b'(' => {
                    bracket_depth += 1;
                    current.push(ch);
                }
                b')' => {
                    bracket_depth -= 1;
                    if bracket_depth == 0 {
                        args.push(current);
                        return Ok(args);
                    }
                    current.push(ch);
                }
                b',' if bracket_depth == 1 => {
                    args.push(std::mem::take(&mut current));
                    self.skip_arg_whitespace(input);
                }
                _ => current.push(ch),
            }
        }
    }

    fn skip_arg_whitespace(&mut self, input: &mut Buf) {
        while let Some(c) = input.get() {
            if c == b' ' || c == b'\t' || c == b'\n' {
                continue;
            }
            input.unget(c);
            break;
        }
    }

    fn invoke(
        &mut self,
        name: &str,
        args: Option<Vec<Vec<u8>>>,
        input: &mut Buf,
    ) -> Result<(), M4Error> {
        let def = self.ht.get_def(name).flatten().map(str::to_owned);
        match def {
            Some(def) => {
                let expanded = match &args {
                    Some(a) => Self::substitute_args(def.as_bytes(), a),
                    None => Self::strip_placeholders(def.as_bytes()),
                };
                input.unget_str(&expanded);
                Ok(())
            }
            None => builtins::dispatch(self, name, args, input),
        }
    }

    /// Replaces `$1`-`$9` with the corresponding collected argument (empty
    /// if that slot wasn't provided); any other `$x` is literal (`sub_args`).
    fn substitute_args(def: &[u8], args: &[Vec<u8>]) -> Vec<u8> {
        let mut out = Vec::with_capacity(def.len());
        let mut i = 0;
        while i < def.len() {
            if def[i] == b'$' && i + 1 < def.len() && def[i + 1].is_ascii_digit() && def[i + 1] != b'0' {
                let idx = (def[i + 1] - b'0') as usize;
                if let Some(arg) = args.get(idx - 1) {
                    out.extend_from_slice(arg);
                }
                i += 2;
            } else {
                out.push(def[i]);
                i += 1;
            }
        }
        out
    }

    /// Removes every `$1`-`$9` placeholder from `def`, used when a user
    /// macro is invoked with no parentheses at all (`strip_def`).
    fn strip_placeholders(def: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(def.len());
        let mut i = 0;
        while i < def.len() {
            if def[i] == b'$' && i + 1 < def.len() && def[i + 1].is_ascii_digit() && def[i + 1] != b'0' {
                i += 2;
            } else {
                out.push(def[i]);
                i += 1;
            }
        }
        out
    }
}

impl Default for M4 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_str(src: &str) -> String {
        let mut m = M4::new();
        let mut input = Buf::new();
        input.unget_str(src.as_bytes());
        m.process(&mut input).unwrap();
        m.flush_diversion_zero_at_eof();
        String::from_utf8_lossy(m.diversions[0].as_slice()).into_owned()
    }

    #[test]
    fn basic_define() {
        assert_eq!(run_str("define(x, hello)x"), "hello");
    }

    #[test]
    fn ifdef_branches() {
        assert_eq!(
            run_str("define(a,1)ifdef(a,yes,no)ifdef(b,yes,no)"),
            "yesno"
        );
    }

    #[test]
    fn changequote_then_literal() {
        assert_eq!(
            run_str("changequote([,])[define(a,1)]a"),
            "define(a,1)a"
        );
    }

    #[test]
    fn nested_quotes_preserve_inner_delimiters() {
        assert_eq!(run_str("`a `b' c'"), "a `b' c");
    }

    #[test]
    fn recursive_macro_expansion_via_rescan() {
        assert_eq!(run_str("define(a,b)define(b,c)a"), "c");
    }

    #[test]
    fn arithmetic_builtins() {
        assert_eq!(run_str("incr(4)"), "5");
        assert_eq!(run_str("add(2,3)"), "5");
    }

    #[test]
    fn dnl_discards_to_end_of_line() {
        assert_eq!(run_str("abc dnl junk here\ndef"), "abc def");
    }

    #[test]
    fn len_index_substr() {
        assert_eq!(run_str("len(hello)"), "5");
        assert_eq!(run_str("index(hello,ll)"), "2");
        assert_eq!(run_str("substr(hello,1,3)"), "ell");
    }

    #[test]
    fn translit_maps_and_deletes() {
        assert_eq!(run_str("translit(hello, el, ip)"), "hippo");
    }

    #[test]
    fn divert_and_undivert() {
        assert_eq!(
            run_str("divert(1)hidden divert(0)visible undivert(1)"),
            "visible hidden "
        );
    }
}
