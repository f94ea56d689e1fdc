//! A pending macro invocation. Generalizes the C source's `struct mcall`
//! linked-list node (`next`, `name`, `def`, `bracket_depth`, `act_arg`,
//! `arg_buf[10]`) into an owned, non-recursive value: [`M4::collect_args`]
//! already returns the fully collected argument list directly rather than
//! threading a call stack through global state, so nothing here needs to
//! own a `next` pointer. Kept as a named type (rather than a bare
//! `Vec<Vec<u8>>`) so call sites read the way the C source's variable names
//! did.

/// A macro name paired with its raw, unexpanded, already quote-stripped
/// argument bytes (1-indexed in spirit: `args[0]` is `$1`).
#[derive(Debug, Clone)]
pub struct Frame {
    pub name: String,
    pub args: Vec<Vec<u8>>,
}

impl Frame {
    pub fn new(name: impl Into<String>, args: Vec<Vec<u8>>) -> Self {
        Frame { name: name.into(), args }
    }

    pub fn arg(&self, n: usize) -> &[u8] {
        self.args.get(n.wrapping_sub(1)).map(Vec::as_slice).unwrap_or(b"")
    }

    pub fn arg_str(&self, n: usize) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.arg(n))
    }
}
