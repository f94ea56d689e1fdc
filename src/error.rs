//! Shared error taxonomy. One enum per component failure class, with
//! hand-written `Display` impls — no `thiserror`, matching the pattern in
//! `frame::types::Lz4FError` from the teacher codebase.

use std::fmt;

#[derive(Debug)]
pub enum BufError {
    Overflow,
    Io(std::io::Error),
}

impl fmt::Display for BufError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufError::Overflow => write!(f, "buffer size overflow"),
            BufError::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}
impl std::error::Error for BufError {}
impl From<std::io::Error> for BufError {
    fn from(e: std::io::Error) -> Self {
        BufError::Io(e)
    }
}

#[derive(Debug)]
pub enum HtError {
    Io(std::io::Error),
    TruncatedFile,
    NotFound,
}

impl fmt::Display for HtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtError::Io(e) => write!(f, "i/o error: {e}"),
            HtError::TruncatedFile => write!(f, "hash table file truncated or malformed"),
            HtError::NotFound => write!(f, "entry not found"),
        }
    }
}
impl std::error::Error for HtError {}
impl From<std::io::Error> for HtError {
    fn from(e: std::io::Error) -> Self {
        HtError::Io(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RxError {
    UnterminatedGroup,
    UnterminatedClass,
    BadQuantifier(String),
    ZeroExactQuantifier,
    TooManyCaptureGroups,
    DanglingBackreference(u8),
    UnexpectedQuantifier,
}

impl fmt::Display for RxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RxError::UnterminatedGroup => write!(f, "unterminated capture group"),
            RxError::UnterminatedClass => write!(f, "unterminated character class"),
            RxError::BadQuantifier(s) => write!(f, "invalid quantifier: {{{s}}}"),
            RxError::ZeroExactQuantifier => write!(f, "{{0}} is not a valid quantifier"),
            RxError::TooManyCaptureGroups => write!(f, "more than 10 capture groups"),
            RxError::DanglingBackreference(n) => {
                write!(f, "backreference \\{n} has no matching group")
            }
            RxError::UnexpectedQuantifier => write!(f, "quantifier with nothing to repeat"),
        }
    }
}
impl std::error::Error for RxError {}

#[derive(Debug)]
pub enum GbError {
    Io(std::io::Error),
    Rx(RxError),
    NoMark,
    NoMatch,
    Overflow,
    NoFilename,
    OutOfRange,
    BadReplaceSpec,
}

impl fmt::Display for GbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GbError::Io(e) => write!(f, "i/o error: {e}"),
            GbError::Rx(e) => write!(f, "regex error: {e}"),
            GbError::NoMark => write!(f, "no mark set"),
            GbError::NoMatch => write!(f, "search text not found"),
            GbError::Overflow => write!(f, "gap buffer size overflow"),
            GbError::NoFilename => write!(f, "gap buffer has no associated filename"),
            GbError::OutOfRange => write!(f, "operation out of range"),
            GbError::BadReplaceSpec => write!(f, "malformed delimited find/replace spec"),
        }
    }
}
impl std::error::Error for GbError {}
impl From<std::io::Error> for GbError {
    fn from(e: std::io::Error) -> Self {
        GbError::Io(e)
    }
}
impl From<RxError> for GbError {
    fn from(e: RxError) -> Self {
        GbError::Rx(e)
    }
}
impl From<FsError> for GbError {
    fn from(e: FsError) -> Self {
        match e {
            FsError::Io(io) => GbError::Io(io),
        }
    }
}

#[derive(Debug)]
pub enum M4Error {
    Io(std::io::Error),
    UnclosedQuote,
    UnclosedCall,
    BadChangequote,
    BadDiversion(String),
    BadNumber(String),
    DivideByZero,
    Fatal(String),
}

impl fmt::Display for M4Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            M4Error::Io(e) => write!(f, "i/o error: {e}"),
            M4Error::UnclosedQuote => write!(f, "end of input inside quoted string"),
            M4Error::UnclosedCall => write!(f, "end of input inside macro call"),
            M4Error::BadChangequote => write!(f, "changequote requires two distinct delimiters"),
            M4Error::BadDiversion(s) => write!(f, "invalid diversion number: {s}"),
            M4Error::BadNumber(s) => write!(f, "invalid number: {s}"),
            M4Error::DivideByZero => write!(f, "division by zero"),
            M4Error::Fatal(s) => write!(f, "{s}"),
        }
    }
}
impl std::error::Error for M4Error {}
impl From<std::io::Error> for M4Error {
    fn from(e: std::io::Error) -> Self {
        M4Error::Io(e)
    }
}

#[derive(Debug)]
pub enum FsError {
    Io(std::io::Error),
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}
impl std::error::Error for FsError {}
impl From<std::io::Error> for FsError {
    fn from(e: std::io::Error) -> Self {
        FsError::Io(e)
    }
}
