//! Find/replace. Rust port of `regex_replace` (`mods/regex/regex.c` lines
//! 391-515): newline-sensitive line-by-line matching, `\0`-`\9`
//! backreference substitution in the replacement template.
//!
//! Zero-length matches are handled per spec.md §4.3 rather than the C
//! source's informal "can only happen with `^`/`$`" assumption (which this
//! engine's `{0,n}`-style quantifiers make untrue in general): a
//! zero-length match that isn't at end-of-line consumes one passthrough
//! byte before the next search, so the replacement template is never
//! emitted twice at the same position.

use super::compile::{compile, CompiledRegex};
use super::matcher::find_match;
use crate::error::RxError;

pub fn regex_replace(subject: &str, find: &str, replace: &str, nl_sen: bool) -> Result<String, RxError> {
    let re = compile(find)?;
    let mut out = Vec::with_capacity(subject.len());

    if nl_sen {
        let bytes = subject.as_bytes();
        let mut start = 0usize;
        loop {
            let nl = bytes[start..].iter().position(|&b| b == b'\n');
            let (line, has_nl) = match nl {
                Some(off) => (&bytes[start..start + off], true),
                None => (&bytes[start..], false),
            };
            replace_line(&re, line, replace, &mut out)?;
            if has_nl {
                out.push(b'\n');
                start += line.len() + 1;
            } else {
                break;
            }
            if start > bytes.len() {
                break;
            }
            if start == bytes.len() {
                break;
            }
        }
    } else {
        replace_line(&re, subject.as_bytes(), replace, &mut out)?;
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn replace_line(re: &CompiledRegex, line: &[u8], replace: &str, out: &mut Vec<u8>) -> Result<(), RxError> {
    let mut pos = 0usize;
    let mut sol = true;
    loop {
        let slice = &line[pos..];
        let m = match find_match(re, slice, sol) {
            Some(m) => m,
            None => break,
        };
        sol = false;
        out.extend_from_slice(&slice[..m.start]);
        emit_replacement(out, replace, &m.captures, slice)?;
        let match_end = m.start + m.len;
        if m.len == 0 {
            if match_end < slice.len() {
                out.push(slice[match_end]);
                pos += match_end + 1;
            } else {
                pos += match_end;
                break;
            }
        } else {
            pos += match_end;
        }
        if pos >= line.len() {
            break;
        }
    }
    out.extend_from_slice(&line[pos..]);
    Ok(())
}

fn emit_replacement(
    out: &mut Vec<u8>,
    replace: &str,
    captures: &[Option<(usize, usize)>],
    slice: &[u8],
) -> Result<(), RxError> {
    let rbytes = replace.as_bytes();
    let mut i = 0usize;
    while i < rbytes.len() {
        let ch = rbytes[i];
        i += 1;
        if ch == b'\\' && i < rbytes.len() && rbytes[i].is_ascii_digit() {
            let d = (rbytes[i] - b'0') as usize;
            i += 1;
            match captures.get(d).copied().flatten() {
                Some((s, l)) => {
                    if l > 0 {
                        out.extend_from_slice(&slice[s..s + l]);
                    }
                }
                None => return Err(RxError::DanglingBackreference(d as u8)),
            }
        } else {
            out.push(ch);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_replace() {
        let out = regex_replace("hello world", "world", "there", false).unwrap();
        assert_eq!(out, "hello there");
    }

    #[test]
    fn end_to_end_scenario_from_spec() {
        let out = regex_replace("hello world\nworld hello", "world", "\\0\\0", true).unwrap();
        assert_eq!(out, "hello worldworld\nworldworld hello");
    }

    #[test]
    fn replace_fixed_point_when_no_match() {
        let out = regex_replace("abc", "xyz", "123", false).unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn backreference_to_unopened_group_errors() {
        assert!(regex_replace("abc", "a(b)c", "\\5", false).is_err());
    }

    #[test]
    fn zero_length_match_does_not_loop_forever() {
        // `b*` matches zero-length at every position in "aaa".
        let out = regex_replace("aaa", "b*", "-", false).unwrap();
        assert_eq!(out, "-a-a-a-");
    }

    #[test]
    fn anchors_are_per_line_in_newline_sensitive_mode() {
        let out = regex_replace("abc\nabc", "^abc$", "X", true).unwrap();
        assert_eq!(out, "X\nX");
    }
}
