//! Pattern compiler. Rust port of `compile_regex` (`mods/regex/regex.c`
//! lines 96-278), extended with `\w\W\d\D\s\S` classes and `{n}`/`{n,}`/
//! `{n,m}` quantifiers per spec.md §4.3.

use super::{Atom, CaptureSlot, NUM_CAP_GRP};
use crate::error::RxError;

#[derive(Debug, Clone)]
pub struct CompiledRegex {
    pub(crate) atoms: Vec<Atom>,
    pub(crate) captures: [CaptureSlot; NUM_CAP_GRP],
    pub(crate) start_anchor: bool,
    pub(crate) end_anchor: bool,
}

/// Fills `atom`'s set according to one of the predefined escape classes.
/// Returns `false` if `c` is not a recognized class letter.
fn apply_class(atom: &mut Atom, c: u8) -> bool {
    let word = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    let space = |b: u8| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c);
    match c {
        b'w' => {
            for b in 0u16..256 {
                if word(b as u8) {
                    atom.set[b as usize] = true;
                }
            }
            true
        }
        b'W' => {
            for b in 0u16..256 {
                if !word(b as u8) {
                    atom.set[b as usize] = true;
                }
            }
            true
        }
        b'd' => {
            for b in b'0'..=b'9' {
                atom.set[b as usize] = true;
            }
            true
        }
        b'D' => {
            for b in 0u16..256 {
                if !(b as u8).is_ascii_digit() {
                    atom.set[b as usize] = true;
                }
            }
            true
        }
        b's' => {
            for b in 0u16..256 {
                if space(b as u8) {
                    atom.set[b as usize] = true;
                }
            }
            true
        }
        b'S' => {
            for b in 0u16..256 {
                if !space(b as u8) {
                    atom.set[b as usize] = true;
                }
            }
            true
        }
        _ => false,
    }
}

struct Quantifier {
    min: isize,
    max: isize,
}

/// Parses the digits inside `{...}` starting just after the `{`. `iter` is
/// advanced past the closing `}`. Errors mirror spec.md's compile-error list.
fn parse_braces(bytes: &[u8], i: &mut usize) -> Result<Quantifier, RxError> {
    let start = *i;
    let close = bytes[start..]
        .iter()
        .position(|&b| b == b'}')
        .map(|p| start + p);
    let close = match close {
        Some(c) => c,
        None => return Err(RxError::BadQuantifier(String::from_utf8_lossy(&bytes[start..]).into_owned())),
    };
    let body = &bytes[start..close];
    *i = close + 1;

    let raw = std::str::from_utf8(body).map_err(|_| RxError::BadQuantifier("non-utf8".into()))?;
    let parts: Vec<&str> = raw.splitn(2, ',').collect();
    let quant = match parts.as_slice() {
        [n] => {
            let n: isize = n.parse().map_err(|_| RxError::BadQuantifier(raw.to_string()))?;
            if n == 0 {
                return Err(RxError::ZeroExactQuantifier);
            }
            Quantifier { min: n, max: n }
        }
        [n, ""] => {
            let n: isize = n.parse().map_err(|_| RxError::BadQuantifier(raw.to_string()))?;
            Quantifier { min: n, max: -1 }
        }
        [n, m] => {
            let n: isize = n.parse().map_err(|_| RxError::BadQuantifier(raw.to_string()))?;
            let m: isize = m.parse().map_err(|_| RxError::BadQuantifier(raw.to_string()))?;
            if m == 0 || m < n {
                return Err(RxError::BadQuantifier(raw.to_string()));
            }
            Quantifier { min: n, max: m }
        }
        _ => return Err(RxError::BadQuantifier(raw.to_string())),
    };
    Ok(quant)
}

pub fn compile(pattern: &str) -> Result<CompiledRegex, RxError> {
    let bytes = pattern.as_bytes();
    let mut atoms: Vec<Atom> = Vec::new();
    let mut captures = [CaptureSlot::default(); NUM_CAP_GRP];
    let mut start_anchor = false;
    let mut end_anchor = false;

    let mut in_set = false;
    let mut cap_group_index = 0usize;
    let mut stack: Vec<usize> = Vec::new();

    let mut i = 0usize;
    if i < bytes.len() && bytes[i] == b'^' {
        start_anchor = true;
        i += 1;
    }

    while i < bytes.len() {
        let u = bytes[i];
        i += 1;
        match u {
            b'\\' => {
                if i >= bytes.len() {
                    return Err(RxError::BadQuantifier("trailing backslash".into()));
                }
                let c = bytes[i];
                i += 1;
                if in_set {
                    let atom = atoms.last_mut().expect("in_set implies an open atom");
                    if !apply_class(atom, c) {
                        atom.set[c as usize] = true;
                    }
                } else {
                    let mut atom = Atom::new_empty_class();
                    if !apply_class(&mut atom, c) {
                        atom.set[c as usize] = true;
                    }
                    atoms.push(atom);
                }
            }
            b'$' => {
                if in_set {
                    atoms.last_mut().unwrap().set[b'$' as usize] = true;
                } else if i == bytes.len() {
                    end_anchor = true;
                } else {
                    atoms.push(Atom::new_literal(b'$'));
                }
            }
            b'(' => {
                if in_set {
                    atoms.last_mut().unwrap().set[b'(' as usize] = true;
                } else {
                    cap_group_index += 1;
                    if cap_group_index >= NUM_CAP_GRP {
                        return Err(RxError::TooManyCaptureGroups);
                    }
                    captures[cap_group_index].atom_start = Some(atoms.len());
                    stack.push(cap_group_index);
                }
            }
            b')' => {
                if in_set {
                    atoms.last_mut().unwrap().set[b')' as usize] = true;
                } else {
                    match stack.pop() {
                        Some(idx) => captures[idx].atom_end = Some(atoms.len()),
                        None => return Err(RxError::UnterminatedGroup),
                    }
                }
            }
            b'[' => {
                if in_set {
                    atoms.last_mut().unwrap().set[b'[' as usize] = true;
                } else {
                    in_set = true;
                    let mut atom = Atom::new_empty_class();
                    if i < bytes.len() && bytes[i] == b'^' {
                        atom.negate = true;
                        i += 1;
                    }
                    atoms.push(atom);
                }
            }
            b']' => {
                if !in_set {
                    atoms.push(Atom::new_literal(b']'));
                } else {
                    in_set = false;
                }
            }
            b'*' => {
                if in_set {
                    atoms.last_mut().unwrap().set[b'*' as usize] = true;
                } else {
                    let last = atoms.last_mut().ok_or(RxError::UnexpectedQuantifier)?;
                    last.min_occ = 0;
                    last.max_occ = -1;
                }
            }
            b'+' => {
                if in_set {
                    atoms.last_mut().unwrap().set[b'+' as usize] = true;
                } else {
                    let last = atoms.last_mut().ok_or(RxError::UnexpectedQuantifier)?;
                    last.min_occ = 1;
                    last.max_occ = -1;
                }
            }
            b'?' => {
                if in_set {
                    atoms.last_mut().unwrap().set[b'?' as usize] = true;
                } else {
                    let last = atoms.last_mut().ok_or(RxError::UnexpectedQuantifier)?;
                    last.min_occ = 0;
                    last.max_occ = 1;
                }
            }
            b'{' => {
                if in_set {
                    atoms.last_mut().unwrap().set[b'{' as usize] = true;
                } else {
                    if atoms.is_empty() {
                        return Err(RxError::UnexpectedQuantifier);
                    }
                    let q = parse_braces(bytes, &mut i)?;
                    let last = atoms.last_mut().unwrap();
                    last.min_occ = q.min;
                    last.max_occ = q.max;
                }
            }
            b'.' => {
                if in_set {
                    atoms.last_mut().unwrap().set[b'.' as usize] = true;
                } else {
                    atoms.push(Atom::new_any());
                }
            }
            _ => {
                if in_set {
                    // Look ahead for a range a-b.
                    if i + 1 < bytes.len() && bytes[i] == b'-' {
                        let e = bytes[i + 1];
                        if e < u {
                            return Err(RxError::BadQuantifier(format!("{}-{}", u as char, e as char)));
                        }
                        let atom = atoms.last_mut().unwrap();
                        for b in u..=e {
                            atom.set[b as usize] = true;
                        }
                        i += 2;
                    } else {
                        atoms.last_mut().unwrap().set[u as usize] = true;
                    }
                } else {
                    atoms.push(Atom::new_literal(u));
                }
            }
        }
    }

    if in_set {
        return Err(RxError::UnterminatedClass);
    }
    for cap in captures.iter().skip(1) {
        if cap.atom_start.is_some() && cap.atom_end.is_none() {
            return Err(RxError::UnterminatedGroup);
        }
    }

    captures[0].atom_start = Some(0);
    captures[0].atom_end = Some(atoms.len());

    Ok(CompiledRegex { atoms, captures, start_anchor, end_anchor })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_literal_pattern() {
        let re = compile("abc").unwrap();
        assert_eq!(re.atoms.len(), 3);
    }

    #[test]
    fn star_sets_unbounded_quantifier_on_previous_atom() {
        let re = compile("ab*").unwrap();
        assert_eq!(re.atoms[1].min_occ, 0);
        assert_eq!(re.atoms[1].max_occ, -1);
    }

    #[test]
    fn quantifier_with_nothing_to_repeat_errors() {
        assert!(compile("*abc").is_err());
    }

    #[test]
    fn zero_exact_quantifier_is_an_error() {
        assert!(compile("a{0}").is_err());
    }

    #[test]
    fn zero_min_n_max_quantifier_compiles() {
        let re = compile("a{0,3}").unwrap();
        assert_eq!(re.atoms[0].min_occ, 0);
        assert_eq!(re.atoms[0].max_occ, 3);
    }

    #[test]
    fn descending_range_is_an_error() {
        assert!(compile("[z-a]").is_err());
    }

    #[test]
    fn too_many_capture_groups_errors() {
        let pat = "(a)".repeat(NUM_CAP_GRP);
        assert!(compile(&pat).is_err());
    }

    #[test]
    fn unterminated_group_errors() {
        assert!(compile("(abc").is_err());
    }

    #[test]
    fn digit_class_matches_only_digits() {
        let re = compile(r"\d").unwrap();
        assert!(re.atoms[0].matches(b'5'));
        assert!(!re.atoms[0].matches(b'x'));
    }

    #[test]
    fn end_anchor_alone_has_no_atoms() {
        let re = compile("$").unwrap();
        assert!(re.atoms.is_empty());
        assert!(re.end_anchor);
    }
}
