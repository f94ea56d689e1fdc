//! Backtracking matcher. Rust port of `match_regex`/`match_regex_here`/
//! `match_regex_mult`/`fill_in_capture_groups` (`mods/regex/regex.c` lines
//! 280-389), operating on byte-slice positions instead of raw pointers.
//!
//! One deliberate divergence from the C source: the original's
//! `match_regex_here` only delegates to `match_regex_mult` when the
//! current position is strictly before the end of the subject, so a
//! trailing zero-width quantified atom (e.g. `b*` at the tail of `ab*`
//! matched against `"a"`) never gets the chance to match zero times. This
//! module always gives a quantified atom the chance to match its minimum
//! (possibly zero) occurrences at end-of-subject, per spec.md §4.3's
//! "greedily consumes... then backs off" description, which does not
//! carry that restriction.

use super::compile::CompiledRegex;
use super::NUM_CAP_GRP;

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub start: usize,
    pub len: usize,
    pub captures: [Option<(usize, usize)>; NUM_CAP_GRP],
}

pub(crate) fn find_match(re: &CompiledRegex, subject: &[u8], sol: bool) -> Option<MatchResult> {
    if re.start_anchor && !sol {
        return None;
    }
    if re.end_anchor && re.atoms.is_empty() {
        let mut captures = [None; NUM_CAP_GRP];
        captures[0] = Some((subject.len(), 0));
        return Some(MatchResult { start: subject.len(), len: 0, captures });
    }

    let mut pos = 0usize;
    loop {
        let mut counts = vec![1usize; re.atoms.len()];
        if let Some(end) = match_here(&re.atoms, &mut counts, 0, re.end_anchor, subject, pos) {
            let captures = fill_captures(re, subject, pos, &counts);
            return Some(MatchResult { start: pos, len: end - pos, captures });
        }
        if re.start_anchor {
            return None;
        }
        if pos >= subject.len() {
            return None;
        }
        pos += 1;
    }
}

fn match_here(
    atoms: &[super::Atom],
    counts: &mut [usize],
    idx: usize,
    end_anchor: bool,
    subject: &[u8],
    pos: usize,
) -> Option<usize> {
    if idx == atoms.len() {
        if end_anchor && pos != subject.len() {
            return None;
        }
        return Some(pos);
    }
    let atom = &atoms[idx];
    if atom.is_fixed_one() {
        if pos < subject.len() && atom.matches(subject[pos]) {
            return match_here(atoms, counts, idx + 1, end_anchor, subject, pos + 1);
        }
        return None;
    }
    match_mult(atoms, counts, idx, end_anchor, subject, pos)
}

fn match_mult(
    atoms: &[super::Atom],
    counts: &mut [usize],
    idx: usize,
    end_anchor: bool,
    subject: &[u8],
    pos: usize,
) -> Option<usize> {
    let atom = &atoms[idx];
    let mut t = pos;
    while t < subject.len()
        && atom.matches(subject[t])
        && (atom.max_occ == -1 || ((t - pos) as isize) < atom.max_occ)
    {
        t += 1;
    }
    if ((t - pos) as isize) < atom.min_occ {
        return None;
    }
    loop {
        let count = t - pos;
        if (count as isize) < atom.min_occ {
            return None;
        }
        if let Some(end) = match_here(atoms, counts, idx + 1, end_anchor, subject, t) {
            counts[idx] = count;
            return Some(end);
        }
        if t == pos {
            return None;
        }
        t -= 1;
    }
}

fn fill_captures(
    re: &CompiledRegex,
    subject: &[u8],
    match_start: usize,
    counts: &[usize],
) -> [Option<(usize, usize)>; NUM_CAP_GRP] {
    let _ = subject;
    let mut caps: [Option<(usize, usize)>; NUM_CAP_GRP] = [None; NUM_CAP_GRP];
    let mut running = 0usize;
    for i in 0..re.atoms.len() {
        for j in 0..NUM_CAP_GRP {
            if re.captures[j].atom_start == Some(i) {
                caps[j] = Some((match_start + running, 0));
            }
        }
        for j in 0..NUM_CAP_GRP {
            if let (Some(astart), Some(aend)) = (re.captures[j].atom_start, re.captures[j].atom_end) {
                if i >= astart && i < aend {
                    if let Some((s, l)) = caps[j] {
                        caps[j] = Some((s, l + counts[i]));
                    }
                }
            }
        }
        running += counts[i];
    }
    caps[0] = Some((match_start, running));
    caps
}

#[cfg(test)]
mod tests {
    use super::super::compile::compile;
    use super::find_match;

    #[test]
    fn literal_match_at_start() {
        let re = compile("abc").unwrap();
        let m = find_match(&re, b"xxabcyy", true).unwrap();
        assert_eq!((m.start, m.len), (2, 3));
    }

    #[test]
    fn star_matches_zero_occurrences() {
        let re = compile("ab*").unwrap();
        let m = find_match(&re, b"a", true).unwrap();
        assert_eq!((m.start, m.len), (0, 1));
    }

    #[test]
    fn start_anchor_only_matches_at_zero() {
        let re = compile("^a").unwrap();
        assert!(find_match(&re, b"ba", true).is_none());
        assert!(find_match(&re, b"ab", true).is_some());
    }

    #[test]
    fn capture_group_spans_recorded() {
        let re = compile("a(b+)c").unwrap();
        let m = find_match(&re, b"abbbc", true).unwrap();
        let g1 = m.captures[1].unwrap();
        assert_eq!(&b"abbbc"[g1.0..g1.0 + g1.1], b"bbb");
    }

    #[test]
    fn no_match_returns_none() {
        let re = compile("xyz").unwrap();
        assert!(find_match(&re, b"hello", true).is_none());
    }
}
