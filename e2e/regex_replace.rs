//! End-to-end: the regex engine's replace path as exercised through the
//! library API, matching the scenarios described in spec.md §8.

use delimtools::rx::regex_replace;

#[test]
fn newline_sensitive_replace_doubles_matches_per_line() {
    let out = regex_replace("hello world\nworld hello", "world", "\\0\\0", true).unwrap();
    assert_eq!(out, "hello worldworld\nworldworld hello");
}

#[test]
fn no_match_is_a_fixed_point() {
    let out = regex_replace("hello world", "zzz", "X", true).unwrap();
    assert_eq!(out, "hello world");
}

#[test]
fn capture_group_backreference_in_replacement() {
    let out = regex_replace("abc123", "([a-z]+)([0-9]+)", "\\2-\\1", false).unwrap();
    assert_eq!(out, "123-abc");
}

#[test]
fn anchors_are_per_line_in_newline_sensitive_mode() {
    let out = regex_replace("foo\nfoo bar", "^foo", "X", true).unwrap();
    assert_eq!(out, "X\nX bar");
}

#[test]
fn quantifiers_and_character_classes() {
    let out = regex_replace("aaa bbb 123", "[0-9]+", "N", false).unwrap();
    assert_eq!(out, "aaa bbb N");

    let out = regex_replace("color colour", "colou?r", "X", false).unwrap();
    assert_eq!(out, "X X");
}

#[test]
fn bounded_repetition() {
    let out = regex_replace("aaaa", "a{2,3}", "X", false).unwrap();
    assert_eq!(out, "Xa");
}

#[test]
fn zero_length_match_does_not_double_emit_at_same_position() {
    let out = regex_replace("abc", "x*", "-", false).unwrap();
    // one zero-length match consumed per passthrough byte, plus the tail.
    assert_eq!(out, "-a-b-c-");
}

#[test]
fn unmatched_group_backreference_is_compile_or_runtime_error() {
    // group 2 never opened in this pattern.
    let result = regex_replace("abc", "a", "\\2", false);
    assert!(result.is_err());
}

#[test]
fn backreference_to_zero_length_capture_emits_nothing() {
    let out = regex_replace("abc", "(x*)a", "[\\1]", false).unwrap();
    assert_eq!(out, "[]bc");
}
