//! End-to-end: the `m4` CLI binary over file input, matching the scenarios
//! in spec.md §8 plus a couple of multi-file/include checks.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn m4_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_m4") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("m4");
    p
}

fn run_stdin(input: &str) -> String {
    let mut child = Command::new(m4_bin())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn m4");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn run_files(paths: &[PathBuf]) -> String {
    let output = Command::new(m4_bin())
        .args(paths)
        .output()
        .expect("failed to run m4");
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn basic_define_via_stdin() {
    assert_eq!(run_stdin("define(x, hello)x"), "hello");
}

#[test]
fn ifdef_via_stdin() {
    assert_eq!(
        run_stdin("define(a,1)ifdef(a,yes,no)ifdef(b,yes,no)"),
        "yesno"
    );
}

#[test]
fn changequote_then_literal_via_stdin() {
    assert_eq!(
        run_stdin("changequote([,])[define(a,1)]a"),
        "define(a,1)a"
    );
}

#[test]
fn multiple_files_concatenate_in_argv_order() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.m4");
    let b = dir.path().join("b.m4");
    fs::write(&a, "define(x,1)").unwrap();
    fs::write(&b, "x").unwrap();

    assert_eq!(run_files(&[a, b]), "1");
}

#[test]
fn include_builtin_pulls_in_file_contents() {
    let dir = TempDir::new().unwrap();
    let included = dir.path().join("inc.txt");
    fs::write(&included, "included text").unwrap();
    let main = dir.path().join("main.m4");
    fs::write(&main, format!("before include({}) after", included.display())).unwrap();

    let out = run_files(&[main]);
    assert_eq!(out, "before included text after");
}

#[test]
fn dnl_strips_trailing_comment_line() {
    assert_eq!(run_stdin("keep dnl drop this\nkeep2"), "keep keep2");
}
