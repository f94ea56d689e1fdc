//! End-to-end: black-box CLI coverage for the thin front-ends (§6 External
//! Interfaces) other than `spot`, which requires a real terminal's raw mode
//! and `capybara`/`m4`, which have their own dedicated e2e suites.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn bin(name: &str) -> PathBuf {
    let env_var = format!("CARGO_BIN_EXE_{name}");
    if let Ok(p) = std::env::var(&env_var) {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push(name);
    p
}

fn run_with_stdin(exe: &Path, args: &[&str], stdin_data: &[u8]) -> std::process::Output {
    let mut child = Command::new(exe)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn");
    child.stdin.take().unwrap().write_all(stdin_data).unwrap();
    child.wait_with_output().unwrap()
}

// ── freq ──────────────────────────────────────────────────────────────────

#[test]
fn freq_tabulates_byte_counts_from_stdin() {
    let out = run_with_stdin(&bin("freq"), &[], b"aab");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("a\t2"));
    assert!(stdout.contains("b\t1"));
}

#[test]
fn freq_reads_named_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("in.txt");
    fs::write(&path, "zzz").unwrap();

    let output = Command::new(bin("freq"))
        .arg(&path)
        .output()
        .expect("failed to run freq");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("z\t3"));
}

// ── lsha256 ───────────────────────────────────────────────────────────────

#[test]
fn lsha256_prints_digest_and_path_per_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, b"").unwrap();

    let output = Command::new(bin("lsha256"))
        .arg(&path)
        .output()
        .expect("failed to run lsha256");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with(
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    ));
    assert!(stdout.contains(&path.display().to_string()));
}

#[test]
fn lsha256_requires_at_least_one_file() {
    let output = Command::new(bin("lsha256"))
        .output()
        .expect("failed to run lsha256");
    assert!(!output.status.success());
}

// ── delim ─────────────────────────────────────────────────────────────────

#[test]
fn delim_accepts_consistent_delimiter_counts() {
    let out = run_with_stdin(&bin("delim"), &[","], b"a,b,c\nd,e,f\n");
    assert!(out.status.success());
}

#[test]
fn delim_rejects_inconsistent_delimiter_counts() {
    let out = run_with_stdin(&bin("delim"), &[","], b"a,b,c\nd,e\n");
    assert!(!out.status.success());
    assert!(!out.stderr.is_empty());
}

#[test]
fn delim_rejects_multi_byte_delimiter() {
    let out = run_with_stdin(&bin("delim"), &["::"], b"a::b\n");
    assert!(!out.status.success());
}

// ── regr ──────────────────────────────────────────────────────────────────

#[test]
fn regr_applies_find_replace_to_each_file_and_prints_to_stdout() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "foo bar\n").unwrap();
    fs::write(&b, "foo foo\n").unwrap();

    let output = Command::new(bin("regr"))
        .args(["foo", "baz", a.to_str().unwrap(), b.to_str().unwrap()])
        .output()
        .expect("failed to run regr");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "baz bar\nbaz baz\n"
    );
}
