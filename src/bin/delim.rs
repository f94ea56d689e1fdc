//! `delim` — per-line delimiter-count consistency checker.
//!
//! Rust port of `original_source/delim.c` (lives directly at the top of
//! `original_source/`, not under `apps/`, unlike the other utilities):
//! the first line of each file (or of stdin) establishes how many times the
//! delimiter byte must appear; every later line, including a final partial
//! line with no trailing newline, is checked against that count, and the
//! program exits on the first mismatch.

use anyhow::{bail, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "delim", about = "Check that every line has the same delimiter count")]
struct Cli {
    /// The delimiter byte, given as a single character.
    delimiter: String,
    /// Files to check. With none, reads stdin.
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let argv0 = "delim";

    let delim_bytes = cli.delimiter.as_bytes();
    if delim_bytes.len() != 1 || delim_bytes[0] == b'\n' {
        bail!("{argv0}: delimiter must be a single byte, and not newline");
    }
    let delim = delim_bytes[0];

    if cli.files.is_empty() {
        check(argv0, "stdin", &mut BufReader::new(io::stdin()), delim)?;
    } else {
        for path in &cli.files {
            let f = File::open(path)?;
            check(argv0, &path.display().to_string(), &mut BufReader::new(f), delim)?;
        }
    }
    Ok(())
}

fn check(argv0: &str, label: &str, r: &mut impl BufRead, delim: u8) -> Result<()> {
    let mut line = Vec::new();
    let mut row = 0usize;
    let mut first_count: Option<usize> = None;

    loop {
        line.clear();
        let n = r.read_until(b'\n', &mut line)?;
        if n == 0 {
            break;
        }
        row += 1;
        let content = if line.last() == Some(&b'\n') { &line[..line.len() - 1] } else { &line[..] };
        let count = content.iter().filter(|&&b| b == delim).count();

        match first_count {
            None => first_count = Some(count),
            Some(expected) if count != expected => {
                bail!(
                    "{argv0}: Delimiter mismatch. First line of {label}, has {expected}, line {row} has {count}."
                );
            }
            _ => {}
        }
    }
    Ok(())
}
