//! `m4` — the macro processor CLI.
//!
//! Rust port of `apps/m4/m4.c`'s `main`: `m4 [file...]` reads stdin when no
//! files are given, otherwise each file in argument order, and writes
//! diversion 0's fully flushed content to stdout.

use anyhow::Result;
use clap::Parser;
use delimtools::m4::M4;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "m4", about = "An m4-style macro processor")]
struct Cli {
    /// Files to process. With none, reads stdin.
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut m4 = M4::new();
    let output = m4.run(&cli.files)?;
    io::stdout().write_all(&output)?;
    Ok(())
}
