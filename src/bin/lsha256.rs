//! `lsha256` — print a hexadecimal SHA-256 digest per file.
//!
//! Rust port of `apps/lsha256/lsha256.c`: `lsha256 file...`, one line
//! per file, hash first.

use anyhow::{Context, Result};
use clap::Parser;
use delimtools::sha256::sha256_file;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lsha256", about = "Print a SHA-256 digest per file")]
struct Cli {
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    for path in &cli.files {
        let digest =
            sha256_file(path).with_context(|| format!("hashing {}", path.display()))?;
        println!("{digest} {}", path.display());
    }
    Ok(())
}
