//! `regr` — regex find/replace over whole files.
//!
//! Rust port of `apps/regr/regr.c`: `regr find replace file...`, always
//! newline-sensitive, writes every file's fully replaced content straight
//! to stdout with no separators between files.

use anyhow::{Context, Result};
use clap::Parser;
use delimtools::fs_util::read_file_string;
use delimtools::rx::regex_replace;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "regr", about = "Find/replace a regex across files")]
struct Cli {
    find: String,
    replace: String,
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for path in &cli.files {
        let content =
            read_file_string(path).with_context(|| format!("reading {}", path.display()))?;
        let replaced = regex_replace(&content, &cli.find, &cli.replace, true)
            .map_err(|e| anyhow::anyhow!("{path:?}: {e:?}"))?;
        out.write_all(replaced.as_bytes())?;
    }
    Ok(())
}
