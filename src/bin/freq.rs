//! `freq` — byte-frequency histogram (§6 External Interfaces).
//!
//! Rust port of `apps/freq/freq.c`: tallies every byte read from stdin or
//! from each named file, then prints one line per byte value that occurred
//! at least once, in ascending byte order.

use anyhow::{Context, Result};
use clap::Parser;
use delimtools::config::READ_CHUNK_SIZE;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "freq", about = "Print a byte-frequency histogram")]
struct Cli {
    /// Files to scan. With none, reads stdin.
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut counts = [0u64; 256];

    if cli.files.is_empty() {
        tally(&mut io::stdin(), &mut counts)?;
    } else {
        for path in &cli.files {
            let mut f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            tally(&mut f, &mut counts)?;
        }
    }

    for (byte, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let k = byte as u8;
        if k.is_ascii_graphic() {
            println!("{}\t{count}", k as char);
        } else {
            println!("{k:02X}\t{count}");
        }
    }
    Ok(())
}

fn tally(r: &mut impl Read, counts: &mut [u64; 256]) -> Result<()> {
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let n = r.read(&mut buf)?;
        if n == 0 {
            break;
        }
        for &b in &buf[..n] {
            counts[b as usize] += 1;
        }
    }
    Ok(())
}
