//! `capybara` — content-addressed deduplicating backup store.
//!
//! Rust port of `apps/capybara/capybara.c`: `capybara search_dir store_dir
//! snapshot_name` walks `search_dir`, copies each file into
//! `store_dir/files/<sha256>` the first time that hash is seen, and records
//! every `(original_path, hash_path)` pair in a new snapshot file under
//! `store_dir/snapshots/<snapshot_name>`. A persistent dedup index lives at
//! `store_dir/ht` and is loaded at startup and rewritten at the end.

use anyhow::{bail, Context, Result};
use clap::Parser;
use delimtools::buf::Buf;
use delimtools::config::CAPYBARA_HASH_TABLE_SIZE;
use delimtools::fs_util::walk_files;
use delimtools::hashtable::HashTable;
use delimtools::sha256::sha256_file;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "capybara", about = "Content-addressed deduplicating backup store")]
struct Cli {
    search_dir: PathBuf,
    store_dir: PathBuf,
    snapshot_name: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.search_dir.is_dir() {
        bail!("capybara: {} is not a directory", cli.search_dir.display());
    }
    if !cli.store_dir.is_dir() {
        bail!("capybara: {} is not a directory", cli.store_dir.display());
    }

    let snapshots_dir = cli.store_dir.join("snapshots");
    let files_dir = cli.store_dir.join("files");
    fs::create_dir_all(&snapshots_dir)?;
    set_private_mode(&snapshots_dir)?;
    fs::create_dir_all(&files_dir)?;
    set_private_mode(&files_dir)?;

    let snapshot_path = snapshots_dir.join(&cli.snapshot_name);
    if snapshot_path.exists() {
        bail!("capybara: snapshot `{}' already exists", cli.snapshot_name);
    }

    let ht_path = cli.store_dir.join("ht");
    let mut ht = HashTable::new(CAPYBARA_HASH_TABLE_SIZE);
    if ht_path.exists() {
        ht.load_file(&ht_path).context("loading dedup index")?;
    }

    let mut snapshot = Buf::new();
    let mut walk_err = None;
    walk_files(&cli.search_dir, |path| {
        if let Err(e) = process_file(path, &files_dir, &mut ht, &mut snapshot) {
            walk_err = Some(e);
        }
        Ok(())
    })
    .context("walking search directory")?;
    if let Some(e) = walk_err {
        return Err(e);
    }

    ht.persist(&ht_path).context("persisting dedup index")?;
    snapshot.write_to(&snapshot_path).context("writing snapshot")?;

    Ok(())
}

fn process_file(
    path: &Path,
    files_dir: &Path,
    ht: &mut HashTable,
    snapshot: &mut Buf,
) -> Result<()> {
    let hash = sha256_file(path).with_context(|| format!("hashing {}", path.display()))?;
    let dest = files_dir.join(&hash);

    if !ht.contains(&hash) {
        fs::copy(path, &dest).with_context(|| format!("copying {}", path.display()))?;
        ht.upsert(&hash, None);
    }

    snapshot.put_str(path.to_string_lossy().as_bytes());
    snapshot.put(0);
    snapshot.put_str(dest.to_string_lossy().as_bytes());
    snapshot.put(0);
    Ok(())
}

#[cfg(unix)]
fn set_private_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o700);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_private_mode(_path: &Path) -> Result<()> {
    Ok(())
}
