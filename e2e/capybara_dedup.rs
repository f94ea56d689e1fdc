//! End-to-end: `capybara`'s content-addressed dedup store, matching the
//! backup-dedup scenario in spec.md §8.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn capybara_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_capybara") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("capybara");
    p
}

#[test]
fn identical_files_dedup_to_one_stored_blob() {
    let search = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();

    fs::write(search.path().join("a.txt"), b"same content").unwrap();
    fs::write(search.path().join("b.txt"), b"same content").unwrap();

    let status = Command::new(capybara_bin())
        .args([
            search.path().to_str().unwrap(),
            store.path().to_str().unwrap(),
            "snap1",
        ])
        .status()
        .expect("failed to run capybara");
    assert!(status.success());

    let files_dir = store.path().join("files");
    let entries: Vec<_> = fs::read_dir(&files_dir).unwrap().collect();
    assert_eq!(entries.len(), 1, "two byte-identical files should dedup to one blob");

    let digest = entries[0].as_ref().unwrap().file_name();
    assert_eq!(
        digest.to_str().unwrap().len(),
        64,
        "stored blob must be named by its 64-char hex sha256 digest"
    );

    let snapshot_path = store.path().join("snapshots").join("snap1");
    let snapshot = fs::read(&snapshot_path).unwrap();
    let records: Vec<&[u8]> = snapshot.split(|&b| b == 0).collect();
    // two (source, content) pairs, each NUL-terminated, trailing empty split.
    let non_empty: Vec<&[u8]> = records.into_iter().filter(|r| !r.is_empty()).collect();
    assert_eq!(non_empty.len(), 4, "two source paths + two content paths recorded");

    let content_path_1 = String::from_utf8_lossy(non_empty[1]).into_owned();
    let content_path_2 = String::from_utf8_lossy(non_empty[3]).into_owned();
    assert_eq!(
        content_path_1, content_path_2,
        "both source paths must map to the same content-addressed path"
    );
}

#[test]
fn second_run_reuses_existing_dedup_index() {
    let search = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();
    fs::write(search.path().join("a.txt"), b"payload one").unwrap();

    let run = |snapshot: &str| {
        Command::new(capybara_bin())
            .args([
                search.path().to_str().unwrap(),
                store.path().to_str().unwrap(),
                snapshot,
            ])
            .status()
            .unwrap()
    };

    assert!(run("first").success());
    assert!(run("second").success());

    let files_dir = store.path().join("files");
    let entries: Vec<_> = fs::read_dir(&files_dir).unwrap().collect();
    assert_eq!(
        entries.len(),
        1,
        "rerunning over the same content must not create a duplicate blob"
    );

    assert!(store.path().join("snapshots").join("first").exists());
    assert!(store.path().join("snapshots").join("second").exists());
}

#[test]
fn distinct_content_produces_distinct_blobs() {
    let search = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();
    fs::write(search.path().join("a.txt"), b"alpha").unwrap();
    fs::write(search.path().join("b.txt"), b"beta").unwrap();

    let status = Command::new(capybara_bin())
        .args([
            search.path().to_str().unwrap(),
            store.path().to_str().unwrap(),
            "snap",
        ])
        .status()
        .unwrap();
    assert!(status.success());

    let files_dir = store.path().join("files");
    let entries: Vec<_> = fs::read_dir(&files_dir).unwrap().collect();
    assert_eq!(entries.len(), 2);
}

#[test]
fn rerunning_with_same_snapshot_name_fails() {
    let search = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();
    fs::write(search.path().join("a.txt"), b"payload").unwrap();

    let args = [
        search.path().to_str().unwrap().to_string(),
        store.path().to_str().unwrap().to_string(),
        "dup".to_string(),
    ];
    let status = Command::new(capybara_bin()).args(&args).status().unwrap();
    assert!(status.success());

    let status2 = Command::new(capybara_bin()).args(&args).status().unwrap();
    assert!(!status2.success(), "reusing a snapshot name must fail");
}
