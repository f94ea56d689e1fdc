//! End-to-end: loading a file into a `GapBuf`, editing it, and writing it
//! back out round-trips correctly through the filesystem.

use delimtools::gapbuf::GapBuf;

#[test]
fn edit_and_save_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "first line\nsecond line\n").unwrap();

    let mut buf = GapBuf::load_file(&path).unwrap();
    buf.end_of_buffer();
    buf.insert_str_right(b"third line\n", 1).unwrap();
    buf.write_file().unwrap();

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, "first line\nsecond line\nthird line\n");
    assert!(!buf.is_modified());
}

#[test]
fn write_file_as_changes_target_without_touching_original() {
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("a.txt");
    let other = dir.path().join("b.txt");
    std::fs::write(&original, "content\n").unwrap();

    let mut buf = GapBuf::load_file(&original).unwrap();
    buf.write_file_as(&other).unwrap();

    assert_eq!(std::fs::read_to_string(&other).unwrap(), "content\n");
    assert_eq!(std::fs::read_to_string(&original).unwrap(), "content\n");
}

#[test]
fn mark_region_cut_and_paste_across_buffers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, "alpha beta gamma\n").unwrap();

    let mut src = GapBuf::load_file(&path).unwrap();
    src.start_of_buffer();
    src.set_mark();
    for _ in 0.."alpha ".len() {
        src.move_right(1).unwrap();
    }

    let mut dst = GapBuf::with_default_size();
    src.copy_region(&mut dst).unwrap();

    assert_eq!(dst.to_string_lossy(), "alpha ");
}
