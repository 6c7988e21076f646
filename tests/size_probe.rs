//! Size probe integration tests.
//!
//! Large sizes are simulated with sparse files so no real disk space is used.

use std::fs;

use rarbatch::diagnostics::Level;
use rarbatch::size::{BYTES_GIB, DEFAULT_VOLUME_SIZE};
use rarbatch::{MemoryLog, SizeProbe};
use tempfile::tempdir;

mod common;
use common::sparse_file;

#[test]
fn test_threshold_is_exclusive() {
    let dir = tempdir().unwrap();
    let exact = dir.path().join("exact.bin");
    sparse_file(&exact, DEFAULT_VOLUME_SIZE);

    let log = MemoryLog::new();
    let probe = SizeProbe::new(&log);
    assert!(!probe.exceeds(&exact, DEFAULT_VOLUME_SIZE));
    assert!(probe.exceeds(&exact, DEFAULT_VOLUME_SIZE - 1));
}

#[test]
fn test_five_and_three_gib_files() {
    let dir = tempdir().unwrap();
    let five = dir.path().join("five.bin");
    let three = dir.path().join("three.bin");
    sparse_file(&five, 5 * BYTES_GIB);
    sparse_file(&three, 3 * BYTES_GIB);

    let log = MemoryLog::new();
    let probe = SizeProbe::new(&log);
    assert!(probe.exceeds(&five, DEFAULT_VOLUME_SIZE));
    assert!(!probe.exceeds(&three, DEFAULT_VOLUME_SIZE));
}

#[test]
fn test_directory_total_crosses_threshold() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    sparse_file(&dir.path().join("a.bin"), 3 * BYTES_GIB);
    sparse_file(&dir.path().join("sub/b.bin"), 2 * BYTES_GIB);

    let log = MemoryLog::new();
    let probe = SizeProbe::new(&log);
    assert_eq!(probe.tree_size(dir.path()), 5 * BYTES_GIB);
    assert!(probe.exceeds(dir.path(), DEFAULT_VOLUME_SIZE));
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_counted() {
    use std::os::unix::fs::symlink;

    let outside = tempdir().unwrap();
    let large = outside.path().join("large.bin");
    sparse_file(&large, 5 * BYTES_GIB);

    let tree = tempdir().unwrap();
    fs::write(tree.path().join("small.txt"), vec![0u8; 100]).unwrap();
    symlink(&large, tree.path().join("link.bin")).unwrap();
    symlink(outside.path(), tree.path().join("linked_dir")).unwrap();

    let log = MemoryLog::new();
    let probe = SizeProbe::new(&log);
    assert_eq!(probe.tree_size(tree.path()), 100);
    assert!(!probe.exceeds(tree.path(), DEFAULT_VOLUME_SIZE));
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_terminates() {
    use std::os::unix::fs::symlink;

    let tree = tempdir().unwrap();
    fs::create_dir(tree.path().join("loop")).unwrap();
    fs::write(tree.path().join("loop/data.txt"), vec![0u8; 10]).unwrap();
    symlink(tree.path(), tree.path().join("loop/back")).unwrap();

    let log = MemoryLog::new();
    let probe = SizeProbe::new(&log);
    assert_eq!(probe.tree_size(tree.path()), 10);
}

#[test]
fn test_missing_path_warns() {
    let dir = tempdir().unwrap();
    let log = MemoryLog::new();
    let probe = SizeProbe::new(&log);

    assert_eq!(probe.size_of(&dir.path().join("missing")), None);
    assert_eq!(log.messages(Level::Warn).len(), 1);
}
