//! Property-based tests for archive planning using proptest.
//!
//! Sibling names are generated from a small alphabet of stems and extensions
//! so that shared basenames (`A.mkv` / `A.mka`) and directory/file stem clashes
//! come up often.

use std::collections::HashSet;
use std::fs;

use proptest::prelude::*;
use rarbatch::{ArchivePlanner, MemoryLog};
use tempfile::tempdir;

/// A directory child: name plus whether it is a directory.
fn child_strategy() -> impl Strategy<Value = (String, bool)> {
    let stem = prop::sample::select(vec!["A", "B", "a", "notes", "A.mkv"]);
    let ext = prop::sample::select(vec!["", ".mkv", ".mka", ".rar", ".ZIP", ".7z", ".txt"]);
    (stem, ext, prop::bool::weighted(0.2))
        .prop_map(|(stem, ext, is_dir)| (format!("{stem}{ext}"), is_dir))
}

fn children_strategy() -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::vec(child_strategy(), 0..10).prop_map(|children| {
        let mut seen = HashSet::new();
        children
            .into_iter()
            .filter(|(name, _)| seen.insert(name.clone()))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every direct child gets exactly one job and all destinations differ.
    #[test]
    fn destinations_are_unique(children in children_strategy()) {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let dir = src.path().join("source");
        fs::create_dir(&dir).unwrap();
        for (name, is_dir) in &children {
            if *is_dir {
                fs::create_dir(dir.join(name)).unwrap();
                fs::write(dir.join(name).join("inner.txt"), b"inner").unwrap();
            } else {
                fs::write(dir.join(name), name.as_bytes()).unwrap();
            }
        }

        let log = MemoryLog::new();
        let jobs = ArchivePlanner::new(out.path(), &log).plan(&dir).unwrap();

        prop_assert_eq!(jobs.len(), children.len());
        let out_dir = out.path().join("source");
        let destinations: HashSet<_> = jobs.iter().map(|j| j.destination.clone()).collect();
        prop_assert_eq!(destinations.len(), jobs.len());
        for job in &jobs {
            prop_assert_eq!(job.destination.parent(), Some(out_dir.as_path()));
            let is_rar = job.destination.extension().is_some_and(|e| e == "rar");
            prop_assert!(is_rar);
        }
    }
}
