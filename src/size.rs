//! Size probing for volume-split decisions.
//!
//! [`SizeProbe`] measures a file, or the sum of regular files under a
//! directory, without following symbolic links. Results are not cached; each
//! call reflects the filesystem at that moment.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::diagnostics::Diagnostics;

/// IEC byte unit: 1 KiB = 1024 bytes.
pub const BYTES_KIB: u64 = 1024;
/// IEC byte unit: 1 MiB = 1024 KiB.
pub const BYTES_MIB: u64 = 1024 * BYTES_KIB;
/// IEC byte unit: 1 GiB = 1024 MiB.
pub const BYTES_GIB: u64 = 1024 * BYTES_MIB;

/// Default split threshold and volume size (4 GiB).
pub const DEFAULT_VOLUME_SIZE: u64 = 4 * BYTES_GIB;

/// Computes on-disk sizes of archive sources.
pub struct SizeProbe<'a> {
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> SizeProbe<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Returns true if `path` holds more than `threshold` bytes.
    ///
    /// A regular file is compared by its length. A directory is compared by
    /// the total of every regular file beneath it, symlinks excluded. Any
    /// other path (missing, special file) is reported and treated as not
    /// oversized.
    pub fn exceeds(&self, path: &Path, threshold: u64) -> bool {
        match self.size_of(path) {
            Some(size) => size > threshold,
            None => false,
        }
    }

    /// Returns the size of `path`, or `None` if it is neither a file nor a
    /// directory.
    pub fn size_of(&self, path: &Path) -> Option<u64> {
        if path.is_file() {
            match fs::metadata(path) {
                Ok(meta) => Some(meta.len()),
                Err(err) => {
                    self.diagnostics.warn_with(
                        "Cannot read file size",
                        &[
                            ("path", path.display().to_string()),
                            ("error", err.to_string()),
                        ],
                    );
                    None
                }
            }
        } else if path.is_dir() {
            Some(self.tree_size(path))
        } else {
            self.diagnostics.warn(&format!(
                "{} is neither a file nor a directory.",
                path.display()
            ));
            None
        }
    }

    /// Sums the lengths of regular files under `root`.
    ///
    /// Symbolic links are never followed or counted. Unreadable entries are
    /// reported and skipped.
    pub fn tree_size(&self, root: &Path) -> u64 {
        let mut total = 0u64;
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    self.diagnostics
                        .warn_with("Skipping unreadable entry", &[("error", err.to_string())]);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match entry.metadata() {
                Ok(meta) => total = total.saturating_add(meta.len()),
                Err(err) => self.diagnostics.warn_with(
                    "Skipping unreadable entry",
                    &[
                        ("path", entry.path().display().to_string()),
                        ("error", err.to_string()),
                    ],
                ),
            }
        }
        total
    }
}
