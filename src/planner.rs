//! Archive planning.
//!
//! [`ArchivePlanner`] turns one source path into an ordered list of
//! [`ArchiveJob`]s:
//!
//! - A plain file becomes one archive directly under the archive root.
//! - A directory gets a same-named subdirectory under the root, holding one
//!   archive per direct child. Child directories are archived whole; there is
//!   no further recursion.
//!
//! Inputs that already look like archives (`.rar`, `.zip`, `.7z`) keep their
//! full file name in the destination, so `photos.zip` becomes
//! `photos.zip.rar`. Other files drop their extension unless that would
//! collide with a sibling's archive or one of its split volumes, an existing
//! archive, or the first volume of an existing split archive; `A.mkv` and
//! `A.mka` then become `A.rar` and `A.mka.rar` (or the other way round,
//! depending on iteration order), and `A.mkv` next to `A.part1.mkv` never
//! shares a name with the other's volumes.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostics;
use crate::{Error, Result};

/// Extension of produced archives.
pub const ARCHIVE_EXTENSION: &str = "rar";

/// Extensions of inputs that are treated as already compressed.
pub const COMPRESSED_EXTENSIONS: [&str; 3] = ["rar", "zip", "7z"];

/// First-volume suffixes the archiver uses for split archives.
const FIRST_VOLUME_SUFFIXES: [&str; 2] = ["part1.rar", "part01.rar"];

/// Output name used when a directory source has no name of its own.
const UNNAMED_SOURCE_DIR: &str = "root";

/// One planned compression unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveJob {
    /// File or directory to compress.
    pub source: PathBuf,
    /// Archive path without any volume suffix.
    pub destination: PathBuf,
}

impl ArchiveJob {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Returns true if `name` carries one of [`COMPRESSED_EXTENSIONS`],
/// compared case-insensitively.
///
/// Only the real extension counts: `photos.ZIP` matches, `myzip` does not.
///
/// ```rust
/// use rarbatch::planner::is_already_compressed;
/// use std::ffi::OsStr;
///
/// assert!(is_already_compressed(OsStr::new("backup.7Z")));
/// assert!(!is_already_compressed(OsStr::new("myzip")));
/// ```
pub fn is_already_compressed(name: &OsStr) -> bool {
    Path::new(name)
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            COMPRESSED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// `name` with `.rar` appended, keeping any existing extension.
fn full_name_archive(name: &OsStr) -> OsString {
    let mut archive = name.to_os_string();
    archive.push(".");
    archive.push(ARCHIVE_EXTENSION);
    archive
}

/// `name` with its last extension replaced by `.rar`.
fn stripped_name_archive(name: &OsStr) -> PathBuf {
    Path::new(name).with_extension(ARCHIVE_EXTENSION)
}

/// For a split-volume name `<base>.part<N>.rar`, returns `<base>.rar`.
fn volume_base(path: &Path) -> Option<PathBuf> {
    if path.extension()? != ARCHIVE_EXTENSION {
        return None;
    }
    let stem = Path::new(path.file_stem()?);
    let digits = stem.extension()?.to_str()?.strip_prefix("part")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(path.with_file_name(stem.with_extension(ARCHIVE_EXTENSION)))
}

/// Destinations already claimed in one output directory, together with the
/// archives their volume names belong to.
#[derive(Debug, Default)]
struct Claimed {
    names: HashSet<PathBuf>,
    volume_bases: HashSet<PathBuf>,
}

impl Claimed {
    fn insert(&mut self, destination: PathBuf) {
        if let Some(base) = volume_base(&destination) {
            self.volume_bases.insert(base);
        }
        self.names.insert(destination);
    }

    /// True if `destination` is claimed, is a volume of a claimed archive, or
    /// has a claimed name among its own volumes.
    fn clashes(&self, destination: &Path) -> bool {
        self.names.contains(destination)
            || self.volume_bases.contains(destination)
            || volume_base(destination).is_some_and(|base| self.names.contains(&base))
    }
}

/// Kind of a directory child, resolved through symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildKind {
    File,
    Directory,
    Other,
}

fn child_kind(path: &Path) -> ChildKind {
    if path.is_dir() {
        ChildKind::Directory
    } else if path.is_file() {
        ChildKind::File
    } else {
        ChildKind::Other
    }
}

/// Plans archive jobs for source paths.
pub struct ArchivePlanner<'a> {
    archive_root: &'a Path,
    diagnostics: &'a dyn Diagnostics,
    create_dirs: bool,
}

impl<'a> ArchivePlanner<'a> {
    /// Creates a planner writing under `archive_root`.
    pub fn new(archive_root: &'a Path, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            archive_root,
            diagnostics,
            create_dirs: true,
        }
    }

    /// When enabled, output subdirectories are not created.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.create_dirs = !dry_run;
        self
    }

    /// Returns the archive root this planner writes under.
    pub fn archive_root(&self) -> &Path {
        self.archive_root
    }

    /// Plans the jobs for one source path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `source` does not exist, and
    /// [`Error::Io`] if the output subdirectory cannot be created or the
    /// source directory cannot be listed.
    pub fn plan(&self, source: &Path) -> Result<Vec<ArchiveJob>> {
        if !source.exists() {
            self.diagnostics
                .error(&format!("Path does not exist: {}", source.display()));
            return Err(Error::NotFound {
                path: source.to_path_buf(),
            });
        }

        match child_kind(source) {
            ChildKind::File => Ok(vec![self.plan_file(source)]),
            ChildKind::Directory => self.plan_directory(source),
            ChildKind::Other => {
                self.diagnostics.warn(&format!(
                    "{} is neither a file nor a directory, skipping.",
                    source.display()
                ));
                Ok(Vec::new())
            }
        }
    }

    fn plan_file(&self, source: &Path) -> ArchiveJob {
        let name = source.file_name().unwrap_or(source.as_os_str());
        let destination = if is_already_compressed(name) {
            self.diagnostics.warn(&format!(
                "{} is already compressed.",
                name.to_string_lossy()
            ));
            self.archive_root.join(full_name_archive(name))
        } else {
            self.archive_root.join(stripped_name_archive(name))
        };
        ArchiveJob::new(source, destination)
    }

    /// Output subdirectory for a directory source.
    pub fn output_dir_for(&self, source: &Path) -> PathBuf {
        let name = match source.file_name() {
            Some(name) => name.to_os_string(),
            None => fs::canonicalize(source)
                .ok()
                .and_then(|p| p.file_name().map(OsStr::to_os_string))
                .unwrap_or_else(|| OsString::from(UNNAMED_SOURCE_DIR)),
        };
        self.archive_root.join(name)
    }

    fn plan_directory(&self, source: &Path) -> Result<Vec<ArchiveJob>> {
        let out_dir = self.output_dir_for(source);
        if self.create_dirs {
            fs::create_dir_all(&out_dir)?;
        }

        let mut children = Vec::new();
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            let path = entry.path();
            children.push((entry.file_name(), child_kind(&path), path));
        }

        // Full-name destinations are unique among siblings; stripped names
        // must stay clear of all of them and of their split volumes.
        let mut reserved = Claimed::default();
        for (name, _, _) in &children {
            reserved.insert(out_dir.join(full_name_archive(name)));
        }
        let mut taken = Claimed::default();

        let mut jobs = Vec::with_capacity(children.len());
        for (name, kind, path) in children {
            let destination = match kind {
                ChildKind::Directory => out_dir.join(full_name_archive(&name)),
                ChildKind::File if is_already_compressed(&name) => {
                    self.diagnostics.warn(&format!(
                        "{} has already been compressed.",
                        name.to_string_lossy()
                    ));
                    out_dir.join(full_name_archive(&name))
                }
                ChildKind::File => {
                    let full = out_dir.join(full_name_archive(&name));
                    let stripped = out_dir.join(stripped_name_archive(&name));
                    if stripped == full {
                        full
                    } else if reserved.clashes(&stripped)
                        || taken.clashes(&stripped)
                        || self.archive_exists(&out_dir, &name)
                    {
                        log::debug!(
                            "{} collides, keeping full name for {}",
                            stripped.display(),
                            path.display()
                        );
                        full
                    } else {
                        taken.insert(stripped.clone());
                        stripped
                    }
                }
                ChildKind::Other => {
                    self.diagnostics.warn(&format!(
                        "{} is neither a file nor a directory, skipping.",
                        path.display()
                    ));
                    continue;
                }
            };
            jobs.push(ArchiveJob::new(path, destination));
        }

        Ok(jobs)
    }

    /// Checks for an archive on disk that the stripped name of `name` would
    /// clash with, including the first volume of a split archive.
    fn archive_exists(&self, out_dir: &Path, name: &OsStr) -> bool {
        if out_dir.join(stripped_name_archive(name)).exists() {
            return true;
        }
        FIRST_VOLUME_SUFFIXES
            .iter()
            .any(|suffix| out_dir.join(Path::new(name).with_extension(suffix)).exists())
    }
}
