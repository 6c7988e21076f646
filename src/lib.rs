//! # rarbatch
//!
//! Batch-archives a list of files and directories into password-protected,
//! split-capable RAR archives using the external `rar` tool.
//!
//! The crate decides *what* to compress into *which* archive name with
//! *which* options, runs the tool once per job, and reports the first
//! failure. It never implements compression or encryption itself.
//!
//! ## Output Layout
//!
//! | Source | Archives |
//! |--------|----------|
//! | `report.txt` | `<root>/report.rar` |
//! | `backup.zip` | `<root>/backup.zip.rar` |
//! | `photos/` with `a.jpg`, `b.jpg` | `<root>/photos/a.rar`, `<root>/photos/b.rar` |
//! | `show/` with `A.mkv`, `A.mka` | `<root>/show/A.rar`, `<root>/show/A.mka.rar` |
//!
//! Sources larger than the volume size (4 GiB by default) are split into
//! volumes of that size.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rarbatch::{BatchConfig, BatchRunner, CompressOptions, ProcessRunner, TeeLog};
//!
//! let log = TeeLog::create("archive.log")?;
//! let config = BatchConfig::new("archive.txt", "archive", CompressOptions::new("secret"));
//! let result = BatchRunner::new(config, ProcessRunner, &log).run();
//! if !result.is_success() {
//!     eprintln!("failed at {:?}", result.failed_job);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Planning Only
//!
//! ```rust,no_run
//! use rarbatch::{ArchivePlanner, MemoryLog};
//! use std::path::Path;
//!
//! let log = MemoryLog::new();
//! let planner = ArchivePlanner::new(Path::new("archive"), &log).dry_run(true);
//! for job in planner.plan(Path::new("photos"))? {
//!     println!("{} -> {}", job.source.display(), job.destination.display());
//! }
//! # Ok::<(), rarbatch::Error>(())
//! ```

pub mod batch;
pub mod compress;
pub mod diagnostics;
pub mod error;
pub mod exit_code;
pub mod locale;
pub mod planner;
pub mod size;

pub use batch::{BatchConfig, BatchResult, BatchRunner};
pub use compress::{CompressOptions, Compressor, ProcessRunner, ToolOutput, ToolRunner};
pub use diagnostics::{Diagnostics, MemoryLog, TeeLog};
pub use error::{Error, Result};
pub use exit_code::ExitCode;
pub use planner::{ArchiveJob, ArchivePlanner, is_already_compressed};
pub use size::SizeProbe;
