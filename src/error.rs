//! Error types for batch archiving.
//!
//! This module provides the [`Error`] enum which represents every failure
//! the library can report, along with a convenient [`Result<T>`] alias.
//!
//! Errors fall into two groups:
//!
//! | Category | Variants | Effect |
//! |----------|----------|--------|
//! | Environment | [`ToolUnavailable`][Error::ToolUnavailable], [`ListUnreadable`][Error::ListUnreadable], [`ArchiveRootIsFile`][Error::ArchiveRootIsFile] | The batch never starts |
//! | Per path | [`NotFound`][Error::NotFound], [`ToolLaunch`][Error::ToolLaunch], [`Io`][Error::Io] | The batch stops at the failing path |
//!
//! Each variant maps to a stable process exit code through
//! [`error_to_exit_code`](crate::exit_code::error_to_exit_code).

use std::io;
use std::path::PathBuf;

/// The main error type for planning and running archive batches.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while preparing output directories.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A source path listed for archiving does not exist.
    #[error("Path does not exist: {}", path.display())]
    NotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// The external compressor could not be found on the search path.
    #[error("{tool} is not available. Please install it and add it to your PATH")]
    ToolUnavailable {
        /// Name or path of the compressor executable.
        tool: String,
    },

    /// The file listing source paths could not be read.
    #[error("Cannot read path list {}: {source}", path.display())]
    ListUnreadable {
        /// Location of the path list.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The archive root exists as a regular file.
    #[error(
        "Archive root {} is a file. Please rename the file or choose another output directory",
        path.display()
    )]
    ArchiveRootIsFile {
        /// The conflicting archive root.
        path: PathBuf,
    },

    /// The external compressor could not be started.
    #[error("Failed to launch {tool}: {source}")]
    ToolLaunch {
        /// Name or path of the compressor executable.
        tool: String,
        /// Underlying spawn failure.
        source: io::Error,
    },
}

/// A specialized Result type for batch archiving.
pub type Result<T> = std::result::Result<T, Error>;
