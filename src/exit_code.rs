//! Exit codes reported by a batch run.
//!
//! The numeric values are stable so scripts can tell failure classes apart.

use crate::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Compressor executable not found
pub const TOOL_UNAVAILABLE: i32 = 1;
/// Path list file could not be read
pub const LIST_UNREADABLE: i32 = 2;
/// Archive root exists as a regular file
pub const ARCHIVE_ROOT_IS_FILE: i32 = 3;
/// A listed source path does not exist
pub const SOURCE_MISSING: i32 = 4;
/// The compressor failed (or could not be launched) for a job
pub const COMPRESSION_FAILED: i32 = 5;
/// Output directories could not be created
pub const IO_ERROR: i32 = 6;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    ToolUnavailable,
    ListUnreadable,
    ArchiveRootIsFile,
    SourceMissing,
    CompressionFailed,
    IoError,
    UserInterrupt,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::ToolUnavailable => TOOL_UNAVAILABLE,
            Self::ListUnreadable => LIST_UNREADABLE,
            Self::ArchiveRootIsFile => ARCHIVE_ROOT_IS_FILE,
            Self::SourceMissing => SOURCE_MISSING,
            Self::CompressionFailed => COMPRESSION_FAILED,
            Self::IoError => IO_ERROR,
            Self::UserInterrupt => USER_INTERRUPT,
            Self::BadArgs => BAD_ARGS,
        }
    }

    /// Returns true for [`ExitCode::Success`].
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Converts a library error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) => ExitCode::IoError,
        Error::NotFound { .. } => ExitCode::SourceMissing,
        Error::ToolUnavailable { .. } => ExitCode::ToolUnavailable,
        Error::ListUnreadable { .. } => ExitCode::ListUnreadable,
        Error::ArchiveRootIsFile { .. } => ExitCode::ArchiveRootIsFile,
        Error::ToolLaunch { .. } => ExitCode::CompressionFailed,
    }
}
