//! Invocation of the external compressor.
//!
//! The archiver is an opaque executable driven with a fixed argument set:
//!
//! | Argument | Meaning |
//! |----------|---------|
//! | `-ma5` | RAR5 format (AES-256 encryption) |
//! | `-rr5` | 5% recovery record |
//! | `-m0` | store only, no compression |
//! | `-hp<password>` | encrypt file data and names |
//! | `-v<size>b` | split into volumes (only for oversized sources) |
//! | `-ep1` | strip the base directory from stored names |
//! | `a` | add to archive |
//! | `-r` | recurse into subdirectories |
//!
//! followed by the destination archive and the source path. Output streams
//! are captured; stderr is decoded and appended to the log only when the tool
//! fails.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::diagnostics::Diagnostics;
use crate::locale;
use crate::planner::ArchiveJob;
use crate::size::{DEFAULT_VOLUME_SIZE, SizeProbe};
use crate::{Error, Result};

/// Default compressor executable.
pub const DEFAULT_TOOL: &str = "rar";

/// Captured result of one tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit status code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Exit code as reported to callers; signal termination maps to -1.
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(-1)
    }
}

/// Runs external tools.
///
/// [`ProcessRunner`] spawns real processes; tests substitute scripted
/// runners.
pub trait ToolRunner {
    /// Returns true if `tool` can be executed.
    fn is_available(&self, tool: &str) -> bool;

    /// Runs `tool` with `args` to completion, capturing its output.
    fn run(&self, tool: &str, args: &[OsString]) -> io::Result<ToolOutput>;
}

impl<R: ToolRunner + ?Sized> ToolRunner for &R {
    fn is_available(&self, tool: &str) -> bool {
        (**self).is_available(tool)
    }

    fn run(&self, tool: &str, args: &[OsString]) -> io::Result<ToolOutput> {
        (**self).run(tool, args)
    }
}

/// Runs tools as blocking child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn is_available(&self, tool: &str) -> bool {
        which::which(tool).is_ok()
    }

    fn run(&self, tool: &str, args: &[OsString]) -> io::Result<ToolOutput> {
        let output = Command::new(tool)
            .args(args)
            .stdin(Stdio::null())
            .output()?;
        Ok(ToolOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Settings shared by every job of a batch.
#[derive(Clone)]
pub struct CompressOptions {
    /// Compressor executable name or path.
    pub tool: String,
    /// Password applied to every archive.
    pub password: String,
    /// Split threshold and volume size in bytes.
    pub volume_size: u64,
}

impl CompressOptions {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            password: password.into(),
            volume_size: DEFAULT_VOLUME_SIZE,
        }
    }

    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn volume_size(mut self, bytes: u64) -> Self {
        self.volume_size = bytes;
        self
    }
}

impl std::fmt::Debug for CompressOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressOptions")
            .field("tool", &self.tool)
            .field("password", &"<redacted>")
            .field("volume_size", &self.volume_size)
            .finish()
    }
}

/// Wraps the external compressor for single jobs.
pub struct Compressor<'a, R> {
    runner: R,
    options: CompressOptions,
    probe: SizeProbe<'a>,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a, R: ToolRunner> Compressor<'a, R> {
    pub fn new(runner: R, options: CompressOptions, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            runner,
            options,
            probe: SizeProbe::new(diagnostics),
            diagnostics,
        }
    }

    pub fn options(&self) -> &CompressOptions {
        &self.options
    }

    /// Returns true if the configured tool can be executed.
    pub fn is_available(&self) -> bool {
        self.runner.is_available(&self.options.tool)
    }

    /// Builds the tool arguments for one job.
    pub fn arguments(&self, source: &Path, destination: &Path, split: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-ma5".into(),
            "-rr5".into(),
            "-m0".into(),
            format!("-hp{}", self.options.password).into(),
        ];
        if split {
            args.push(format!("-v{}b", self.options.volume_size).into());
        }
        args.extend(["-ep1", "a", "-r"].map(OsString::from));
        args.push(destination.as_os_str().to_os_string());
        args.push(source.as_os_str().to_os_string());
        args
    }

    /// Compresses one job and returns the tool's exit code unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolLaunch`] if the tool cannot be started.
    pub fn compress(&self, job: &ArchiveJob) -> Result<i32> {
        let split = self.probe.exceeds(&job.source, self.options.volume_size);
        let args = self.arguments(&job.source, &job.destination, split);

        self.diagnostics.info_with(
            &format!(
                "Compressing {} to {}",
                job.source.display(),
                job.destination.display()
            ),
            &[("split", split.to_string())],
        );
        log::debug!(
            "{} {}",
            self.options.tool,
            redacted(&args).join(" ")
        );

        let output = self
            .runner
            .run(&self.options.tool, &args)
            .map_err(|source| Error::ToolLaunch {
                tool: self.options.tool.clone(),
                source,
            })?;

        let code = output.exit_code();
        if code != 0 {
            self.diagnostics.error_with(
                &format!("Compression failed: {}", job.source.display()),
                &[("exit_code", code.to_string())],
            );
            let stderr = locale::decode_output(&output.stderr);
            if !stderr.is_empty() {
                self.diagnostics.attach(&stderr);
            }
        }
        Ok(code)
    }
}

/// Arguments for display, with the password masked.
fn redacted(args: &[OsString]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            let arg = arg.to_string_lossy();
            if arg.starts_with("-hp") {
                "-hp***".to_string()
            } else {
                arg.into_owned()
            }
        })
        .collect()
}
