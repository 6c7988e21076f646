//! Batch execution.
//!
//! [`BatchRunner`] reads the path list, plans each source with
//! [`ArchivePlanner`] and hands every job to the [`Compressor`], strictly one
//! after another. The first failure anywhere stops the whole batch; jobs that
//! already finished are kept.
//!
//! # Example
//!
//! ```rust,no_run
//! use rarbatch::batch::{BatchConfig, BatchRunner};
//! use rarbatch::compress::{CompressOptions, ProcessRunner};
//! use rarbatch::diagnostics::TeeLog;
//!
//! let log = TeeLog::create("archive.log")?;
//! let config = BatchConfig::new("archive.txt", "archive", CompressOptions::new("secret"));
//! let result = BatchRunner::new(config, ProcessRunner, &log).run();
//! std::process::exit(result.exit_code.code());
//! # Ok::<(), std::io::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::compress::{CompressOptions, Compressor, ToolRunner};
use crate::diagnostics::Diagnostics;
use crate::exit_code::{ExitCode, error_to_exit_code};
use crate::planner::{ArchiveJob, ArchivePlanner};
use crate::{Error, Result};

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Text file with one source path per line.
    pub list_file: PathBuf,
    /// Directory receiving all archives.
    pub archive_root: PathBuf,
    /// Compressor settings shared by every job.
    pub compress: CompressOptions,
    /// Plan only: no directories are created and the tool is not run.
    pub dry_run: bool,
}

impl BatchConfig {
    pub fn new(
        list_file: impl Into<PathBuf>,
        archive_root: impl Into<PathBuf>,
        compress: CompressOptions,
    ) -> Self {
        Self {
            list_file: list_file.into(),
            archive_root: archive_root.into(),
            compress,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Exit code of the first failing step, or success.
    pub exit_code: ExitCode,
    /// Source path whose planning or compression failed.
    pub failed_path: Option<PathBuf>,
    /// First job the compressor failed on.
    pub failed_job: Option<ArchiveJob>,
    /// Jobs that completed, or every planned job in a dry run.
    pub jobs: Vec<ArchiveJob>,
}

impl BatchResult {
    fn with_code(exit_code: ExitCode) -> Self {
        Self {
            exit_code,
            failed_path: None,
            failed_job: None,
            jobs: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code.is_success()
    }
}

/// Runs a batch of archive jobs sequentially.
pub struct BatchRunner<'a, R> {
    config: BatchConfig,
    compressor: Compressor<'a, R>,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a, R: ToolRunner> BatchRunner<'a, R> {
    pub fn new(config: BatchConfig, runner: R, diagnostics: &'a dyn Diagnostics) -> Self {
        let compressor = Compressor::new(runner, config.compress.clone(), diagnostics);
        Self {
            config,
            compressor,
            diagnostics,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Checks the environment without creating anything.
    ///
    /// Checks run in order: tool availability (skipped in a dry run), path
    /// list, archive root. [`run`](Self::run) repeats them, so this is only
    /// needed to fail early, for example before prompting for a password.
    pub fn check(&self) -> Result<()> {
        self.read_paths().map(drop)
    }

    fn read_paths(&self) -> Result<Vec<String>> {
        if !self.config.dry_run && !self.compressor.is_available() {
            return Err(Error::ToolUnavailable {
                tool: self.config.compress.tool.clone(),
            });
        }

        let content =
            fs::read_to_string(&self.config.list_file).map_err(|source| Error::ListUnreadable {
                path: self.config.list_file.clone(),
                source,
            })?;

        let root = &self.config.archive_root;
        if root.is_file() {
            return Err(Error::ArchiveRootIsFile { path: root.clone() });
        }

        Ok(content.lines().map(str::to_string).collect())
    }

    /// Checks the environment, creates the archive root and returns the
    /// listed source paths.
    fn prepare(&self) -> Result<Vec<String>> {
        let paths = self.read_paths()?;
        let root = &self.config.archive_root;
        if !self.config.dry_run && !root.exists() {
            fs::create_dir_all(root)?;
        }
        Ok(paths)
    }

    /// Runs the batch to completion or to the first failure.
    pub fn run(&self) -> BatchResult {
        self.diagnostics.info("Starting the archiving process.");

        let paths = match self.prepare() {
            Ok(paths) => paths,
            Err(err) => {
                self.diagnostics.error(&err.to_string());
                return BatchResult::with_code(error_to_exit_code(&err));
            }
        };

        let planner = ArchivePlanner::new(&self.config.archive_root, self.diagnostics)
            .dry_run(self.config.dry_run);
        let mut result = BatchResult::with_code(ExitCode::Success);

        'paths: for line in &paths {
            self.diagnostics.info(&format!("Processing {line}"));
            let source = Path::new(line);

            let jobs = match planner.plan(source) {
                Ok(jobs) => jobs,
                Err(err) => {
                    if !matches!(err, Error::NotFound { .. }) {
                        self.diagnostics.error(&err.to_string());
                    }
                    result.exit_code = error_to_exit_code(&err);
                    result.failed_path = Some(source.to_path_buf());
                    break;
                }
            };

            if self.config.dry_run {
                result.jobs.extend(jobs);
                continue;
            }

            for job in jobs {
                let exit_code = match self.compressor.compress(&job) {
                    Ok(0) => {
                        result.jobs.push(job);
                        continue;
                    }
                    Ok(_) => ExitCode::CompressionFailed,
                    Err(err) => {
                        self.diagnostics.error(&err.to_string());
                        error_to_exit_code(&err)
                    }
                };
                result.exit_code = exit_code;
                result.failed_path = Some(source.to_path_buf());
                result.failed_job = Some(job);
                break 'paths;
            }
        }

        if result.is_success() {
            self.diagnostics.info("All files processed successfully.");
        } else {
            self.diagnostics
                .error("Some files failed to compress. Please check the log file.");
        }
        result
    }
}
