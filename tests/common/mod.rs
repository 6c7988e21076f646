//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use rarbatch::{ToolOutput, ToolRunner};

/// One recorded tool invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub tool: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Source path (last argument).
    pub fn source(&self) -> &str {
        self.args.last().map(String::as_str).unwrap_or_default()
    }

    /// Destination archive (second to last argument).
    pub fn destination(&self) -> &str {
        self.args
            .len()
            .checked_sub(2)
            .map(|i| self.args[i].as_str())
            .unwrap_or_default()
    }

    /// The `-v<size>b` argument, if present.
    pub fn volume_arg(&self) -> Option<&str> {
        self.args
            .iter()
            .map(String::as_str)
            .find(|a| a.starts_with("-v"))
    }
}

/// Tool runner returning scripted exit codes and recording every call.
pub struct ScriptedRunner {
    available: bool,
    exit_codes: RefCell<Vec<i32>>,
    stderr: Vec<u8>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    /// A runner whose every call succeeds.
    pub fn succeeding() -> Self {
        Self::with_exit_codes(&[])
    }

    /// A runner returning `codes` in order, then 0.
    pub fn with_exit_codes(codes: &[i32]) -> Self {
        Self {
            available: true,
            exit_codes: RefCell::new(codes.iter().rev().copied().collect()),
            stderr: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A runner reporting the tool as missing.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::succeeding()
        }
    }

    /// Sets the stderr bytes returned by failing calls.
    pub fn stderr(mut self, bytes: &[u8]) -> Self {
        self.stderr = bytes.to_vec();
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl ToolRunner for ScriptedRunner {
    fn is_available(&self, _tool: &str) -> bool {
        self.available
    }

    fn run(&self, tool: &str, args: &[OsString]) -> io::Result<ToolOutput> {
        self.calls.borrow_mut().push(Invocation {
            tool: tool.to_string(),
            args: args
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        });
        let code = self.exit_codes.borrow_mut().pop().unwrap_or(0);
        Ok(ToolOutput {
            code: Some(code),
            stdout: Vec::new(),
            stderr: if code == 0 {
                Vec::new()
            } else {
                self.stderr.clone()
            },
        })
    }
}

/// Writes `lines` as a newline-separated path list.
pub fn write_list(dir: &Path, lines: &[&Path]) -> PathBuf {
    let list = dir.join("archive.txt");
    let content: String = lines
        .iter()
        .map(|p| format!("{}\n", p.display()))
        .collect();
    fs::write(&list, content).expect("Failed to write path list");
    list
}

/// Creates a sparse file reporting `len` bytes without allocating them.
pub fn sparse_file(path: &Path, len: u64) {
    let file = File::create(path).expect("Failed to create sparse file");
    file.set_len(len).expect("Failed to extend sparse file");
}
