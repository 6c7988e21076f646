//! Diagnostic sinks for batch runs.
//!
//! Every component receives a `&dyn Diagnostics` instead of writing to a
//! process-wide logger. Two sinks are provided:
//!
//! - [`TeeLog`] writes timestamped lines to a log file and to stderr.
//! - [`MemoryLog`] keeps events in memory for inspection.
//!
//! # Example
//!
//! ```rust
//! use rarbatch::diagnostics::{Diagnostics, MemoryLog};
//!
//! let log = MemoryLog::new();
//! log.info("Starting the archiving process.");
//! log.warn_with("already compressed", &[("name", "photos.zip".into())]);
//! assert_eq!(log.events().len(), 2);
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use console::style;
pub use log::Level;

/// Key/value pairs attached to a diagnostic event.
pub type Context<'a> = &'a [(&'a str, String)];

/// Receiver of operator-facing diagnostics.
pub trait Diagnostics {
    /// Records one event.
    fn record(&self, level: Level, message: &str, context: Context<'_>);

    /// Appends raw text (such as captured tool output) to the log.
    ///
    /// The default implementation records it as an error event.
    fn attach(&self, text: &str) {
        self.record(Level::Error, text, &[]);
    }

    fn info(&self, message: &str) {
        self.record(Level::Info, message, &[]);
    }

    fn warn(&self, message: &str) {
        self.record(Level::Warn, message, &[]);
    }

    fn error(&self, message: &str) {
        self.record(Level::Error, message, &[]);
    }

    fn info_with(&self, message: &str, context: Context<'_>) {
        self.record(Level::Info, message, context);
    }

    fn warn_with(&self, message: &str, context: Context<'_>) {
        self.record(Level::Warn, message, context);
    }

    fn error_with(&self, message: &str, context: Context<'_>) {
        self.record(Level::Error, message, context);
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn record(&self, level: Level, message: &str, context: Context<'_>) {
        (**self).record(level, message, context);
    }

    fn attach(&self, text: &str) {
        (**self).attach(text);
    }
}

/// Formats the message and its context as `message key=value ...`.
fn format_body(message: &str, context: Context<'_>) -> String {
    let mut body = message.to_string();
    for (key, value) in context {
        body.push_str(&format!(" {key}={value}"));
    }
    body
}

/// Formats one log line without the trailing newline.
fn format_line(timestamp: &str, level: Level, message: &str, context: Context<'_>) -> String {
    format!(
        "{timestamp}: {}: {}",
        level_name(level),
        format_body(message, context)
    )
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Writes each event to a log file and to stderr.
pub struct TeeLog {
    file: Mutex<File>,
    console: bool,
    colored: bool,
    write_failed: AtomicBool,
}

impl TeeLog {
    /// Creates (truncating) the log file at `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            file: Mutex::new(file),
            console: true,
            colored: console::colors_enabled_stderr(),
            write_failed: AtomicBool::new(false),
        })
    }

    /// Disables console echo; the log file is still written.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.console = !quiet;
        self
    }

    /// Returns true once a write to the log file has failed.
    pub fn has_write_errors(&self) -> bool {
        self.write_failed.load(Ordering::Relaxed)
    }

    fn write_file(&self, text: &str) {
        let Ok(mut file) = self.file.lock() else {
            return;
        };
        // A failing log file must not abort the batch; report it once
        if let Err(e) = file.write_all(text.as_bytes()).and_then(|()| file.flush()) {
            if !self.write_failed.swap(true, Ordering::Relaxed) {
                log::warn!("cannot write to log file: {e}");
            }
        }
    }
}

impl Diagnostics for TeeLog {
    fn record(&self, level: Level, message: &str, context: Context<'_>) {
        let timestamp = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S,%3f")
            .to_string();
        let line = format_line(&timestamp, level, message, context);
        self.write_file(&format!("{line}\n"));

        if self.console {
            if self.colored {
                let name = style(level_name(level)).for_stderr();
                let name = match level {
                    Level::Error => name.red().bold(),
                    Level::Warn => name.yellow(),
                    _ => name.green(),
                };
                eprintln!("{timestamp}: {name}: {}", format_body(message, context));
            } else {
                eprintln!("{line}");
            }
        }
    }

    fn attach(&self, text: &str) {
        self.write_file(text);
        if !text.ends_with('\n') {
            self.write_file("\n");
        }
    }
}

/// A recorded diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub level: Level,
    pub message: String,
    pub context: Vec<(String, String)>,
}

impl Event {
    /// Looks up a context value by key.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    events: Mutex<Vec<Event>>,
    attachments: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Returns a snapshot of attached raw text.
    pub fn attachments(&self) -> Vec<String> {
        self.attachments.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// Returns the messages recorded at `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }
}

impl Diagnostics for MemoryLog {
    fn record(&self, level: Level, message: &str, context: Context<'_>) {
        if let Ok(mut events) = self.events.lock() {
            events.push(Event {
                level,
                message: message.to_string(),
                context: context
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), v.clone()))
                    .collect(),
            });
        }
    }

    fn attach(&self, text: &str) {
        if let Ok(mut attachments) = self.attachments.lock() {
            attachments.push(text.to_string());
        }
    }
}
