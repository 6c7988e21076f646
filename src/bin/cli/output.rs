//! Output formatting for CLI operations.

use rarbatch::{ArchiveJob, BatchResult};
use serde_json::json;

use crate::OutputFormat;

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the outcome of a batch run
    fn format_result(&self, result: &BatchResult, dry_run: bool) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_result(&self, result: &BatchResult, dry_run: bool) -> String {
        let mut output = String::new();

        if dry_run {
            for job in &result.jobs {
                output.push_str(&format!(
                    "{} -> {}\n",
                    job.source.display(),
                    job.destination.display()
                ));
            }
            output.push_str(&format!("{} jobs planned\n", result.jobs.len()));
            return output;
        }

        output.push_str(&format!("{} archives created\n", result.jobs.len()));
        if let Some(job) = &result.failed_job {
            output.push_str(&format!(
                "Failed: {} -> {}\n",
                job.source.display(),
                job.destination.display()
            ));
        } else if let Some(path) = &result.failed_path {
            output.push_str(&format!("Failed: {}\n", path.display()));
        }
        output
    }
}

/// JSON output formatter
pub struct JsonFormatter;

fn job_json(job: &ArchiveJob) -> serde_json::Value {
    json!({
        "source": job.source.to_string_lossy(),
        "destination": job.destination.to_string_lossy(),
    })
}

impl OutputFormatter for JsonFormatter {
    fn format_result(&self, result: &BatchResult, dry_run: bool) -> String {
        let value = json!({
            "dry_run": dry_run,
            "exit_code": result.exit_code.code(),
            "jobs": result.jobs.iter().map(job_json).collect::<Vec<_>>(),
            "failed_path": result.failed_path.as_ref().map(|p| p.to_string_lossy()),
            "failed_job": result.failed_job.as_ref().map(job_json),
        });
        let mut output = serde_json::to_string_pretty(&value).unwrap_or_default();
        output.push('\n');
        output
    }
}

/// Creates a formatter for the given output format
pub fn create_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Human => Box::new(HumanFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
