//! CLI tool for batch RAR archiving.

mod output;
mod password;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use rarbatch::compress::DEFAULT_TOOL;
use rarbatch::diagnostics::Diagnostics;
use rarbatch::exit_code::{self, ExitCode, error_to_exit_code};
use rarbatch::size::DEFAULT_VOLUME_SIZE;
use rarbatch::{BatchConfig, BatchRunner, CompressOptions, ProcessRunner, TeeLog};

/// Batch-archive listed paths into encrypted RAR archives
#[derive(Parser)]
#[command(name = "rarbatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File listing one source path per line
    #[arg(short = 'l', long, env = "RARBATCH_LIST", default_value = "archive.txt")]
    list: PathBuf,

    /// Directory receiving the archives
    #[arg(short = 'o', long, env = "RARBATCH_OUTPUT", default_value = "archive")]
    output: PathBuf,

    /// Log file (overwritten on every run)
    #[arg(long, env = "RARBATCH_LOG", default_value = "archive.log")]
    log_file: PathBuf,

    /// Archive password (will prompt if not provided)
    #[arg(short = 'p', long, env = "RARBATCH_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Compressor executable
    #[arg(long, env = "RARBATCH_TOOL", default_value = DEFAULT_TOOL)]
    tool: String,

    /// Split sources larger than this many bytes into volumes of this size
    #[arg(long, default_value_t = DEFAULT_VOLUME_SIZE)]
    volume_size: u64,

    /// Print the plan without creating directories or running the tool
    #[arg(long)]
    dry_run: bool,

    /// Summary output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    format: OutputFormat,

    /// Do not echo log lines to the console
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_code::USER_INTERRUPT);
    })
    .ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::BadArgs
            } else {
                ExitCode::Success
            };
            std::process::exit(code.code());
        }
    };

    std::process::exit(run(cli).code());
}

fn run(cli: Cli) -> ExitCode {
    let log = match TeeLog::create(&cli.log_file) {
        Ok(log) => log.quiet(cli.quiet),
        Err(e) => {
            eprintln!("Error: cannot open log file {}: {}", cli.log_file.display(), e);
            return ExitCode::IoError;
        }
    };

    let options = CompressOptions::new(cli.password.clone().unwrap_or_default())
        .tool(cli.tool)
        .volume_size(cli.volume_size);
    let mut config = BatchConfig::new(cli.list, cli.output, options).dry_run(cli.dry_run);

    if !cli.dry_run {
        // Fail on a missing tool or unreadable list before asking for a password
        if let Err(err) = BatchRunner::new(config.clone(), ProcessRunner, &log).check() {
            log.error(&err.to_string());
            return error_to_exit_code(&err);
        }
        config.compress.password = match password::get_or_prompt_password(cli.password) {
            Some(pwd) => pwd,
            None => return ExitCode::BadArgs,
        };
    }

    let result = BatchRunner::new(config, ProcessRunner, &log).run();

    let formatter = output::create_formatter(cli.format);
    let summary = formatter.format_result(&result, cli.dry_run);
    if !summary.is_empty() {
        print!("{summary}");
    }

    result.exit_code
}
