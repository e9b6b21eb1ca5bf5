//! Folio CLI
//!
//! Command-line interface for exporting encounter reports from the
//! report-job service.

mod commands;
mod config;
mod notifier;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::{Config, OutputMode, Overrides};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Encounter report export CLI", long_about = None)]
struct Cli {
    /// Report service base URL
    #[arg(long, global = true, env = "FOLIO_BASE_URL")]
    base_url: Option<String>,

    /// Delay before each status check, in milliseconds
    #[arg(long, global = true, env = "FOLIO_POLL_INTERVAL_MS")]
    poll_interval_ms: Option<u64>,

    /// Status checks before giving up
    #[arg(long, global = true, env = "FOLIO_MAX_ATTEMPTS")]
    max_attempts: Option<u32>,

    /// Per-request HTTP timeout, in seconds
    #[arg(long, global = true, env = "FOLIO_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Directory that receives downloaded reports
    #[arg(short, long, global = true, env = "FOLIO_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Print machine-readable JSON lines instead of coloured text
    #[arg(long, global = true)]
    json: bool,

    /// Print a line for every status check
    #[arg(long, global = true)]
    progress: bool,

    /// Report through log lines only
    #[arg(short, long, global = true, conflicts_with = "json")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for --json output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,folio_report=info,folio_client=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let output = output_mode(&cli);
    let overrides = Overrides {
        base_url: cli.base_url,
        poll_interval_ms: cli.poll_interval_ms,
        max_attempts: cli.max_attempts,
        request_timeout_secs: cli.request_timeout_secs,
        output_dir: cli.output_dir,
    };
    let config = Config::load(overrides, output)?;

    handle_command(cli.command, &config).await
}

fn output_mode(cli: &Cli) -> OutputMode {
    if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Log
    } else {
        OutputMode::Text {
            show_progress: cli.progress,
        }
    }
}
