//! Export command handler
//!
//! Runs one report export end to end. Ctrl-C cancels the run at its next
//! checkpoint.

use anyhow::{Context, Result};
use colored::*;
use folio_report::{
    CancellationToken, CollisionPolicy, FileDelivery, LogSink, NotificationSink,
    ReportOrchestrator, RunOutcome,
};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{Config, OutputMode};
use crate::notifier::{JsonNotifier, TerminalNotifier};

/// Exit code conventionally used after SIGINT
const EXIT_INTERRUPTED: u8 = 130;

/// Handle `folio export`
pub async fn handle_export(
    encounter_ids: Vec<String>,
    overwrite: bool,
    config: &Config,
) -> Result<ExitCode> {
    let delivery = FileDelivery::new(&config.report.output_dir).with_collision_policy(
        if overwrite {
            CollisionPolicy::Overwrite
        } else {
            CollisionPolicy::Rename
        },
    );

    let orchestrator = ReportOrchestrator::from_config(&config.report, Arc::new(delivery))
        .context("Failed to create report client")?;

    info!(
        "Exporting {} encounter(s) via {} (budget {:?})",
        encounter_ids.len(),
        config.report.base_url,
        orchestrator.policy().budget()
    );

    let cancel = CancellationToken::new();
    let ctrl_c = spawn_ctrl_c_handler(cancel.clone());

    let sink: Box<dyn NotificationSink> = match config.output {
        OutputMode::Text { show_progress } => Box::new(TerminalNotifier::new(show_progress)),
        OutputMode::Json => Box::new(JsonNotifier),
        OutputMode::Log => Box::new(LogSink),
    };

    let started = chrono::Utc::now();
    let result = orchestrator
        .run(&encounter_ids, sink.as_ref(), &cancel)
        .await;
    ctrl_c.abort();

    let elapsed = chrono::Utc::now().signed_duration_since(started);
    debug!("Export finished in {}ms", elapsed.num_milliseconds());

    // Failures were already shown by the notifier.
    match result {
        Ok(RunOutcome::Delivered(_)) => Ok(ExitCode::SUCCESS),
        Ok(RunOutcome::Skipped) => {
            if config.is_text() {
                println!("{}", "No encounters selected.".yellow());
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(RunOutcome::Cancelled) => {
            if config.is_text() {
                println!("{}", "Report export cancelled.".yellow());
            }
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

fn spawn_ctrl_c_handler(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling report export");
            cancel.cancel();
        }
    })
}
