//! Job command handlers
//!
//! Inspect a single report job or fetch its finished artifact without
//! re-submitting the report.

use anyhow::{Context, Result};
use colored::*;
use folio_client::ReportJobs;
use folio_core::domain::job::{JobId, JobStatus};
use folio_report::{ArtifactDelivery, CollisionPolicy, FileDelivery};
use std::process::ExitCode;
use tracing::info;

use crate::config::Config;

/// Show the current status of a job
pub async fn show_status(job_id: &str, config: &Config) -> Result<ExitCode> {
    let client = config.report.client().context("Failed to create report client")?;
    let job_id = JobId::from(job_id);

    let response = client
        .poll_status(&job_id)
        .await
        .with_context(|| format!("Failed to fetch status of job {}", job_id))?;

    if config.is_json() {
        println!("{}", serde_json::to_string(&response)?);
    } else if config.is_text() {
        println!("{}", format!("Job {}", job_id).bold());
        println!("  Status: {}", colorize_status(response.status));
        if let Some(error) = &response.error {
            println!("  Error:  {}", error.red());
        }
    } else {
        info!("Job {} is {:?}", job_id, response.status);
    }

    Ok(match response.status {
        JobStatus::Failed => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

/// Download the artifact of a completed job into the output directory
pub async fn download(job_id: &str, overwrite: bool, config: &Config) -> Result<ExitCode> {
    let client = config.report.client().context("Failed to create report client")?;
    let job_id = JobId::from(job_id);

    let artifact = client
        .fetch_artifact(&job_id)
        .await
        .with_context(|| format!("Failed to download the report of job {}", job_id))?;

    let delivery = FileDelivery::new(config.report.output_dir.clone()).with_collision_policy(
        if overwrite {
            CollisionPolicy::Overwrite
        } else {
            CollisionPolicy::Rename
        },
    );
    let receipt = delivery
        .deliver(artifact)
        .await
        .context("Failed to save the report")?;

    if config.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "file_name": receipt.file_name,
                "location": receipt.location,
                "size": receipt.size,
            })
        );
    } else if config.is_text() {
        println!("{} {}", "✓".green(), "PDF has been downloaded successfully".bold());
        println!("  File: {}", receipt.file_name.cyan());
        println!("  Saved to: {}", receipt.location.dimmed());
        println!("  Size: {} bytes", receipt.size);
    }

    Ok(ExitCode::SUCCESS)
}

fn colorize_status(status: JobStatus) -> ColoredString {
    match status {
        JobStatus::Pending => "PENDING".yellow(),
        JobStatus::Completed => "COMPLETED".green(),
        JobStatus::Failed => "FAILED".red(),
    }
}
