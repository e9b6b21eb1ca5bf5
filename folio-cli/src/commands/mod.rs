//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod export;
mod job;

use anyhow::Result;
use clap::Subcommand;
use std::process::ExitCode;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a PDF report for the given encounters and save it
    Export {
        /// Encounter ids, in report order
        #[arg(required = true)]
        encounter_ids: Vec<String>,

        /// Replace an existing file instead of saving as "name (n).pdf"
        #[arg(long)]
        overwrite: bool,
    },
    /// Show the status of a report job
    Status {
        /// Job id returned when the report was submitted
        job_id: String,
    },
    /// Download the report of an already completed job
    Download {
        /// Job id returned when the report was submitted
        job_id: String,

        /// Replace an existing file instead of saving as "name (n).pdf"
        #[arg(long)]
        overwrite: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// The process exit code
pub async fn handle_command(command: Commands, config: &Config) -> Result<ExitCode> {
    match command {
        Commands::Export {
            encounter_ids,
            overwrite,
        } => export::handle_export(encounter_ids, overwrite, config).await,
        Commands::Status { job_id } => job::show_status(&job_id, config).await,
        Commands::Download { job_id, overwrite } => {
            job::download(&job_id, overwrite, config).await
        }
    }
}
