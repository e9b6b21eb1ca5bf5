//! Error types for report runs

use folio_client::ClientError;
use folio_core::domain::job::JobId;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::state::StateError;

/// Network call a transport failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Submit,
    Poll,
    Fetch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Submit => "submit",
            Stage::Poll => "status",
            Stage::Fetch => "download",
        };
        f.write_str(name)
    }
}

/// Broad class of a failed run, as shown to users and operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A request to the report service failed
    Transport,
    /// The server reported that the job failed
    JobFailed,
    /// We stopped waiting on a job that was still pending
    TimedOut,
    /// The finished report could not be saved
    Delivery,
    /// The run reached an inconsistent state
    Internal,
}

/// Local failure while saving an artifact
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no free file name available for {}", path.display())]
    NoUniqueName { path: PathBuf },
}

/// Errors that end a report run
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{stage} request failed: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: ClientError,
    },

    #[error("report job {job_id} failed: {detail}")]
    JobFailed { job_id: JobId, detail: String },

    #[error("report job {job_id} still pending after {attempts} status check(s)")]
    JobTimeout { job_id: JobId, attempts: u32 },

    #[error("failed to deliver report: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("report run state error: {0}")]
    State(#[from] StateError),
}

impl ReportError {
    pub fn transport(stage: Stage, source: ClientError) -> Self {
        Self::Transport { stage, source }
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ReportError::Transport { .. } => FailureKind::Transport,
            ReportError::JobFailed { .. } => FailureKind::JobFailed,
            ReportError::JobTimeout { .. } => FailureKind::TimedOut,
            ReportError::Delivery(_) => FailureKind::Delivery,
            ReportError::State(_) => FailureKind::Internal,
        }
    }
}
