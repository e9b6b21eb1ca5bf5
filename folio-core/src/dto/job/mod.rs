//! Job DTOs exchanged with the report-job service

use serde::{Deserialize, Serialize};

use crate::domain::job::{JobId, JobStatus};

/// Response to a job submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    /// Server-assigned job id (older deployments call this field `uuid`)
    #[serde(alias = "uuid")]
    pub id: JobId,
}

/// Response to a status poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub status: JobStatus,

    /// Server-provided failure detail, only meaningful for `FAILED`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobStatusResponse {
    /// Status used when a poll request could not be answered
    pub fn pending() -> Self {
        Self {
            status: JobStatus::Pending,
            error: None,
        }
    }
}
