//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned to a report job by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Report job status as reported by the server
///
/// Any status string the client does not know is read as `Pending`: the job
/// has not reached a terminal state we understand, so it is still worth waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Completed,
    Failed,
    #[serde(other)]
    Pending,
}

impl JobStatus {
    /// Whether polling can stop at this status
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Report generation job
///
/// Created by a successful submit and updated only from poll results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub error_detail: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl Job {
    /// A freshly submitted job, pending on the server
    pub fn submitted(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            error_detail: None,
            submitted_at: chrono::Utc::now(),
        }
    }

    /// Records the outcome of a status poll
    pub fn apply_status(&mut self, status: JobStatus, error_detail: Option<String>) {
        self.status = status;
        self.error_detail = match status {
            JobStatus::Failed => error_detail,
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let status: JobStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(status, JobStatus::Completed);
        let status: JobStatus = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(status, JobStatus::Failed);
        let status: JobStatus = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(status, JobStatus::Pending);
        assert_eq!(
            serde_json::to_string(&JobStatus::Pending).unwrap(),
            "\"PENDING\""
        );
    }

    #[test]
    fn test_unknown_status_reads_as_pending() {
        let status: JobStatus = serde_json::from_str("\"RUNNING\"").unwrap();
        assert_eq!(status, JobStatus::Pending);
        assert!(!status.is_terminal());
    }

    #[test]
    fn test_apply_status_keeps_detail_only_on_failure() {
        let mut job = Job::submitted(JobId::from("j1"));
        assert_eq!(job.status, JobStatus::Pending);

        job.apply_status(JobStatus::Pending, Some("ignored".to_string()));
        assert!(job.error_detail.is_none());

        job.apply_status(JobStatus::Failed, Some("template missing".to_string()));
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_detail.as_deref(), Some("template missing"));
    }

    #[test]
    fn test_job_id_is_transparent_on_the_wire() {
        let id = JobId::from("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
        assert_eq!(id.to_string(), "abc-123");
    }
}
