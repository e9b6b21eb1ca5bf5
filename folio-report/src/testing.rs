//! In-memory fakes shared by this crate's tests

use async_trait::async_trait;
use folio_client::{ClientError, ReportJobs};
use folio_core::domain::artifact::{Artifact, DEFAULT_ARTIFACT_NAME};
use folio_core::domain::job::{Job, JobId, JobStatus};
use folio_core::domain::request::ReportRequest;
use folio_core::dto::job::JobStatusResponse;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::DeliveryError;
use crate::notify::{Notification, NotificationSink};
use crate::service::{ArtifactDelivery, DeliveryReceipt};

/// One scripted answer to `poll_status`
#[derive(Debug, Clone)]
pub(crate) enum StatusStep {
    Pending,
    /// HTTP error status, which the real client turns into `Pending`
    SoftFailure,
    Completed,
    Failed(Option<String>),
    TransportError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Submit(Vec<String>),
    Poll(String),
    Fetch(String),
}

/// A real `reqwest::Error`, produced without touching the network
pub(crate) fn transport_error() -> ClientError {
    let err = reqwest::Client::new()
        .get("http://")
        .build()
        .expect_err("empty host must not build");
    ClientError::RequestFailed(err)
}

/// Report service fake that answers from a script and records every call
pub(crate) struct ScriptedJobs {
    job_id: String,
    submit_error: Option<u16>,
    statuses: Mutex<VecDeque<StatusStep>>,
    default_status: StatusStep,
    artifact: Option<Artifact>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedJobs {
    pub(crate) fn new(statuses: Vec<StatusStep>) -> Self {
        Self {
            job_id: "j1".to_string(),
            submit_error: None,
            statuses: Mutex::new(statuses.into()),
            default_status: StatusStep::Pending,
            artifact: Some(Artifact::new(b"%PDF-1.7".to_vec(), DEFAULT_ARTIFACT_NAME)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer used once the script runs out
    pub(crate) fn with_default_status(mut self, status: StatusStep) -> Self {
        self.default_status = status;
        self
    }

    pub(crate) fn with_submit_error(mut self, status: u16) -> Self {
        self.submit_error = Some(status);
        self
    }

    pub(crate) fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifact = Some(artifact);
        self
    }

    /// Makes the download answer 404
    pub(crate) fn without_artifact(mut self) -> Self {
        self.artifact = None;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn poll_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Poll(_)))
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Fetch(_)))
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ReportJobs for ScriptedJobs {
    async fn submit(&self, request: &ReportRequest) -> Result<Job, ClientError> {
        self.record(Call::Submit(request.encounter_ids().to_vec()));

        match self.submit_error {
            Some(status) => Err(ClientError::api_error(status, "submit rejected")),
            None => Ok(Job::submitted(JobId::new(self.job_id.clone()))),
        }
    }

    async fn poll_status(&self, job_id: &JobId) -> Result<JobStatusResponse, ClientError> {
        self.record(Call::Poll(job_id.to_string()));

        let step = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_status.clone());

        match step {
            StatusStep::Pending | StatusStep::SoftFailure => Ok(JobStatusResponse::pending()),
            StatusStep::Completed => Ok(JobStatusResponse {
                status: JobStatus::Completed,
                error: None,
            }),
            StatusStep::Failed(detail) => Ok(JobStatusResponse {
                status: JobStatus::Failed,
                error: detail,
            }),
            StatusStep::TransportError => Err(transport_error()),
        }
    }

    async fn fetch_artifact(&self, job_id: &JobId) -> Result<Artifact, ClientError> {
        self.record(Call::Fetch(job_id.to_string()));

        self.artifact
            .clone()
            .ok_or_else(|| ClientError::api_error(404, "no artifact"))
    }
}

/// Sink that keeps every notification, optionally cancelling after N progress events
#[derive(Default)]
pub(crate) struct RecordingSink {
    seen: Mutex<Vec<Notification>>,
    cancel: CancellationToken,
    cancel_after_progress: Option<u32>,
}

impl RecordingSink {
    pub(crate) fn cancel_after_progress(mut self, attempts: u32) -> Self {
        self.cancel_after_progress = Some(attempts);
        self
    }

    pub(crate) fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub(crate) fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub(crate) fn started_count(&self) -> usize {
        self.all()
            .iter()
            .filter(|n| matches!(n, Notification::Started { .. }))
            .count()
    }

    pub(crate) fn progress_count(&self) -> usize {
        self.all()
            .iter()
            .filter(|n| matches!(n, Notification::Progress { .. }))
            .count()
    }

    pub(crate) fn terminal(&self) -> Vec<Notification> {
        self.all().into_iter().filter(|n| n.is_terminal()).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        if let (Notification::Progress { attempt, .. }, Some(limit)) =
            (&notification, self.cancel_after_progress)
            && *attempt >= limit
        {
            self.cancel.cancel();
        }
        self.seen.lock().unwrap().push(notification);
    }
}

/// Delivery that keeps artifacts in memory, or always fails
#[derive(Default)]
pub(crate) struct MemoryDelivery {
    delivered: Mutex<Vec<Artifact>>,
    fail: bool,
}

impl MemoryDelivery {
    pub(crate) fn failing() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(crate) fn delivered_names(&self) -> Vec<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.suggested_name.clone())
            .collect()
    }
}

#[async_trait]
impl ArtifactDelivery for MemoryDelivery {
    async fn deliver(&self, artifact: Artifact) -> Result<DeliveryReceipt, DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Io {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "save refused"),
            });
        }

        let receipt = DeliveryReceipt {
            location: format!("memory://{}", artifact.suggested_name),
            file_name: artifact.suggested_name.clone(),
            size: artifact.size(),
        };
        self.delivered.lock().unwrap().push(artifact);
        Ok(receipt)
    }
}
