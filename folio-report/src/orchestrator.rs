//! Report orchestrator
//!
//! Public entry point for exporting encounters as a report. A run submits the
//! job, waits for it under the poll budget, downloads the artifact and hands
//! it to the delivery service. Every failure is turned into exactly one
//! `Failed` notification here and returned to the caller; nothing below this
//! layer talks to the user.

use folio_client::{ClientError, ReportJobs};
use folio_core::domain::job::{JobId, JobStatus};
use folio_core::domain::request::ReportRequest;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::ReportConfig;
use crate::error::{ReportError, Stage};
use crate::notify::{Notification, NotificationSink};
use crate::scheduler::{PollLoop, PollOutcome, PollPolicy};
use crate::service::{ArtifactDelivery, DeliveryReceipt};
use crate::state::{Phase, RunState};

/// Detail used when the server marks a job failed without saying why
pub const DEFAULT_FAILURE_DETAIL: &str = "Server failed to generate the report.";

/// Message shown when the poll budget runs out
pub const TIMEOUT_MESSAGE: &str =
    "Report generation timed out. Please try again or select fewer encounters.";

/// How a run ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No usable encounter ids were given; nothing was sent
    Skipped,
    /// The caller cancelled the run
    Cancelled,
    /// The report was generated and delivered
    Delivered(DeliveryReceipt),
}

/// Composes the report client, poll loop and delivery into one cancellable run
pub struct ReportOrchestrator {
    api: Arc<dyn ReportJobs>,
    delivery: Arc<dyn ArtifactDelivery>,
    poller: PollLoop,
}

impl ReportOrchestrator {
    pub fn new(
        api: Arc<dyn ReportJobs>,
        delivery: Arc<dyn ArtifactDelivery>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            api,
            delivery,
            poller: PollLoop::new(policy),
        }
    }

    /// Builds an orchestrator backed by an HTTP `ReportClient`
    pub fn from_config(
        config: &ReportConfig,
        delivery: Arc<dyn ArtifactDelivery>,
    ) -> Result<Self, ClientError> {
        let client = config.client()?;
        Ok(Self::new(Arc::new(client), delivery, config.poll_policy()))
    }

    pub fn policy(&self) -> PollPolicy {
        self.poller.policy()
    }

    /// Runs one report export
    ///
    /// # Arguments
    /// * `ids` - Encounter ids, in report order; blanks and repeats are ignored
    /// * `sink` - Receives the start, progress and terminal notifications
    /// * `cancel` - Stops the run at its next checkpoint when cancelled
    ///
    /// # Returns
    /// `Skipped` for an empty selection and `Cancelled` when the caller cancelled;
    /// neither emits a terminal notification. Every error has already been
    /// reported to `sink` as a single `Failed` notification.
    pub async fn run<I, S>(
        &self,
        ids: I,
        sink: &dyn NotificationSink,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, ReportError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(request) = ReportRequest::new(ids) else {
            debug!("No encounters selected, skipping report run");
            return Ok(RunOutcome::Skipped);
        };

        let mut state = RunState::new(request);
        info!(
            "Report run {} started for {} encounter(s)",
            state.run_id(),
            state.request().len()
        );

        let result = self.drive(&mut state, sink, cancel).await;

        match &result {
            Ok(RunOutcome::Delivered(receipt)) => {
                info!(
                    "Report run {} delivered {} after {} status check(s)",
                    state.run_id(),
                    receipt.file_name,
                    state.attempts()
                );
                sink.notify(Notification::Succeeded {
                    file_name: receipt.file_name.clone(),
                    location: receipt.location.clone(),
                });
            }
            Ok(outcome) => {
                info!("Report run {} ended: {:?}", state.run_id(), outcome);
            }
            Err(err) => {
                error!(
                    "Report run {} failed in phase {}: {}",
                    state.run_id(),
                    state.phase(),
                    err
                );
                if let Err(e) = state.advance(Phase::Failed) {
                    debug!("Run {} already terminal: {}", state.run_id(), e);
                }
                sink.notify(Notification::Failed {
                    kind: err.failure_kind(),
                    message: user_message(err),
                });
            }
        }

        result
    }

    /// Executes the run's steps strictly in sequence
    async fn drive(
        &self,
        state: &mut RunState,
        sink: &dyn NotificationSink,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, ReportError> {
        if cancel.is_cancelled() {
            return cancelled(state);
        }

        state.advance(Phase::Submitting)?;
        let job = self
            .api
            .submit(state.request())
            .await
            .map_err(|e| ReportError::transport(Stage::Submit, e))?;
        let job_id = job.id.clone();
        state.attach_job(job)?;
        info!("Report run {} submitted as job {}", state.run_id(), job_id);

        if cancel.is_cancelled() {
            return cancelled(state);
        }

        sink.notify(Notification::Started {
            job_id: job_id.clone(),
        });

        state.advance(Phase::Polling)?;
        let max_attempts = self.poller.policy().max_attempts;
        let report = self
            .poller
            .poll(self.api.as_ref(), &job_id, cancel, |attempt| {
                state.record_attempts(attempt);
                sink.notify(Notification::Progress {
                    attempt,
                    max_attempts,
                });
            })
            .await
            .map_err(|e| ReportError::transport(Stage::Poll, e))?;

        match report.outcome {
            PollOutcome::Completed => state.update_job_status(JobStatus::Completed, None),
            PollOutcome::Failed { detail } => {
                state.update_job_status(JobStatus::Failed, detail.clone());
                return Err(ReportError::JobFailed {
                    job_id,
                    detail: detail
                        .filter(|d| !d.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_FAILURE_DETAIL.to_string()),
                });
            }
            PollOutcome::TimedOut => {
                return Err(ReportError::JobTimeout {
                    job_id,
                    attempts: report.attempts,
                });
            }
            PollOutcome::Cancelled => return cancelled(state),
        }

        self.fetch_and_deliver(state, &job_id, cancel).await
    }

    async fn fetch_and_deliver(
        &self,
        state: &mut RunState,
        job_id: &JobId,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, ReportError> {
        if cancel.is_cancelled() {
            return cancelled(state);
        }

        state.advance(Phase::Fetching)?;
        let artifact = self
            .api
            .fetch_artifact(job_id)
            .await
            .map_err(|e| ReportError::transport(Stage::Fetch, e))?;

        if cancel.is_cancelled() {
            return cancelled(state);
        }

        state.advance(Phase::Delivering)?;
        let receipt = self.delivery.deliver(artifact).await?;

        state.advance(Phase::Succeeded)?;
        Ok(RunOutcome::Delivered(receipt))
    }
}

fn cancelled(state: &mut RunState) -> Result<RunOutcome, ReportError> {
    state.advance(Phase::Cancelled)?;
    Ok(RunOutcome::Cancelled)
}

/// Message for the single `Failed` notification of a run
fn user_message(err: &ReportError) -> String {
    match err {
        ReportError::Transport { stage, .. } => match stage {
            Stage::Submit => "Failed to initiate PDF generation.".to_string(),
            Stage::Poll => "Lost contact with the report service while waiting for the PDF."
                .to_string(),
            Stage::Fetch => "Failed to download the generated PDF.".to_string(),
        },
        ReportError::JobFailed { detail, .. } => detail.clone(),
        ReportError::JobTimeout { .. } => TIMEOUT_MESSAGE.to_string(),
        ReportError::Delivery(e) => format!("Failed to save the generated PDF: {}", e),
        ReportError::State(_) => "Failed to generate PDF. Please check server logs.".to_string(),
    }
}
