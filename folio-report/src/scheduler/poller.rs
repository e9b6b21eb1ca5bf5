//! Job status poller
//!
//! Waits for a report job to finish. Each attempt sleeps for the poll interval,
//! then asks the service for the job's status. The loop stops on a terminal
//! status, on cancellation, or once the attempt budget is spent.

use folio_client::{ClientError, ReportJobs};
use folio_core::domain::job::{JobId, JobStatus};
use std::time::Duration;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Poll cadence and attempt budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before each status check
    pub interval: Duration,
    /// Maximum number of status checks
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Worst-case time spent waiting between checks
    ///
    /// Saturates at `Duration::MAX` for budgets too large to represent.
    pub fn budget(&self) -> Duration {
        self.interval
            .checked_mul(self.max_attempts)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 60,
        }
    }
}

/// How a poll loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The server finished the job; the artifact can be fetched
    Completed,
    /// The server reported the job as failed
    Failed { detail: Option<String> },
    /// The attempt budget ran out while the job was still pending
    TimedOut,
    /// The caller cancelled before a terminal status arrived
    Cancelled,
}

/// Outcome plus the number of attempts started
///
/// An attempt counts once `on_attempt` has been called for it, even if
/// cancellation then abandoned its status request before it was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub outcome: PollOutcome,
    pub attempts: u32,
}

/// Bounded-attempt polling state machine
#[derive(Debug, Clone, Default)]
pub struct PollLoop {
    policy: PollPolicy,
}

impl PollLoop {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Polls `job_id` until it reaches a terminal state
    ///
    /// `on_attempt` is called with the 1-based attempt number just before each
    /// status request. Soft failures (HTTP error statuses) arrive as `Pending`
    /// and consume an attempt. Transport and parse errors end the loop and are
    /// returned to the caller.
    pub async fn poll<F>(
        &self,
        api: &dyn ReportJobs,
        job_id: &JobId,
        cancel: &CancellationToken,
        mut on_attempt: F,
    ) -> Result<PollReport, ClientError>
    where
        F: FnMut(u32) + Send,
    {
        let mut attempts: u32 = 0;

        let outcome = loop {
            if attempts >= self.policy.max_attempts {
                warn!(
                    "Job {} still pending after {} status check(s), giving up",
                    job_id, attempts
                );
                break PollOutcome::TimedOut;
            }

            if cancel.is_cancelled() {
                break PollOutcome::Cancelled;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break PollOutcome::Cancelled,
                _ = time::sleep(self.policy.interval) => {}
            }

            if cancel.is_cancelled() {
                break PollOutcome::Cancelled;
            }

            attempts += 1;
            on_attempt(attempts);
            debug!(
                "Checking status of job {} (attempt {}/{})",
                job_id, attempts, self.policy.max_attempts
            );

            // Dropping the request future on cancel abandons it; server-side work is not undone.
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => break PollOutcome::Cancelled,
                response = api.poll_status(job_id) => response?,
            };

            match response.status {
                JobStatus::Completed => break PollOutcome::Completed,
                JobStatus::Failed => {
                    break PollOutcome::Failed {
                        detail: response.error,
                    };
                }
                JobStatus::Pending => continue,
            }
        };

        match &outcome {
            PollOutcome::Cancelled => info!(
                "Stopped polling job {} after {} attempt(s): cancelled",
                job_id, attempts
            ),
            other => debug!(
                "Polling job {} finished after {} attempt(s): {:?}",
                job_id, attempts, other
            ),
        }

        Ok(PollReport { outcome, attempts })
    }
}
