//! Per-run state
//!
//! One `RunState` is owned by each `ReportOrchestrator::run` invocation and
//! dropped when the run ends. Phases only move forward; the three terminal
//! phases are sinks.

use folio_core::domain::job::{Job, JobStatus};
use folio_core::domain::request::ReportRequest;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Idle,
    Submitting,
    Polling,
    Fetching,
    Delivering,
    Succeeded,
    Failed,
    Cancelled,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed | Phase::Cancelled)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Run-state invariant violation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("invalid phase transition {from} -> {to}")]
    InvalidTransition { from: Phase, to: Phase },

    #[error("a job is already attached to this run")]
    JobAlreadyAttached,
}

/// State of a single report run
#[derive(Debug)]
pub struct RunState {
    run_id: Uuid,
    request: ReportRequest,
    job: Option<Job>,
    attempts: u32,
    phase: Phase,
}

impl RunState {
    pub fn new(request: ReportRequest) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            request,
            job: None,
            attempts: 0,
            phase: Phase::Idle,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn request(&self) -> &ReportRequest {
        &self.request
    }

    pub fn job(&self) -> Option<&Job> {
        self.job.as_ref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Moves to `next`
    ///
    /// Terminal phases accept no transitions. Any non-terminal phase may end
    /// the run; otherwise the run only moves forward.
    pub fn advance(&mut self, next: Phase) -> Result<(), StateError> {
        let allowed = !self.phase.is_terminal() && (next.is_terminal() || next > self.phase);

        if !allowed {
            return Err(StateError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        self.phase = next;
        Ok(())
    }

    /// Attaches the submitted job; a run has exactly one
    pub fn attach_job(&mut self, job: Job) -> Result<(), StateError> {
        if self.job.is_some() {
            return Err(StateError::JobAlreadyAttached);
        }
        self.job = Some(job);
        Ok(())
    }

    /// Records the number of status checks made so far
    ///
    /// Only honoured while polling, and never lowers the count.
    pub fn record_attempts(&mut self, attempts: u32) {
        if self.phase == Phase::Polling && attempts > self.attempts {
            self.attempts = attempts;
        }
    }

    /// Mirrors a poll result onto the attached job
    pub fn update_job_status(&mut self, status: JobStatus, error_detail: Option<String>) {
        if let Some(job) = self.job.as_mut() {
            job.apply_status(status, error_detail);
        }
    }
}
