//! User-facing notifications
//!
//! The orchestrator reports what a run is doing through a [`NotificationSink`].
//! Hosts decide how to show them (toast, terminal line, JSON event); the
//! orchestrator never talks to a presentation layer directly.

use folio_core::domain::job::JobId;
use serde::Serialize;
use tracing::{error, info};

use crate::error::FailureKind;

/// Something worth telling the user about a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    /// The job was accepted by the server
    Started { job_id: JobId },
    /// A status check is about to be made; not a transient message
    Progress { attempt: u32, max_attempts: u32 },
    /// The report was saved
    Succeeded { file_name: String, location: String },
    /// The run failed
    Failed { kind: FailureKind, message: String },
}

impl Notification {
    /// Whether this notification ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Notification::Succeeded { .. } | Notification::Failed { .. }
        )
    }
}

/// Receiver of run notifications
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that only writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Started { job_id } => info!("Generating report (job {})", job_id),
            Notification::Progress { .. } => {}
            Notification::Succeeded {
                file_name,
                location,
            } => info!("Report {} saved to {}", file_name, location),
            Notification::Failed { kind, message } => {
                error!("Report failed ({:?}): {}", kind, message)
            }
        }
    }
}
