//! Folio Report
//!
//! Asynchronous report generation for selected encounters.
//!
//! Architecture:
//! - Configuration: service location, poll budget, output directory
//! - Scheduler: bounded, cancellable status polling of a submitted job
//! - Services: delivery of the finished artifact to the user's environment
//! - Orchestrator: the public `run` that composes the pieces and reports
//!   progress through a notification sink
//!
//! A run submits the encounter ids, polls until the job is terminal or the
//! attempt budget (`interval * max_attempts`) is spent, downloads the PDF and
//! delivers it. Cancellation is cooperative via a `CancellationToken`.

pub mod config;
pub mod error;
pub mod notify;
pub mod orchestrator;
pub mod scheduler;
pub mod service;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, ReportConfig};
pub use error::{DeliveryError, FailureKind, ReportError, Stage};
pub use notify::{LogSink, Notification, NotificationSink};
pub use orchestrator::{ReportOrchestrator, RunOutcome};
pub use scheduler::{PollLoop, PollOutcome, PollPolicy, PollReport};
pub use service::{ArtifactDelivery, CollisionPolicy, DeliveryReceipt, FileDelivery};
pub use state::{Phase, RunState, StateError};

// Cancellation tokens are part of the public `run` signature.
pub use tokio_util::sync::CancellationToken;
