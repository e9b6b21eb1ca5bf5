//! Scheduler layer
//!
//! Drives a submitted job to a terminal state by polling the report service
//! under a bounded attempt budget.

pub mod poller;

pub use poller::{PollLoop, PollOutcome, PollPolicy, PollReport};
