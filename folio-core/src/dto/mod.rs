//! Data Transfer Objects for the report-job service
//!
//! Wire shapes for the submit and status endpoints. The submit body itself is
//! a bare JSON array and is produced by [`crate::domain::request::ReportRequest`].

pub mod job;
