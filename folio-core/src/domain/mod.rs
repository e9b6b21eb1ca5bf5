//! Core domain types
//!
//! These types describe one report export: what was asked for, the
//! server-side job producing it, and the artifact it yields. They are shared
//! between the HTTP client and the orchestration layer.

pub mod artifact;
pub mod job;
pub mod request;
