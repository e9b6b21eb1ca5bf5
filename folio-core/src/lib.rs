//! Folio Core
//!
//! Core types shared by the Folio report-export client.
//!
//! This crate contains:
//! - Domain types: report requests, jobs and artifacts
//! - DTOs: wire shapes exchanged with the report-job service

pub mod domain;
pub mod dto;
