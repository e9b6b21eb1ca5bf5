//! Configuration module
//!
//! Layers command-line flags over the environment-derived report configuration.

use anyhow::{Context, Result};
use folio_report::ReportConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Flag values that override the environment when given
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub max_attempts: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
}

/// How command results and run notifications are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Coloured text, optionally with a line per status check
    Text { show_progress: bool },
    /// One JSON object per line on stdout
    Json,
    /// Nothing on stdout; notifications only reach the log
    Log,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Report settings shared with the library
    pub report: ReportConfig,

    pub output: OutputMode,
}

impl Config {
    /// Loads `FOLIO_*` environment variables, applies flag overrides, and validates
    pub fn load(overrides: Overrides, output: OutputMode) -> Result<Self> {
        let report = apply(ReportConfig::from_env(), overrides);
        report.validate().context("Invalid report configuration")?;

        Ok(Self { report, output })
    }

    pub fn is_json(&self) -> bool {
        self.output == OutputMode::Json
    }

    /// Whether human-readable lines should be printed
    pub fn is_text(&self) -> bool {
        matches!(self.output, OutputMode::Text { .. })
    }
}

fn apply(mut report: ReportConfig, overrides: Overrides) -> ReportConfig {
    if let Some(base_url) = overrides.base_url {
        report.base_url = base_url;
    }
    if let Some(ms) = overrides.poll_interval_ms {
        report.poll_interval = Duration::from_millis(ms);
    }
    if let Some(attempts) = overrides.max_attempts {
        report.max_attempts = attempts;
    }
    if let Some(secs) = overrides.request_timeout_secs {
        report.request_timeout = Duration::from_secs(secs);
    }
    if let Some(dir) = overrides.output_dir {
        report.output_dir = dir;
    }
    report
}
