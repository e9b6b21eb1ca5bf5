//! Report export configuration
//!
//! Defines the service location, the poll budget and where finished reports
//! are written.

use folio_client::{ClientError, ReportClient};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::scheduler::PollPolicy;

/// Default base URL, including the REST prefix the report routes are mounted under
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/ws/rest/v1";

/// Invalid configuration value
#[derive(Debug, Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(String);

/// Report export configuration
///
/// `poll_interval * max_attempts` is the longest a run will wait on a job.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Report service base URL (e.g., "http://localhost:8080/ws/rest/v1")
    pub base_url: String,

    /// Delay before each status check
    pub poll_interval: Duration,

    /// Status checks allowed before giving up on a pending job
    pub max_attempts: u32,

    /// Upper bound for a single HTTP request
    pub request_timeout: Duration,

    /// Directory finished reports are saved into
    pub output_dir: PathBuf,
}

impl ReportConfig {
    /// Creates a new configuration with defaults
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            poll_interval: Duration::from_secs(1),
            max_attempts: 60,
            request_timeout: Duration::from_secs(30),
            output_dir: PathBuf::from("."),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - FOLIO_BASE_URL (default: http://localhost:8080/ws/rest/v1)
    /// - FOLIO_POLL_INTERVAL_MS (default: 1000)
    /// - FOLIO_MAX_ATTEMPTS (default: 60)
    /// - FOLIO_REQUEST_TIMEOUT_SECS (default: 30)
    /// - FOLIO_OUTPUT_DIR (default: current directory)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("FOLIO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);

        if let Some(interval) = lookup("FOLIO_POLL_INTERVAL_MS").and_then(|s| s.parse::<u64>().ok())
        {
            config.poll_interval = Duration::from_millis(interval);
        }

        if let Some(attempts) = lookup("FOLIO_MAX_ATTEMPTS").and_then(|s| s.parse::<u32>().ok()) {
            config.max_attempts = attempts;
        }

        if let Some(timeout) =
            lookup("FOLIO_REQUEST_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(timeout);
        }

        if let Some(dir) = lookup("FOLIO_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        config
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError("base_url cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError(
                "base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(ConfigError(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(ConfigError("max_attempts must be greater than 0".to_string()));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// HTTP client for the configured service, bounded by `request_timeout`
    pub fn client(&self) -> Result<ReportClient, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;
        Ok(ReportClient::with_client(self.base_url.clone(), http))
    }

    /// The poll budget described by this configuration
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: self.poll_interval,
            max_attempts: self.max_attempts,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string())
    }
}
