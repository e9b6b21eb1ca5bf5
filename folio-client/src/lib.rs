//! Folio HTTP Client
//!
//! A small, type-safe HTTP client for the report-job service that renders
//! encounter reports in the background.
//!
//! The service exposes three operations, wrapped one-to-one here:
//! - submit a report request and receive a job id
//! - poll a job's status
//! - download the finished artifact
//!
//! No retries happen at this layer; the poll loop and orchestrator in
//! `folio-report` decide what to do with each failure.
//!
//! # Example
//!
//! ```no_run
//! use folio_client::{ReportClient, ReportJobs};
//! use folio_core::domain::request::ReportRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ReportClient::new("http://localhost:8080/ws/rest/v1");
//!     let request = ReportRequest::new(["enc-1", "enc-2"]).expect("non-empty");
//!
//!     let job = client.submit(&request).await?;
//!     println!("Submitted job: {}", job.id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};

use async_trait::async_trait;
use folio_core::domain::artifact::Artifact;
use folio_core::domain::job::{Job, JobId};
use folio_core::domain::request::ReportRequest;
use folio_core::dto::job::JobStatusResponse;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// The remote operations of the report-job service
///
/// Implemented by [`ReportClient`] over HTTP; tests substitute scripted fakes.
#[async_trait]
pub trait ReportJobs: Send + Sync {
    /// Submit a report request, returning the newly created pending job
    async fn submit(&self, request: &ReportRequest) -> Result<Job>;

    /// Poll a job's status
    ///
    /// HTTP error statuses are soft failures and come back as `Pending`.
    /// Only transport and parse failures are returned as errors.
    async fn poll_status(&self, job_id: &JobId) -> Result<JobStatusResponse>;

    /// Download the artifact of a completed job
    async fn fetch_artifact(&self, job_id: &JobId) -> Result<Artifact>;
}

/// HTTP client for the report-job service
#[derive(Debug, Clone)]
pub struct ReportClient {
    /// Base URL including any REST prefix (e.g., "http://localhost:8080/ws/rest/v1")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ReportClient {
    /// Create a new report client
    ///
    /// # Example
    /// ```
    /// use folio_client::ReportClient;
    ///
    /// let client = ReportClient::new("http://localhost:8080/ws/rest/v1");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new report client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use folio_client::ReportClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ReportClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Fail with the raw status and body unless the response is a success
    async fn ensure_success(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response)
    }

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = self.ensure_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
