//! Report-job API endpoints

use async_trait::async_trait;
use folio_core::domain::artifact::{Artifact, filename_from_content_disposition};
use folio_core::domain::job::{Job, JobId};
use folio_core::domain::request::ReportRequest;
use folio_core::dto::job::{JobStatusResponse, SubmitJobResponse};
use reqwest::header::CONTENT_DISPOSITION;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::{ReportClient, ReportJobs};

#[async_trait]
impl ReportJobs for ReportClient {
    /// Submit encounters for report generation
    ///
    /// # Arguments
    /// * `request` - The encounters to render, in report order
    ///
    /// # Returns
    /// The newly created job, still pending on the server
    async fn submit(&self, request: &ReportRequest) -> Result<Job> {
        let url = format!("{}/report-jobs", self.base_url);
        let response = self.client.post(&url).json(request).send().await?;

        let created: SubmitJobResponse = self.handle_response(response).await?;

        if created.id.as_str().trim().is_empty() {
            return Err(ClientError::ParseError(
                "Server returned an empty job id".to_string(),
            ));
        }

        debug!(
            "Submitted {} encounter(s) as job {}",
            request.len(),
            created.id
        );

        Ok(Job::submitted(created.id))
    }

    /// Poll the status of a job
    ///
    /// # Arguments
    /// * `job_id` - The job to check
    ///
    /// # Returns
    /// The reported status; HTTP error statuses are answered with `Pending`
    async fn poll_status(&self, job_id: &JobId) -> Result<JobStatusResponse> {
        let url = format!("{}/report-jobs/status/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "Status check for job {} returned HTTP {}, treating as pending",
                job_id,
                status.as_u16()
            );
            return Ok(JobStatusResponse::pending());
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse job status: {}", e)))
    }

    /// Download the finished report
    ///
    /// # Arguments
    /// * `job_id` - A job that has reported `COMPLETED`
    ///
    /// # Returns
    /// The report bytes and the file name suggested by `Content-Disposition`
    async fn fetch_artifact(&self, job_id: &JobId) -> Result<Artifact> {
        let url = format!("{}/report-jobs/download/{}", self.base_url, job_id);
        let response = self.client.get(&url).send().await?;
        let response = self.ensure_success(response).await?;

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let file_name = filename_from_content_disposition(disposition.as_deref());

        let bytes = response.bytes().await?;

        debug!(
            "Downloaded {} byte(s) for job {} as {}",
            bytes.len(),
            job_id,
            file_name
        );

        Ok(Artifact::new(bytes.to_vec(), file_name))
    }
}
