//! Cloud service REST client.
//!
//! Implements the queued-job API: submit a circuit, poll status, fetch
//! results, cancel. All calls carry a bearer token and a bounded request
//! timeout.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use qdispatch_circuit::Circuit;

use crate::error::{CloudError, CloudResult};

/// Per-request HTTP timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloud service API client.
#[derive(Debug, Clone)]
pub struct CloudClient {
    /// HTTP client.
    client: Client,
    /// API base URL.
    base_url: String,
    /// Authentication token.
    token: String,
}

impl CloudClient {
    /// Create a new client.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> CloudResult<Self> {
        let base_url = base_url.into();
        let token = token.into();

        if token.is_empty() {
            return Err(CloudError::MissingToken);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(CloudError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Submit a circuit for execution.
    #[instrument(skip(self, request))]
    pub async fn submit_job(&self, request: &SubmitRequest) -> CloudResult<SubmitResponse> {
        let url = format!("{}/jobs", self.base_url);
        debug!("Submitting job to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the status of a job.
    #[instrument(skip(self))]
    pub async fn job_status(&self, job_id: &str) -> CloudResult<JobStatusResponse> {
        let url = format!("{}/jobs/{}/status", self.base_url, job_id);
        debug!("Getting job status from {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the result of a completed job.
    #[instrument(skip(self))]
    pub async fn job_result(&self, job_id: &str) -> CloudResult<JobResultResponse> {
        let url = format!("{}/jobs/{}", self.base_url, job_id);
        debug!("Getting job result from {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Cancel a job. Best-effort on the remote side.
    #[instrument(skip(self))]
    pub async fn cancel_job(&self, job_id: &str) -> CloudResult<()> {
        let url = format!("{}/jobs/{}/cancel", self.base_url, job_id);
        debug!("Cancelling job at {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(CloudError::ApiError { status, message })
        }
    }

    /// Get the service status. Used as the liveness probe.
    #[instrument(skip(self))]
    pub async fn service_status(&self) -> CloudResult<ServiceStatus> {
        let url = format!("{}/status", self.base_url);
        debug!("Getting service status from {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle an HTTP response, extracting JSON or returning an error.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> CloudResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.json().await?;
            Ok(body)
        } else {
            let message = response.text().await.unwrap_or_default();

            match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(CloudError::AuthFailed(message))
                }
                StatusCode::NOT_FOUND => Err(CloudError::JobNotFound(message)),
                _ => Err(CloudError::ApiError {
                    status: status.as_u16(),
                    message,
                }),
            }
        }
    }
}

/// Request to submit a job.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    /// The circuit to execute.
    pub circuit: Circuit,
    /// Number of shots.
    pub shots: u32,
    /// Optional job name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SubmitRequest {
    /// Create a new submit request.
    pub fn new(circuit: Circuit, shots: u32) -> Self {
        Self {
            circuit,
            shots,
            name: None,
        }
    }

    /// Set the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Response from job submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    /// Job identifier.
    pub id: String,
    /// Initial job status.
    pub status: String,
    /// Estimated queue position.
    #[serde(default)]
    pub queue_position: Option<u32>,
}

/// Job status response.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    /// Job identifier.
    pub id: String,
    /// Current status.
    pub status: String,
    /// Status message.
    #[serde(default)]
    pub message: Option<String>,
}

impl JobStatusResponse {
    /// Check if the job is still pending.
    pub fn is_pending(&self) -> bool {
        matches!(
            self.status.to_lowercase().as_str(),
            "pending" | "queued" | "running" | "executing"
        )
    }

    /// Check if the job completed successfully.
    pub fn is_completed(&self) -> bool {
        matches!(self.status.to_lowercase().as_str(), "completed" | "ready")
    }

    /// Check if the job failed.
    pub fn is_failed(&self) -> bool {
        matches!(
            self.status.to_lowercase().as_str(),
            "failed" | "error" | "aborted"
        )
    }

    /// Check if the job was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status.to_lowercase() == "cancelled"
    }

    /// Check if the job is running (as opposed to queued).
    pub fn is_running(&self) -> bool {
        matches!(self.status.to_lowercase().as_str(), "running" | "executing")
    }
}

/// Job result response.
///
/// Exactly one of `counts` and `probabilities` is present on success.
#[derive(Debug, Clone, Deserialize)]
pub struct JobResultResponse {
    /// Job identifier.
    pub id: String,
    /// Final status.
    pub status: String,
    /// Aggregated bitstring counts.
    #[serde(default)]
    pub counts: Option<HashMap<String, u64>>,
    /// Probability per computational-basis outcome.
    #[serde(default)]
    pub probabilities: Option<Vec<f64>>,
    /// Error message if the job failed.
    #[serde(default)]
    pub error: Option<String>,
    /// Shots the service executed.
    #[serde(default)]
    pub shots: Option<u32>,
    /// Execution time in milliseconds.
    #[serde(default)]
    pub execution_time_ms: Option<u64>,
}

/// Service status payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    /// Service status string.
    pub status: String,
    /// Maximum accepted circuit width, if advertised.
    #[serde(default)]
    pub max_qubits: Option<u32>,
}

impl ServiceStatus {
    /// Check if the service is accepting jobs.
    pub fn is_online(&self) -> bool {
        matches!(
            self.status.to_lowercase().as_str(),
            "online" | "available" | "ok" | "ready"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_serializes() {
        let request = SubmitRequest::new(Circuit::bell(1000), 1000).with_name("bell-test");

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"shots\":1000"));
        assert!(json.contains("bell-test"));
    }

    #[test]
    fn test_status_predicates() {
        let status = JobStatusResponse {
            id: "job-1".into(),
            status: "Running".into(),
            message: None,
        };
        assert!(status.is_pending());
        assert!(status.is_running());
        assert!(!status.is_completed());

        let status = JobStatusResponse {
            id: "job-1".into(),
            status: "FAILED".into(),
            message: Some("boom".into()),
        };
        assert!(status.is_failed());
        assert!(!status.is_pending());
    }

    #[test]
    fn test_result_response_counts_shape() {
        let json = r#"{
            "id": "job-9",
            "status": "completed",
            "counts": {"00": 480, "11": 520},
            "shots": 1000
        }"#;
        let result: JobResultResponse = serde_json::from_str(json).unwrap();
        assert_eq!(result.counts.unwrap().get("11"), Some(&520));
        assert!(result.probabilities.is_none());
    }

    #[test]
    fn test_result_response_probability_shape() {
        let json = r#"{
            "id": "job-9",
            "status": "completed",
            "probabilities": [0.5, 0.0, 0.0, 0.5]
        }"#;
        let result: JobResultResponse = serde_json::from_str(json).unwrap();
        assert_eq!(result.probabilities.unwrap().len(), 4);
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            CloudClient::new("https://api.example.com", ""),
            Err(CloudError::MissingToken)
        ));
    }
}
