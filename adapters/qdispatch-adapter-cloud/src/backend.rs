//! Cloud backend implementation.

use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use qdispatch_circuit::Circuit;
use qdispatch_hal::{
    Backend, BackendAvailability, BackendKind, Capabilities, Counts, ExecutionResult, HalError,
    HalResult, Job, JobId, JobStatus,
};

use crate::api::{CloudClient, SubmitRequest};
use crate::error::{CloudError, CloudResult};

/// Default advertised circuit width when the service does not say.
const DEFAULT_MAX_QUBITS: u32 = 100;

/// Default maximum shots per job.
const DEFAULT_MAX_SHOTS: u32 = 8192;

/// Maximum number of cached jobs before evicting terminal entries.
const MAX_CACHED_JOBS: usize = 10_000;

/// Connection settings for the cloud service.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// API endpoint URL.
    pub endpoint: String,
    /// API token.
    pub token: String,
    /// Maximum circuit width the service accepts.
    pub max_qubits: u32,
    /// Maximum shots per job.
    pub max_shots: u32,
}

impl CloudConfig {
    /// Create a config with default capability limits.
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            max_qubits: DEFAULT_MAX_QUBITS,
            max_shots: DEFAULT_MAX_SHOTS,
        }
    }
}

/// Job cache entry.
struct CachedJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Remote queued cloud service backend.
pub struct CloudBackend {
    name: String,
    client: CloudClient,
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<String, CachedJob>>>,
}

impl CloudBackend {
    /// Create a backend from connection settings.
    pub fn new(config: &CloudConfig) -> CloudResult<Self> {
        let client = CloudClient::new(&config.endpoint, &config.token)?;
        Ok(Self {
            name: "cloud".to_string(),
            client,
            capabilities: Capabilities::cloud(config.max_qubits, config.max_shots),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        })
    }

    fn map_error(job_id: &JobId, e: CloudError) -> HalError {
        match e {
            CloudError::JobNotFound(_) => HalError::JobNotFound(job_id.0.clone()),
            CloudError::AuthFailed(msg) => HalError::AuthenticationFailed(msg),
            other => HalError::Backend(other.to_string()),
        }
    }
}

#[async_trait]
impl Backend for CloudBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self))]
    async fn availability(&self) -> HalResult<BackendAvailability> {
        match self.client.service_status().await {
            Ok(status) if status.is_online() => Ok(BackendAvailability::always_available()),
            Ok(status) => Ok(BackendAvailability::unavailable(format!(
                "service reports status '{}'",
                status.status
            ))),
            Err(e) => {
                debug!("Cloud availability check failed: {}", e);
                Ok(BackendAvailability::unavailable(e.to_string()))
            }
        }
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if !self.capabilities.accepts_qubits(circuit.num_qubits()) {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but the service only supports {}",
                circuit.num_qubits(),
                self.capabilities.max_qubits
            )));
        }
        if shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "Requested {} shots but maximum is {}",
                shots, self.capabilities.max_shots
            )));
        }

        info!(
            "Submitting circuit to cloud service: {} qubits, {} shots",
            circuit.num_qubits(),
            shots
        );

        let request = SubmitRequest::new(circuit.clone(), shots);
        let response = self
            .client
            .submit_job(&request)
            .await
            .map_err(|e| HalError::SubmissionFailed(e.to_string()))?;

        let job_id = JobId::new(&response.id);
        info!("Job submitted: {}", job_id);

        // Cache job info, evicting terminal entries when the cache is full.
        let job = Job::new(job_id.clone(), shots);
        {
            let mut jobs = self.jobs.lock().await;
            if jobs.len() >= MAX_CACHED_JOBS {
                jobs.retain(|_, j| !j.job.status.is_terminal());
            }
            jobs.insert(job_id.0.clone(), CachedJob { job, result: None });
        }

        Ok(job_id)
    }

    #[instrument(skip(self))]
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let response = self
            .client
            .job_status(&job_id.0)
            .await
            .map_err(|e| Self::map_error(job_id, e))?;

        let status = if response.is_completed() {
            JobStatus::Completed
        } else if response.is_failed() {
            JobStatus::Failed(response.message.unwrap_or_default())
        } else if response.is_cancelled() {
            JobStatus::Cancelled
        } else if response.is_running() {
            JobStatus::Running
        } else {
            JobStatus::Queued
        };

        {
            let mut jobs = self.jobs.lock().await;
            if let Some(cached) = jobs.get_mut(&job_id.0) {
                cached.job = cached.job.clone().with_status(status.clone());
            }
        }

        Ok(status)
    }

    #[instrument(skip(self))]
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        {
            let jobs = self.jobs.lock().await;
            if let Some(cached) = jobs.get(&job_id.0) {
                if let Some(ref result) = cached.result {
                    return Ok(result.clone());
                }
            }
        }

        let response = self
            .client
            .job_result(&job_id.0)
            .await
            .map_err(|e| Self::map_error(job_id, e))?;

        if let Some(error) = response.error {
            return Err(HalError::JobFailed(error));
        }

        let shots = response.shots.unwrap_or(0);

        let mut result = if let Some(api_counts) = response.counts {
            let counts: Counts = api_counts.into_iter().collect();
            let shots = if shots > 0 { shots } else { counts.total() as u32 };
            ExecutionResult::from_counts(counts, shots)
        } else if let Some(probabilities) = response.probabilities {
            ExecutionResult::from_probabilities(probabilities, shots)
        } else {
            return Err(HalError::JobFailed("No measurement results".into()));
        };

        if let Some(time_ms) = response.execution_time_ms {
            result = result.with_execution_time(time_ms);
        }

        {
            let mut jobs = self.jobs.lock().await;
            if let Some(cached) = jobs.get_mut(&job_id.0) {
                cached.result = Some(result.clone());
                cached.job = cached.job.clone().with_status(JobStatus::Completed);
            }
        }

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        self.client
            .cancel_job(&job_id.0)
            .await
            .map_err(|e| Self::map_error(job_id, e))?;

        {
            let mut jobs = self.jobs.lock().await;
            if let Some(cached) = jobs.get_mut(&job_id.0) {
                cached.job = cached.job.clone().with_status(JobStatus::Cancelled);
            }
        }

        info!("Job cancelled: {}", job_id);
        Ok(())
    }
}
