//! The backend trait.

use async_trait::async_trait;

use qdispatch_circuit::Circuit;

use crate::capability::{BackendKind, Capabilities};
use crate::error::HalResult;
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Trait implemented by every execution backend.
///
/// Covers the full job lifecycle: introspection, liveness, submission,
/// status polling, result retrieval, and cancellation.
///
/// # Contract
///
/// - `capabilities()` MUST be synchronous and infallible; implementations
///   cache capabilities at construction time.
/// - `availability()` SHOULD be a lightweight liveness check. Callers wrap
///   it in their own timeout, so it must not retry internally.
/// - `submit()` MUST return a [`JobId`] whose initial status is `Queued`.
///   A local simulator may complete the job before returning.
/// - `result()` MUST only be called once `status()` reports `Completed`.
/// - `cancel()` is best-effort.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Whether this backend executes locally or remotely.
    fn kind(&self) -> BackendKind;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check whether the backend is currently accepting jobs.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Submit a circuit for execution.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a running job. Best-effort.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;
}

/// Backend availability information.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    /// Whether the backend is currently accepting jobs.
    pub is_available: bool,
    /// Human-readable status message.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Availability for a backend that is always reachable.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            status_message: None,
        }
    }

    /// Availability for an offline backend.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            status_message: Some(reason.into()),
        }
    }
}
