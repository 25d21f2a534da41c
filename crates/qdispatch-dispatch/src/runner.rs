//! Job runner: one circuit, one backend, one attempt.
//!
//! The remote job lifecycle is an explicit finite state machine:
//!
//! ```text
//!   Pending ──→ Submitted ──→ Polling ──→ Succeeded
//!      │                        │ │ │
//!      │                        │ │ └──→ Failed
//!      │                        │ └────→ TimedOut
//!      └────────────────────────┴──────→ Cancelled
//! ```
//!
//! Transitions are pure ([`JobState::apply`]), so timeout, cancellation,
//! and failure handling are testable without a runtime or a live backend.
//! The async driver ([`JobRunner::run`]) feeds events into the machine:
//! it sleeps between polls (never busy-spins), checks the cooperative
//! cancel handle between polls, and on budget exhaustion fires exactly
//! one best-effort remote cancel before finalizing locally.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use qdispatch_circuit::Circuit;
use qdispatch_hal::{Backend, BackendId, ExecutionResult, HalError, JobId, JobStatus};

use crate::config::DispatchConfig;
use crate::error::AttemptError;

/// States of one execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Not yet handed to the backend.
    Pending,
    /// Accepted by the remote queue.
    Submitted,
    /// Being polled for a terminal status.
    Polling,
    /// Remote (or local) execution completed; result retrieved.
    Succeeded,
    /// Submission or execution failed.
    Failed,
    /// Wait budget elapsed without a terminal status.
    TimedOut,
    /// The caller abandoned the attempt.
    Cancelled,
}

impl JobState {
    /// Check if this is a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Failed | JobState::TimedOut | JobState::Cancelled
        )
    }
}

/// Events driving the job state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEvent {
    /// The backend accepted the submission.
    SubmitAccepted,
    /// The backend rejected the submission.
    SubmitRejected,
    /// A poll returned a non-terminal status.
    PollPending,
    /// A poll reported completion.
    PollCompleted,
    /// A poll reported a remote failure.
    PollFailed,
    /// A poll reported remote cancellation.
    PollCancelled,
    /// The wait budget elapsed.
    BudgetExhausted,
    /// The caller requested cancellation.
    CancelRequested,
}

impl JobState {
    /// Apply an event, returning the next state.
    ///
    /// Terminal states absorb every event; transitions are monotonic.
    pub fn apply(self, event: JobEvent) -> JobState {
        if self.is_terminal() {
            return self;
        }
        match (self, event) {
            (_, JobEvent::CancelRequested) => JobState::Cancelled,
            (JobState::Pending, JobEvent::SubmitAccepted) => JobState::Submitted,
            (JobState::Pending, JobEvent::SubmitRejected) => JobState::Failed,
            (JobState::Submitted, JobEvent::PollPending)
            | (JobState::Polling, JobEvent::PollPending) => JobState::Polling,
            (JobState::Submitted | JobState::Polling, JobEvent::PollCompleted) => {
                JobState::Succeeded
            }
            (JobState::Submitted | JobState::Polling, JobEvent::PollFailed) => JobState::Failed,
            (JobState::Submitted | JobState::Polling, JobEvent::PollCancelled) => {
                JobState::Cancelled
            }
            (JobState::Submitted | JobState::Polling, JobEvent::BudgetExhausted) => {
                JobState::TimedOut
            }
            // Any other pairing is a driver bug; stay put rather than
            // invent a transition.
            (state, _) => state,
        }
    }
}

/// Cooperative cancellation handle.
///
/// Cloned into the dispatch; checked by the runner between poll attempts.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Create a handle that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// One execution attempt with its lifecycle metadata.
///
/// Owned exclusively by the runner for the duration of the attempt; never
/// shared across dispatch requests.
#[derive(Debug, Clone)]
pub struct ExecutionJob {
    /// Backend this attempt ran on.
    pub backend_id: BackendId,
    /// Shots requested.
    pub shots: u32,
    /// Current state.
    pub state: JobState,
    /// When the attempt started.
    pub submitted_at: DateTime<Utc>,
    /// Remote job handle, present only after a remote submission.
    pub remote_job_id: Option<JobId>,
    /// Error message, present in `Failed`/`TimedOut`.
    pub error: Option<String>,
}

impl ExecutionJob {
    fn new(backend_id: BackendId, shots: u32) -> Self {
        Self {
            backend_id,
            shots,
            state: JobState::Pending,
            submitted_at: Utc::now(),
            remote_job_id: None,
            error: None,
        }
    }
}

/// Successful outcome of one attempt.
#[derive(Debug)]
pub struct RunOutcome {
    /// Backend-native result, not yet normalized.
    pub result: ExecutionResult,
    /// The attempt's lifecycle record.
    pub job: ExecutionJob,
}

/// Executes one circuit against one backend.
pub struct JobRunner {
    poll_interval: Duration,
    wait_budget: Duration,
}

impl JobRunner {
    /// Create a runner from dispatch configuration.
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            wait_budget: config.wait_budget,
        }
    }

    /// Create a runner with explicit poll settings.
    pub fn with_timing(poll_interval: Duration, wait_budget: Duration) -> Self {
        Self {
            poll_interval,
            wait_budget,
        }
    }

    /// Run `circuit` on `backend`, one attempt, no retry.
    ///
    /// Local backends are invoked synchronously: submit, then read the
    /// result. Remote backends go through the submit → poll → retrieve
    /// state machine with this runner's wait budget.
    #[instrument(skip(self, circuit, backend, cancel), fields(backend = backend.name()))]
    pub async fn run(
        &self,
        circuit: &Circuit,
        backend: Arc<dyn Backend>,
        cancel: &CancelHandle,
    ) -> Result<RunOutcome, AttemptError> {
        let backend_id = BackendId::new(backend.name());
        let mut job = ExecutionJob::new(backend_id, circuit.shots());

        if cancel.is_cancelled() {
            job.state = job.state.apply(JobEvent::CancelRequested);
            return Err(AttemptError::Cancelled);
        }

        if backend.kind().is_local() {
            self.run_local(circuit, backend, job).await
        } else {
            self.run_remote(circuit, backend, cancel, job).await
        }
    }

    /// Local path: the simulation runs inside `submit()`.
    async fn run_local(
        &self,
        circuit: &Circuit,
        backend: Arc<dyn Backend>,
        mut job: ExecutionJob,
    ) -> Result<RunOutcome, AttemptError> {
        let job_id = match backend.submit(circuit, circuit.shots()).await {
            Ok(id) => {
                job.state = job.state.apply(JobEvent::SubmitAccepted);
                id
            }
            Err(e) => {
                job.state = job.state.apply(JobEvent::SubmitRejected);
                job.error = Some(e.to_string());
                return Err(AttemptError::Simulation(e.to_string()));
            }
        };

        match backend.result(&job_id).await {
            Ok(result) => {
                job.state = job.state.apply(JobEvent::PollCompleted);
                debug!("Local execution succeeded");
                Ok(RunOutcome { result, job })
            }
            Err(e) => {
                job.state = job.state.apply(JobEvent::PollFailed);
                job.error = Some(e.to_string());
                Err(AttemptError::Simulation(e.to_string()))
            }
        }
    }

    /// Remote path: drive the submit → poll → retrieve state machine.
    async fn run_remote(
        &self,
        circuit: &Circuit,
        backend: Arc<dyn Backend>,
        cancel: &CancelHandle,
        mut job: ExecutionJob,
    ) -> Result<RunOutcome, AttemptError> {
        let job_id = match backend.submit(circuit, circuit.shots()).await {
            Ok(id) => {
                job.state = job.state.apply(JobEvent::SubmitAccepted);
                job.remote_job_id = Some(id.clone());
                info!("Remote job submitted: {}", id);
                id
            }
            Err(e) => {
                job.state = job.state.apply(JobEvent::SubmitRejected);
                job.error = Some(e.to_string());
                return Err(AttemptError::Submission(e.to_string()));
            }
        };

        let deadline = Instant::now() + self.wait_budget;

        loop {
            if cancel.is_cancelled() {
                job.state = job.state.apply(JobEvent::CancelRequested);
                self.fire_cancel(&backend, &job_id).await;
                return Err(AttemptError::Cancelled);
            }

            if Instant::now() >= deadline {
                job.state = job.state.apply(JobEvent::BudgetExhausted);
                job.error = Some(format!(
                    "no terminal status within {} ms",
                    self.wait_budget.as_millis()
                ));
                // Best-effort: the local state machine finalizes whether or
                // not the remote side acknowledges the cancel.
                self.fire_cancel(&backend, &job_id).await;
                return Err(AttemptError::Timeout(self.wait_budget.as_millis() as u64));
            }

            let status = match backend.status(&job_id).await {
                Ok(status) => status,
                Err(e) => {
                    // A failed status check is not a remote verdict; keep
                    // polling until the budget says otherwise.
                    warn!("Status check failed for job {}: {}", job_id, e);
                    tokio::time::sleep(self.poll_interval).await;
                    continue;
                }
            };

            match status {
                JobStatus::Completed => {
                    let result = backend
                        .result(&job_id)
                        .await
                        .map_err(|e| remote_result_error(&mut job, e))?;
                    job.state = job.state.apply(JobEvent::PollCompleted);
                    info!("Remote job {} succeeded", job_id);
                    return Ok(RunOutcome { result, job });
                }
                JobStatus::Failed(message) => {
                    job.state = job.state.apply(JobEvent::PollFailed);
                    job.error = Some(message.clone());
                    return Err(AttemptError::RemoteExecution(message));
                }
                JobStatus::Cancelled => {
                    job.state = job.state.apply(JobEvent::PollCancelled);
                    return Err(AttemptError::RemoteExecution(
                        "job cancelled by the remote service".into(),
                    ));
                }
                JobStatus::Queued | JobStatus::Running => {
                    job.state = job.state.apply(JobEvent::PollPending);
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    /// Fire-and-forget remote cancellation.
    async fn fire_cancel(&self, backend: &Arc<dyn Backend>, job_id: &JobId) {
        if let Err(e) = backend.cancel(job_id).await {
            debug!("Best-effort cancel of job {} failed: {}", job_id, e);
        }
    }
}

fn remote_result_error(job: &mut ExecutionJob, e: HalError) -> AttemptError {
    job.state = job.state.apply(JobEvent::PollFailed);
    job.error = Some(e.to_string());
    AttemptError::RemoteExecution(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let state = JobState::Pending
            .apply(JobEvent::SubmitAccepted)
            .apply(JobEvent::PollPending)
            .apply(JobEvent::PollPending)
            .apply(JobEvent::PollCompleted);
        assert_eq!(state, JobState::Succeeded);
    }

    #[test]
    fn test_submit_rejection_is_terminal() {
        let state = JobState::Pending.apply(JobEvent::SubmitRejected);
        assert_eq!(state, JobState::Failed);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_budget_exhaustion_times_out() {
        let state = JobState::Pending
            .apply(JobEvent::SubmitAccepted)
            .apply(JobEvent::PollPending)
            .apply(JobEvent::BudgetExhausted);
        assert_eq!(state, JobState::TimedOut);
    }

    #[test]
    fn test_cancel_from_any_non_terminal_state() {
        for state in [JobState::Pending, JobState::Submitted, JobState::Polling] {
            assert_eq!(state.apply(JobEvent::CancelRequested), JobState::Cancelled);
        }
    }

    #[test]
    fn test_terminal_states_absorb_events() {
        for terminal in [
            JobState::Succeeded,
            JobState::Failed,
            JobState::TimedOut,
            JobState::Cancelled,
        ] {
            for event in [
                JobEvent::SubmitAccepted,
                JobEvent::PollCompleted,
                JobEvent::PollFailed,
                JobEvent::BudgetExhausted,
                JobEvent::CancelRequested,
            ] {
                assert_eq!(terminal.apply(event), terminal);
            }
        }
    }

    #[test]
    fn test_remote_failure_transition() {
        let state = JobState::Pending
            .apply(JobEvent::SubmitAccepted)
            .apply(JobEvent::PollFailed);
        assert_eq!(state, JobState::Failed);
    }

    #[test]
    fn test_cancel_handle() {
        let handle = CancelHandle::new();
        assert!(!handle.is_cancelled());

        let clone = handle.clone();
        clone.cancel();
        assert!(handle.is_cancelled());
    }
}
