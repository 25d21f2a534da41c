//! The dispatch error taxonomy.
//!
//! Two layers, with a strict propagation boundary between them:
//!
//! - [`AttemptError`] — the failure of one execution attempt on one
//!   backend. Eligible for fallback to the next candidate (except
//!   `Cancelled`, which aborts the whole dispatch).
//! - [`DispatchError`] — what callers of the orchestrator see. Per-attempt
//!   errors are caught, recorded as [`AttemptRecord`]s, and never
//!   propagated raw past this boundary.

use serde::Serialize;
use thiserror::Error;

use qdispatch_circuit::CircuitError;
use qdispatch_hal::BackendId;

/// Failure of a single execution attempt on a single backend.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    /// The job could not be handed to the remote queue.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// The remote side reported an execution failure; the message is the
    /// remote-provided diagnostic, verbatim.
    #[error("Remote execution failed: {0}")]
    RemoteExecution(String),

    /// The wait budget elapsed without the remote job reaching a terminal
    /// status.
    #[error("Timed out after {0} ms waiting for remote job")]
    Timeout(u64),

    /// The local simulation engine failed.
    #[error("Simulation failed: {0}")]
    Simulation(String),

    /// The backend produced output that could not be normalized.
    #[error("Normalization failed: {0}")]
    Normalization(String),

    /// The caller abandoned the dispatch.
    #[error("Cancelled")]
    Cancelled,
}

impl AttemptError {
    /// Stable machine-readable kind, used in responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AttemptError::Submission(_) => "submission_failure",
            AttemptError::RemoteExecution(_) => "remote_execution_failure",
            AttemptError::Timeout(_) => "timeout",
            AttemptError::Simulation(_) => "simulation_failure",
            AttemptError::Normalization(_) => "normalization_failure",
            AttemptError::Cancelled => "cancelled",
        }
    }

    /// Whether the orchestrator may try the next candidate backend.
    pub fn allows_fallback(&self) -> bool {
        !matches!(self, AttemptError::Cancelled)
    }
}

/// One failed backend attempt, as recorded by the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    /// Backend that was tried.
    pub backend_id: BackendId,
    /// Machine-readable error kind.
    pub kind: &'static str,
    /// Human-readable error message.
    pub message: String,
}

impl AttemptRecord {
    /// Record a failed attempt.
    pub fn new(backend_id: BackendId, error: &AttemptError) -> Self {
        Self {
            backend_id,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Errors visible to callers of the dispatch orchestrator.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The circuit failed structural validation; no backend was touched.
    #[error(transparent)]
    Validation(#[from] CircuitError),

    /// No registered backend can accept the circuit; nothing was attempted.
    #[error("No backend can accept a {qubits}-qubit circuit")]
    Capacity {
        /// Width of the rejected circuit.
        qubits: u32,
    },

    /// The caller abandoned the dispatch before it finished.
    #[error("Dispatch cancelled")]
    Cancelled,

    /// Every candidate backend failed.
    #[error("All backends exhausted{}", summarize_attempts(.attempts))]
    AllBackendsExhausted {
        /// Every attempt, in the order it was made.
        attempts: Vec<AttemptRecord>,
    },
}

impl DispatchError {
    /// Stable machine-readable kind, used in responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Validation(_) => "validation_error",
            DispatchError::Capacity { .. } => "capacity_error",
            DispatchError::Cancelled => "cancelled",
            DispatchError::AllBackendsExhausted { .. } => "all_backends_exhausted",
        }
    }
}

fn summarize_attempts(attempts: &[AttemptRecord]) -> String {
    if attempts.is_empty() {
        return String::new();
    }
    let tried: Vec<_> = attempts
        .iter()
        .map(|a| format!("{} ({})", a.backend_id, a.kind))
        .collect();
    let last = &attempts[attempts.len() - 1];
    format!("; tried: {}; last error: {}", tried.join(", "), last.message)
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_error_kinds() {
        assert_eq!(
            AttemptError::Submission("auth".into()).kind(),
            "submission_failure"
        );
        assert_eq!(AttemptError::Timeout(5000).kind(), "timeout");
        assert_eq!(AttemptError::Cancelled.kind(), "cancelled");
    }

    #[test]
    fn test_fallback_eligibility() {
        assert!(AttemptError::Simulation("nan".into()).allows_fallback());
        assert!(AttemptError::Timeout(1).allows_fallback());
        assert!(!AttemptError::Cancelled.allows_fallback());
    }

    #[test]
    fn test_exhausted_message_names_backends() {
        let attempts = vec![
            AttemptRecord::new(
                BackendId::from("simulator"),
                &AttemptError::Simulation("kernel error".into()),
            ),
            AttemptRecord::new(BackendId::from("cloud"), &AttemptError::Timeout(300_000)),
        ];
        let err = DispatchError::AllBackendsExhausted { attempts };
        let message = err.to_string();

        assert!(message.contains("simulator (simulation_failure)"));
        assert!(message.contains("cloud (timeout)"));
        assert!(message.contains("last error"));
    }
}
