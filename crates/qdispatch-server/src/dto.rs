//! Request and response DTOs.

use serde::{Deserialize, Serialize};

use qdispatch_circuit::CircuitSpec;
use qdispatch_dispatch::NormalizedResult;

/// Body of `POST /api/execute`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteRequest {
    /// The circuit to execute.
    #[serde(flatten)]
    pub circuit: CircuitSpec,
    /// Optional explicit backend preference.
    #[serde(default)]
    pub backend: Option<String>,
}

/// Body of a successful `POST /api/execute` response.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteResponse {
    /// Backend that produced the result.
    pub backend_used: String,
    /// Shots executed.
    pub shots: u32,
    /// Bitstring counts, sorted by descending count for readability.
    pub counts: Vec<CountEntry>,
    /// Wall-clock execution time in milliseconds.
    pub execution_time_ms: u64,
    /// Ordered dispatch notes, e.g. fallbacks taken.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// One bitstring outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CountEntry {
    /// Measured bitstring (lowest measured qubit leftmost).
    pub bitstring: String,
    /// Occurrences.
    pub count: u64,
}

impl From<NormalizedResult> for ExecuteResponse {
    fn from(result: NormalizedResult) -> Self {
        let counts = result
            .counts
            .sorted()
            .into_iter()
            .map(|(bitstring, count)| CountEntry { bitstring, count })
            .collect();
        Self {
            backend_used: result.backend_id.to_string(),
            shots: result.shots,
            counts,
            execution_time_ms: result.execution_time_ms,
            warnings: result.warnings,
        }
    }
}

/// One entry of `GET /api/backends`.
#[derive(Debug, Clone, Serialize)]
pub struct BackendInfo {
    /// Backend identifier.
    pub id: String,
    /// `local` or `remote`.
    pub kind: String,
    /// Maximum accepted circuit width.
    pub max_qubits: u32,
    /// Maximum shots per job.
    pub max_shots: u32,
    /// Whether credentials are required.
    pub requires_credentials: bool,
    /// Result of the most recent liveness probe.
    pub reachable: bool,
}
