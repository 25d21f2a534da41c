//! Backend identity and capability descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a registered backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackendId(pub String);

impl BackendId {
    /// Create a new backend ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BackendId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Where a backend executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// In-process simulation.
    Local,
    /// Remote queued cloud service.
    Remote,
}

impl BackendKind {
    /// Check if this is a local backend.
    pub fn is_local(self) -> bool {
        matches!(self, BackendKind::Local)
    }
}

/// What a backend can accept.
///
/// Cached at backend construction time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Maximum circuit width the backend accepts.
    pub max_qubits: u32,
    /// Maximum shots per job.
    pub max_shots: u32,
    /// Whether the backend honors a requested shot count.
    pub supports_shots: bool,
    /// Whether credentials are required to use the backend.
    pub requires_credentials: bool,
}

impl Capabilities {
    /// Capabilities of a local simulator.
    pub fn simulator(max_qubits: u32) -> Self {
        Self {
            max_qubits,
            max_shots: 1_000_000,
            supports_shots: true,
            requires_credentials: false,
        }
    }

    /// Capabilities of a remote cloud service.
    pub fn cloud(max_qubits: u32, max_shots: u32) -> Self {
        Self {
            max_qubits,
            max_shots,
            supports_shots: true,
            requires_credentials: true,
        }
    }

    /// Check whether a circuit of the given width fits.
    pub fn accepts_qubits(&self, num_qubits: u32) -> bool {
        num_qubits <= self.max_qubits
    }
}

/// Point-in-time description of a registered backend.
///
/// Capability metadata is fixed at registration; `reachable` is the result
/// of the most recent liveness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendDescriptor {
    /// Backend identifier.
    pub id: BackendId,
    /// Local or remote execution.
    pub kind: BackendKind,
    /// Capability metadata.
    pub capabilities: Capabilities,
    /// Result of the most recent liveness probe.
    pub reachable: bool,
}
