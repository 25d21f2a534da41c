//! Error types for circuit parsing and validation.

use thiserror::Error;

/// Errors that can occur while validating a circuit specification.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CircuitError {
    /// Qubit count must be at least one.
    #[error("Circuit must have at least one qubit")]
    NoQubits,

    /// Qubit count exceeds the configured hard ceiling.
    #[error("Circuit has {requested} qubits but the ceiling is {ceiling}")]
    TooManyQubits {
        /// Qubits requested by the client.
        requested: u32,
        /// Process-wide hard ceiling.
        ceiling: u32,
    },

    /// Gate name is not in the supported vocabulary.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// Gate was given the wrong number of target qubits.
    #[error("Gate '{gate}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate: &'static str,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Gate was given the wrong number of parameters.
    #[error("Gate '{gate}' requires {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Name of the gate.
        gate: &'static str,
        /// Expected number of parameters.
        expected: u32,
        /// Actual number of parameters provided.
        got: u32,
    },

    /// Gate references a qubit outside `[0, num_qubits)`.
    #[error("Gate '{gate}' targets qubit {qubit} but the circuit has {num_qubits} qubits")]
    QubitOutOfRange {
        /// Name of the gate.
        gate: &'static str,
        /// The offending qubit index.
        qubit: u32,
        /// Number of qubits in the circuit.
        num_qubits: u32,
    },

    /// The same qubit appears twice in one gate.
    #[error("Gate '{gate}' targets qubit {qubit} more than once")]
    DuplicateQubit {
        /// Name of the gate.
        gate: &'static str,
        /// The duplicated qubit index.
        qubit: u32,
    },

    /// A measured qubit index is outside `[0, num_qubits)`.
    #[error("Measurement targets qubit {qubit} but the circuit has {num_qubits} qubits")]
    MeasurementOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// Number of qubits in the circuit.
        num_qubits: u32,
    },

    /// Shot count must be at least one.
    #[error("Shot count must be positive")]
    InvalidShots,

    /// A gate parameter is not a finite number.
    #[error("Gate '{gate}' has a non-finite parameter")]
    NonFiniteParameter {
        /// Name of the gate.
        gate: &'static str,
    },
}

/// Result type for circuit operations.
pub type CircuitResult<T> = Result<T, CircuitError>;
