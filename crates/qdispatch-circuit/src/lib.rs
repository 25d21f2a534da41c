//! Circuit model for qdispatch.
//!
//! This crate defines the validated, in-memory representation of a quantum
//! circuit and the untrusted wire form it is parsed from:
//!
//! - [`CircuitSpec`] — the serde-deserializable client input (qubit count,
//!   gate list, measurement set, optional shot count).
//! - [`Circuit`] — the validated, immutable circuit handed to backends.
//! - [`Gate`] — the closed gate vocabulary. Unknown gate names fail
//!   validation; they are never silently dropped.
//!
//! Validation is a pure transformation: no I/O, no backend is touched.
//!
//! # Example
//!
//! ```
//! use qdispatch_circuit::{CircuitSpec, GateSpec};
//!
//! let spec = CircuitSpec {
//!     num_qubits: 2,
//!     gates: vec![
//!         GateSpec::new("h", vec![0]),
//!         GateSpec::new("cx", vec![0, 1]),
//!     ],
//!     measurements: vec![],
//!     shots: None,
//! };
//!
//! let circuit = spec.parse_and_validate(30).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//! // An empty measurement set measures every qubit.
//! assert_eq!(circuit.measurements().len(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;

pub use circuit::{Circuit, CircuitSpec, GateSpec, DEFAULT_SHOTS};
pub use error::{CircuitError, CircuitResult};
pub use gate::Gate;
