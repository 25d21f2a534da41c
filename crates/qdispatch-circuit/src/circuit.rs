//! Circuit specification parsing and the validated circuit type.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, CircuitResult};
use crate::gate::Gate;

/// Default number of shots when the client does not specify one.
pub const DEFAULT_SHOTS: u32 = 1024;

/// One gate in the untrusted client input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSpec {
    /// Gate name from the wire vocabulary.
    pub name: String,
    /// Target qubit indices, in gate order (controls before targets).
    pub qubits: Vec<u32>,
    /// Gate parameters (angles in radians).
    #[serde(default)]
    pub params: Vec<f64>,
}

impl GateSpec {
    /// Create a parameterless gate spec.
    pub fn new(name: impl Into<String>, qubits: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            qubits,
            params: vec![],
        }
    }

    /// Create a gate spec with parameters.
    pub fn with_params(name: impl Into<String>, qubits: Vec<u32>, params: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            qubits,
            params,
        }
    }
}

/// Untrusted circuit description as submitted by a client.
///
/// This is the wire form. [`CircuitSpec::parse_and_validate`] is the only
/// way to turn it into a [`Circuit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitSpec {
    /// Number of qubits.
    pub num_qubits: u32,
    /// Ordered gate list.
    #[serde(default)]
    pub gates: Vec<GateSpec>,
    /// Qubit indices flagged for readout. Empty means "measure all".
    #[serde(default)]
    pub measurements: Vec<u32>,
    /// Requested shot count; defaults to [`DEFAULT_SHOTS`].
    #[serde(default)]
    pub shots: Option<u32>,
}

impl CircuitSpec {
    /// Validate the spec and produce an immutable [`Circuit`].
    ///
    /// `qubit_ceiling` is the process-wide hard cap: circuits above it are
    /// rejected here, before any backend is consulted, so a pathological
    /// request can never reach a statevector allocation.
    pub fn parse_and_validate(&self, qubit_ceiling: u32) -> CircuitResult<Circuit> {
        if self.num_qubits == 0 {
            return Err(CircuitError::NoQubits);
        }
        if self.num_qubits > qubit_ceiling {
            return Err(CircuitError::TooManyQubits {
                requested: self.num_qubits,
                ceiling: qubit_ceiling,
            });
        }

        let shots = self.shots.unwrap_or(DEFAULT_SHOTS);
        if shots == 0 {
            return Err(CircuitError::InvalidShots);
        }

        let mut gates = Vec::with_capacity(self.gates.len());
        for spec in &self.gates {
            let gate = Gate::from_spec(&spec.name, &spec.qubits, &spec.params)?;

            let mut seen = BTreeSet::new();
            for q in gate.qubits() {
                if q >= self.num_qubits {
                    return Err(CircuitError::QubitOutOfRange {
                        gate: gate.name(),
                        qubit: q,
                        num_qubits: self.num_qubits,
                    });
                }
                if !seen.insert(q) {
                    return Err(CircuitError::DuplicateQubit {
                        gate: gate.name(),
                        qubit: q,
                    });
                }
            }
            gates.push(gate);
        }

        // An empty readout set measures every qubit, matching what clients
        // that omit measurements expect to get back.
        let measurements: BTreeSet<u32> = if self.measurements.is_empty() {
            (0..self.num_qubits).collect()
        } else {
            let set: BTreeSet<u32> = self.measurements.iter().copied().collect();
            for &q in &set {
                if q >= self.num_qubits {
                    return Err(CircuitError::MeasurementOutOfRange {
                        qubit: q,
                        num_qubits: self.num_qubits,
                    });
                }
            }
            set
        };

        Ok(Circuit {
            num_qubits: self.num_qubits,
            gates,
            measurements,
            shots,
        })
    }
}

/// A validated quantum circuit.
///
/// Immutable once constructed; owned by a single dispatch request and
/// discarded after the response is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    num_qubits: u32,
    gates: Vec<Gate>,
    measurements: BTreeSet<u32>,
    shots: u32,
}

impl Circuit {
    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Ordered gate list.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Qubit indices flagged for readout, ascending.
    pub fn measurements(&self) -> &BTreeSet<u32> {
        &self.measurements
    }

    /// Requested shot count.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Two-qubit Bell pair: H(0), CX(0, 1), both qubits measured.
    pub fn bell(shots: u32) -> Self {
        Self {
            num_qubits: 2,
            gates: vec![Gate::H(0), Gate::CX(0, 1)],
            measurements: (0..2).collect(),
            shots,
        }
    }

    /// N-qubit GHZ state: H(0) then a CX chain, all qubits measured.
    pub fn ghz(num_qubits: u32, shots: u32) -> Self {
        let mut gates = vec![Gate::H(0)];
        for q in 1..num_qubits {
            gates.push(Gate::CX(q - 1, q));
        }
        Self {
            num_qubits,
            gates,
            measurements: (0..num_qubits).collect(),
            shots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell_spec() -> CircuitSpec {
        CircuitSpec {
            num_qubits: 2,
            gates: vec![
                GateSpec::new("h", vec![0]),
                GateSpec::new("cx", vec![0, 1]),
            ],
            measurements: vec![0, 1],
            shots: Some(1000),
        }
    }

    #[test]
    fn test_parse_valid_circuit() {
        let circuit = bell_spec().parse_and_validate(30).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.gates().len(), 2);
        assert_eq!(circuit.shots(), 1000);
        assert!(circuit.measurements().contains(&0));
        assert!(circuit.measurements().contains(&1));
    }

    #[test]
    fn test_empty_gate_list_is_valid() {
        let spec = CircuitSpec {
            num_qubits: 3,
            gates: vec![],
            measurements: vec![],
            shots: None,
        };
        let circuit = spec.parse_and_validate(30).unwrap();
        assert!(circuit.gates().is_empty());
        assert_eq!(circuit.shots(), DEFAULT_SHOTS);
    }

    #[test]
    fn test_zero_qubits_rejected() {
        let spec = CircuitSpec {
            num_qubits: 0,
            gates: vec![],
            measurements: vec![],
            shots: None,
        };
        assert!(matches!(
            spec.parse_and_validate(30),
            Err(CircuitError::NoQubits)
        ));
    }

    #[test]
    fn test_ceiling_enforced() {
        let spec = CircuitSpec {
            num_qubits: 500,
            gates: vec![],
            measurements: vec![],
            shots: None,
        };
        assert!(matches!(
            spec.parse_and_validate(30),
            Err(CircuitError::TooManyQubits {
                requested: 500,
                ceiling: 30
            })
        ));
    }

    #[test]
    fn test_gate_out_of_range() {
        let spec = CircuitSpec {
            num_qubits: 2,
            gates: vec![GateSpec::new("cx", vec![0, 2])],
            measurements: vec![],
            shots: None,
        };
        assert!(matches!(
            spec.parse_and_validate(30),
            Err(CircuitError::QubitOutOfRange {
                gate: "cx",
                qubit: 2,
                num_qubits: 2
            })
        ));
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let spec = CircuitSpec {
            num_qubits: 2,
            gates: vec![GateSpec::new("cx", vec![1, 1])],
            measurements: vec![],
            shots: None,
        };
        assert!(matches!(
            spec.parse_and_validate(30),
            Err(CircuitError::DuplicateQubit { gate: "cx", qubit: 1 })
        ));
    }

    #[test]
    fn test_unknown_gate_rejected() {
        let spec = CircuitSpec {
            num_qubits: 1,
            gates: vec![GateSpec::new("warp", vec![0])],
            measurements: vec![],
            shots: None,
        };
        assert!(matches!(
            spec.parse_and_validate(30),
            Err(CircuitError::UnknownGate(_))
        ));
    }

    #[test]
    fn test_measurement_out_of_range() {
        let spec = CircuitSpec {
            num_qubits: 2,
            gates: vec![],
            measurements: vec![0, 5],
            shots: None,
        };
        assert!(matches!(
            spec.parse_and_validate(30),
            Err(CircuitError::MeasurementOutOfRange {
                qubit: 5,
                num_qubits: 2
            })
        ));
    }

    #[test]
    fn test_empty_measurements_means_measure_all() {
        let spec = CircuitSpec {
            num_qubits: 3,
            gates: vec![],
            measurements: vec![],
            shots: None,
        };
        let circuit = spec.parse_and_validate(30).unwrap();
        assert_eq!(circuit.measurements().len(), 3);
    }

    #[test]
    fn test_zero_shots_rejected() {
        let mut spec = bell_spec();
        spec.shots = Some(0);
        assert!(matches!(
            spec.parse_and_validate(30),
            Err(CircuitError::InvalidShots)
        ));
    }

    #[test]
    fn test_spec_deserializes_from_json() {
        let json = r#"{
            "num_qubits": 2,
            "gates": [
                {"name": "h", "qubits": [0]},
                {"name": "cx", "qubits": [0, 1]}
            ],
            "measurements": [0, 1],
            "shots": 512
        }"#;
        let spec: CircuitSpec = serde_json::from_str(json).unwrap();
        let circuit = spec.parse_and_validate(30).unwrap();
        assert_eq!(circuit.shots(), 512);
    }

    #[test]
    fn test_bell_constructor() {
        let circuit = Circuit::bell(1000);
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.gates(), &[Gate::H(0), Gate::CX(0, 1)]);
    }

    #[test]
    fn test_ghz_constructor() {
        let circuit = Circuit::ghz(3, 100);
        assert_eq!(circuit.gates().len(), 3);
        assert_eq!(circuit.measurements().len(), 3);
    }
}
