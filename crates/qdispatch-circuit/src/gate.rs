//! The gate vocabulary.

use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, CircuitResult};

/// A gate applied to specific qubits.
///
/// The vocabulary is closed: the dispatch engine only accepts circuits
/// built from these gates, and every backend is expected to execute all of
/// them. Parameters are angles in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Identity.
    I(u32),
    /// Pauli-X.
    X(u32),
    /// Pauli-Y.
    Y(u32),
    /// Pauli-Z.
    Z(u32),
    /// Hadamard.
    H(u32),
    /// S gate (sqrt(Z)).
    S(u32),
    /// S-dagger.
    Sdg(u32),
    /// T gate (fourth root of Z).
    T(u32),
    /// T-dagger.
    Tdg(u32),
    /// Rotation around X.
    Rx(u32, f64),
    /// Rotation around Y.
    Ry(u32, f64),
    /// Rotation around Z.
    Rz(u32, f64),
    /// Phase gate.
    P(u32, f64),
    /// Controlled-X (CNOT): control, target.
    CX(u32, u32),
    /// Controlled-Y: control, target.
    CY(u32, u32),
    /// Controlled-Z: control, target.
    CZ(u32, u32),
    /// Controlled-Hadamard: control, target.
    CH(u32, u32),
    /// SWAP.
    Swap(u32, u32),
    /// Controlled phase: control, target.
    CP(u32, u32, f64),
    /// Toffoli (CCX): two controls, target.
    CCX(u32, u32, u32),
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::I(_) => "id",
            Gate::X(_) => "x",
            Gate::Y(_) => "y",
            Gate::Z(_) => "z",
            Gate::H(_) => "h",
            Gate::S(_) => "s",
            Gate::Sdg(_) => "sdg",
            Gate::T(_) => "t",
            Gate::Tdg(_) => "tdg",
            Gate::Rx(_, _) => "rx",
            Gate::Ry(_, _) => "ry",
            Gate::Rz(_, _) => "rz",
            Gate::P(_, _) => "p",
            Gate::CX(_, _) => "cx",
            Gate::CY(_, _) => "cy",
            Gate::CZ(_, _) => "cz",
            Gate::CH(_, _) => "ch",
            Gate::Swap(_, _) => "swap",
            Gate::CP(_, _, _) => "cp",
            Gate::CCX(_, _, _) => "ccx",
        }
    }

    /// Get the qubits this gate acts on, in declaration order.
    pub fn qubits(&self) -> Vec<u32> {
        match *self {
            Gate::I(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::H(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::T(q)
            | Gate::Tdg(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _)
            | Gate::P(q, _) => vec![q],
            Gate::CX(c, t)
            | Gate::CY(c, t)
            | Gate::CZ(c, t)
            | Gate::CH(c, t)
            | Gate::Swap(c, t)
            | Gate::CP(c, t, _) => vec![c, t],
            Gate::CCX(c1, c2, t) => vec![c1, c2, t],
        }
    }

    /// Build a gate from its wire name, target qubits, and parameters.
    ///
    /// This is where the vocabulary is enforced: an unrecognized name is a
    /// validation error, not a no-op.
    pub fn from_spec(name: &str, qubits: &[u32], params: &[f64]) -> CircuitResult<Self> {
        let gate = match name {
            "id" | "i" => Gate::I(one("id", qubits, params, 0)?),
            "x" => Gate::X(one("x", qubits, params, 0)?),
            "y" => Gate::Y(one("y", qubits, params, 0)?),
            "z" => Gate::Z(one("z", qubits, params, 0)?),
            "h" => Gate::H(one("h", qubits, params, 0)?),
            "s" => Gate::S(one("s", qubits, params, 0)?),
            "sdg" => Gate::Sdg(one("sdg", qubits, params, 0)?),
            "t" => Gate::T(one("t", qubits, params, 0)?),
            "tdg" => Gate::Tdg(one("tdg", qubits, params, 0)?),
            "rx" => {
                let q = one("rx", qubits, params, 1)?;
                Gate::Rx(q, params[0])
            }
            "ry" => {
                let q = one("ry", qubits, params, 1)?;
                Gate::Ry(q, params[0])
            }
            "rz" => {
                let q = one("rz", qubits, params, 1)?;
                Gate::Rz(q, params[0])
            }
            "p" | "phase" => {
                let q = one("p", qubits, params, 1)?;
                Gate::P(q, params[0])
            }
            "cx" | "cnot" => {
                let (c, t) = two("cx", qubits, params, 0)?;
                Gate::CX(c, t)
            }
            "cy" => {
                let (c, t) = two("cy", qubits, params, 0)?;
                Gate::CY(c, t)
            }
            "cz" => {
                let (c, t) = two("cz", qubits, params, 0)?;
                Gate::CZ(c, t)
            }
            "ch" => {
                let (c, t) = two("ch", qubits, params, 0)?;
                Gate::CH(c, t)
            }
            "swap" => {
                let (a, b) = two("swap", qubits, params, 0)?;
                Gate::Swap(a, b)
            }
            "cp" => {
                let (c, t) = two("cp", qubits, params, 1)?;
                Gate::CP(c, t, params[0])
            }
            "ccx" | "toffoli" => {
                let (c1, c2, t) = three("ccx", qubits, params)?;
                Gate::CCX(c1, c2, t)
            }
            other => return Err(CircuitError::UnknownGate(other.to_string())),
        };

        for p in params {
            if !p.is_finite() {
                return Err(CircuitError::NonFiniteParameter { gate: gate.name() });
            }
        }

        Ok(gate)
    }
}

fn check_params(gate: &'static str, params: &[f64], expected: u32) -> CircuitResult<()> {
    if params.len() as u32 != expected {
        return Err(CircuitError::ParameterCountMismatch {
            gate,
            expected,
            got: params.len() as u32,
        });
    }
    Ok(())
}

fn one(
    gate: &'static str,
    qubits: &[u32],
    params: &[f64],
    expected_params: u32,
) -> CircuitResult<u32> {
    check_params(gate, params, expected_params)?;
    match qubits {
        [q] => Ok(*q),
        _ => Err(CircuitError::QubitCountMismatch {
            gate,
            expected: 1,
            got: qubits.len() as u32,
        }),
    }
}

fn two(
    gate: &'static str,
    qubits: &[u32],
    params: &[f64],
    expected_params: u32,
) -> CircuitResult<(u32, u32)> {
    check_params(gate, params, expected_params)?;
    match qubits {
        [a, b] => Ok((*a, *b)),
        _ => Err(CircuitError::QubitCountMismatch {
            gate,
            expected: 2,
            got: qubits.len() as u32,
        }),
    }
}

fn three(gate: &'static str, qubits: &[u32], params: &[f64]) -> CircuitResult<(u32, u32, u32)> {
    check_params(gate, params, 0)?;
    match qubits {
        [a, b, c] => Ok((*a, *b, *c)),
        _ => Err(CircuitError::QubitCountMismatch {
            gate,
            expected: 3,
            got: qubits.len() as u32,
        }),
    }
}
