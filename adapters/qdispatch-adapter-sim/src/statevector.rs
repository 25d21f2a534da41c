//! Statevector simulation engine.

use std::f64::consts::PI;

use num_complex::Complex64;

use qdispatch_circuit::{Circuit, Gate};
use qdispatch_hal::Counts;

/// A statevector representing a quantum state.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Evolve the state through an entire circuit and sample `shots`
    /// measurement outcomes restricted to the circuit's readout set.
    ///
    /// The gate vocabulary has no mid-circuit measurement or reset, so the
    /// state is evolved once and all shots are drawn from the final
    /// distribution.
    pub fn run(circuit: &Circuit, shots: u32) -> Counts {
        let mut sv = Statevector::new(circuit.num_qubits() as usize);
        for gate in circuit.gates() {
            sv.apply(gate);
        }

        let measured: Vec<usize> = circuit.measurements().iter().map(|&q| q as usize).collect();

        let mut counts = Counts::new();
        for _ in 0..shots {
            let outcome = sv.sample();
            counts.insert(sv.outcome_to_bitstring(outcome, &measured), 1);
        }
        counts
    }

    /// Apply a gate to the statevector.
    pub fn apply(&mut self, gate: &Gate) {
        match *gate {
            Gate::I(_) => {}
            Gate::X(q) => self.apply_x(q as usize),
            Gate::Y(q) => self.apply_y(q as usize),
            Gate::Z(q) => self.apply_z(q as usize),
            Gate::H(q) => self.apply_h(q as usize),
            Gate::S(q) => self.apply_phase(q as usize, PI / 2.0),
            Gate::Sdg(q) => self.apply_phase(q as usize, -PI / 2.0),
            Gate::T(q) => self.apply_phase(q as usize, PI / 4.0),
            Gate::Tdg(q) => self.apply_phase(q as usize, -PI / 4.0),
            Gate::Rx(q, theta) => self.apply_rx(q as usize, theta),
            Gate::Ry(q, theta) => self.apply_ry(q as usize, theta),
            Gate::Rz(q, theta) => self.apply_rz(q as usize, theta),
            Gate::P(q, theta) => self.apply_phase(q as usize, theta),
            Gate::CX(c, t) => self.apply_cx(c as usize, t as usize),
            Gate::CY(c, t) => self.apply_cy(c as usize, t as usize),
            Gate::CZ(c, t) => self.apply_cz(c as usize, t as usize),
            Gate::CH(c, t) => self.apply_ch(c as usize, t as usize),
            Gate::Swap(a, b) => self.apply_swap(a as usize, b as usize),
            Gate::CP(c, t, theta) => self.apply_cp(c as usize, t as usize, theta),
            Gate::CCX(c1, c2, t) => self.apply_ccx(c1 as usize, c2 as usize, t as usize),
        }
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if i & mask != 0 {
                self.amplitudes[i] *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let neg_i_s = Complex64::new(0.0, -s);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                self.amplitudes[i] *= phase_0;
            } else {
                self.amplitudes[i] *= phase_1;
            }
        }
    }

    // =========================================================================
    // Multi-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cy(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_ch(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..(1 << self.num_qubits) {
            let b1 = (i & mask1) != 0;
            let b2 = (i & mask2) != 0;
            if b1 && !b2 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cp(&mut self, control: usize, target: usize, theta: f64) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] *= phase;
            }
        }
    }

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let c1_mask = 1 << c1;
        let c2_mask = 1 << c2;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & c1_mask != 0) && (i & c2_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Sample one measurement outcome over all qubits.
    pub fn sample(&self) -> usize {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i;
            }
        }

        // Fallback for normalization round-off.
        self.amplitudes.len() - 1
    }

    /// Project an outcome onto the measured qubits, lowest index leftmost.
    pub fn outcome_to_bitstring(&self, outcome: usize, measured: &[usize]) -> String {
        measured
            .iter()
            .map(|&q| if outcome & (1 << q) != 0 { '1' } else { '0' })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdispatch_circuit::{CircuitSpec, GateSpec};

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        for i in 1..4 {
            assert!(approx_eq(sv.amplitudes[i], Complex64::new(0.0, 0.0)));
        }
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply(&Gate::H(0));

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_bell_amplitudes() {
        let mut sv = Statevector::new(2);
        sv.apply(&Gate::H(0));
        sv.apply(&Gate::CX(0, 1));

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_x_gate_deterministic_sample() {
        let mut sv = Statevector::new(1);
        sv.apply(&Gate::X(0));

        for _ in 0..100 {
            assert_eq!(sv.sample(), 1);
        }
    }

    #[test]
    fn test_run_bell_counts() {
        let circuit = Circuit::bell(1000);
        let counts = Statevector::run(&circuit, 1000);

        assert_eq!(counts.total(), 1000);
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[test]
    fn test_run_ghz_counts() {
        let circuit = Circuit::ghz(3, 500);
        let counts = Statevector::run(&circuit, 500);

        assert_eq!(counts.get("000") + counts.get("111"), 500);
    }

    #[test]
    fn test_partial_measurement_marginalizes() {
        // X(1) on two qubits, measuring only qubit 1, always reads "1".
        let spec = CircuitSpec {
            num_qubits: 2,
            gates: vec![GateSpec::new("x", vec![1])],
            measurements: vec![1],
            shots: Some(64),
        };
        let circuit = spec.parse_and_validate(30).unwrap();
        let counts = Statevector::run(&circuit, 64);

        assert_eq!(counts.get("1"), 64);
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_bitstring_orientation() {
        // X on qubit 0 of 3: full readout is "100" (qubit 0 leftmost).
        let spec = CircuitSpec {
            num_qubits: 3,
            gates: vec![GateSpec::new("x", vec![0])],
            measurements: vec![],
            shots: Some(16),
        };
        let circuit = spec.parse_and_validate(30).unwrap();
        let counts = Statevector::run(&circuit, 16);

        assert_eq!(counts.get("100"), 16);
    }
}
