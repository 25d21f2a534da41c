//! Result normalization.
//!
//! Backends report measurement output in two native shapes: bitstring
//! counts or a probability vector over computational-basis outcomes.
//! Normalization folds both into one [`Counts`] map whose values sum to
//! the requested shot count.
//!
//! Probability vectors are converted to *expected* counts, never
//! resampled: floor the expected values, then hand the remaining shots
//! out in order of descending fractional part (index order on ties). The
//! conversion is deterministic and exact.

use qdispatch_hal::{Counts, ExecutionResult, OutputPayload};

use crate::error::AttemptError;

/// Normalize a backend-native result against the requested shot count.
///
/// Counts-shaped payloads must already sum to `shots`; a mismatch means
/// the backend executed something other than what was asked and is
/// surfaced as a per-attempt error rather than silently rescaled.
pub fn normalize(result: ExecutionResult, shots: u32) -> Result<Counts, AttemptError> {
    match result.payload {
        OutputPayload::Counts(counts) => {
            let total = counts.total();
            if total != u64::from(shots) {
                return Err(AttemptError::Normalization(format!(
                    "backend reported {total} shots, {shots} were requested"
                )));
            }
            Ok(counts)
        }
        OutputPayload::Probabilities(probabilities) => {
            probabilities_to_counts(&probabilities, shots)
        }
    }
}

/// Convert a probability vector to expected counts summing to `shots`.
fn probabilities_to_counts(probabilities: &[f64], shots: u32) -> Result<Counts, AttemptError> {
    if probabilities.is_empty() {
        return Err(AttemptError::Normalization(
            "empty probability vector".into(),
        ));
    }
    if !probabilities.len().is_power_of_two() {
        return Err(AttemptError::Normalization(format!(
            "probability vector length {} is not a power of two",
            probabilities.len()
        )));
    }
    if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(AttemptError::Normalization(
            "probability vector contains negative or non-finite entries".into(),
        ));
    }

    let sum: f64 = probabilities.iter().sum();
    if sum <= 0.0 {
        return Err(AttemptError::Normalization(
            "probability vector sums to zero".into(),
        ));
    }

    let width = probabilities.len().trailing_zeros() as usize;

    // Largest-remainder apportionment: floors first, then the leftover
    // shots to the largest fractional parts, lowest index winning ties.
    let expected: Vec<f64> = probabilities
        .iter()
        .map(|p| p / sum * f64::from(shots))
        .collect();
    let mut assigned: Vec<u64> = expected.iter().map(|e| e.floor() as u64).collect();
    let assigned_total: u64 = assigned.iter().sum();
    let mut leftover = u64::from(shots) - assigned_total;

    let mut by_fraction: Vec<usize> = (0..expected.len()).collect();
    by_fraction.sort_by(|&a, &b| {
        let fa = expected[a] - expected[a].floor();
        let fb = expected[b] - expected[b].floor();
        fb.partial_cmp(&fa).unwrap_or(std::cmp::Ordering::Equal).then(a.cmp(&b))
    });

    for &i in &by_fraction {
        if leftover == 0 {
            break;
        }
        assigned[i] += 1;
        leftover -= 1;
    }

    let mut counts = Counts::new();
    for (outcome, &count) in assigned.iter().enumerate() {
        if count > 0 {
            counts.insert(outcome_bitstring(outcome, width), count);
        }
    }
    Ok(counts)
}

/// Render an outcome index as a bitstring, qubit 0 leftmost.
fn outcome_bitstring(outcome: usize, width: usize) -> String {
    (0..width)
        .map(|q| if outcome & (1 << q) != 0 { '1' } else { '0' })
        .collect()
}
