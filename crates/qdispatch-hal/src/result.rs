//! Backend execution results.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Measurement counts: bitstring outcome → number of shots that produced it.
///
/// `insert` accumulates, so repeated insertions of the same bitstring
/// increment the count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    inner: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty counts map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.inner.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring` (zero if absent).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.inner.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total(&self) -> u64 {
        self.inner.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check whether no outcomes were recorded.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The most frequent outcome, if any.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.inner
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(k, &v)| (k.as_str(), v))
    }

    /// Iterate over `(bitstring, count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.inner.iter()
    }

    /// Outcomes sorted by descending count, ties broken by bitstring.
    pub fn sorted(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<_> = self
            .inner
            .iter()
            .map(|(k, &v)| (k.clone(), v))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bitstring, count) in iter {
            counts.insert(bitstring, count);
        }
        counts
    }
}

/// Backend-native output shape.
///
/// Remote services report either pre-aggregated bitstring counts or a
/// probability vector over computational-basis outcomes; the dispatch
/// layer normalizes both into [`Counts`] summing to the requested shots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPayload {
    /// Bitstring-keyed counts.
    Counts(Counts),
    /// Probability per outcome, indexed by computational-basis state.
    Probabilities(Vec<f64>),
}

/// Raw result of one job on one backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Backend-native measurement output.
    pub payload: OutputPayload,
    /// Shots the backend actually executed.
    pub shots: u32,
    /// Wall-clock execution time in milliseconds, if reported.
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a result from bitstring counts.
    pub fn from_counts(counts: Counts, shots: u32) -> Self {
        Self {
            payload: OutputPayload::Counts(counts),
            shots,
            execution_time_ms: None,
        }
    }

    /// Create a result from a probability vector.
    pub fn from_probabilities(probabilities: Vec<f64>, shots: u32) -> Self {
        Self {
            payload: OutputPayload::Probabilities(probabilities),
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach the execution time.
    pub fn with_execution_time(mut self, millis: u64) -> Self {
        self.execution_time_ms = Some(millis);
        self
    }
}
