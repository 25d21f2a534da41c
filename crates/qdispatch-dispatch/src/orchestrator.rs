//! Dispatch orchestrator.
//!
//! The top-level entry point: validate the incoming circuit spec, choose
//! the backend order, attempt candidates with fallback, normalize the
//! winning result. One dispatch owns its circuit, its jobs, and its
//! warnings; nothing here is shared across requests except the registry.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument, warn};

use qdispatch_circuit::CircuitSpec;
use qdispatch_hal::{BackendId, BackendKind, BackendRegistry, Counts};

use crate::config::DispatchConfig;
use crate::error::{AttemptError, AttemptRecord, DispatchError, DispatchResult};
use crate::normalize::normalize;
use crate::runner::{CancelHandle, JobRunner};
use crate::selector::select_order;

/// The one response shape callers receive.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedResult {
    /// Backend that actually produced the result.
    pub backend_id: BackendId,
    /// Measurement counts; values sum to `shots`.
    pub counts: Counts,
    /// Shots executed.
    pub shots: u32,
    /// Wall-clock execution time of the winning attempt, in milliseconds.
    pub execution_time_ms: u64,
    /// Ordered notes about the dispatch, e.g. fallbacks taken.
    pub warnings: Vec<String>,
}

/// Top-level dispatch engine.
///
/// Holds the shared backend registry and the process configuration; both
/// are read-only for the lifetime of the process.
pub struct Dispatcher {
    registry: Arc<BackendRegistry>,
    config: DispatchConfig,
    runner: JobRunner,
}

impl Dispatcher {
    /// Create a dispatcher over a registry and configuration.
    pub fn new(registry: Arc<BackendRegistry>, config: DispatchConfig) -> Self {
        let runner = JobRunner::new(&config);
        Self {
            registry,
            config,
            runner,
        }
    }

    /// The dispatch configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The shared backend registry.
    pub fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }

    /// Execute a circuit spec: validate → select → run with fallback →
    /// normalize.
    ///
    /// `override_backend` pins a specific backend to the front of the
    /// attempt order when it is eligible. `cancel` is checked between
    /// remote polls; cancelling aborts the dispatch without producing a
    /// result.
    #[instrument(skip(self, spec, cancel))]
    pub async fn dispatch(
        &self,
        spec: &CircuitSpec,
        override_backend: Option<&BackendId>,
        cancel: &CancelHandle,
    ) -> DispatchResult<NormalizedResult> {
        let circuit = spec.parse_and_validate(self.config.qubit_ceiling)?;
        info!(
            "Dispatching circuit: {} qubits, {} gates, {} shots",
            circuit.num_qubits(),
            circuit.gates().len(),
            circuit.shots()
        );

        // Remote reachability can change between requests; refresh it
        // before selection. Without credentials no remote backend is
        // selectable, so there is nothing to probe.
        if self.config.has_credentials() {
            for descriptor in self.registry.list() {
                if descriptor.kind == BackendKind::Remote {
                    self.registry.probe(&descriptor.id).await;
                }
            }
        }

        let descriptors = self.registry.list();
        let order = select_order(&circuit, &descriptors, &self.config, override_backend);

        if order.is_empty() {
            return Err(DispatchError::Capacity {
                qubits: circuit.num_qubits(),
            });
        }

        let mut warnings = Vec::new();
        if let Some(wanted) = override_backend {
            if order.first() != Some(wanted) {
                warnings.push(format!(
                    "requested backend {wanted} is not eligible for this circuit"
                ));
            }
        }

        let mut attempts: Vec<AttemptRecord> = Vec::new();

        let last = order.len() - 1;
        for (position, backend_id) in order.iter().enumerate() {
            let Some(backend) = self.registry.get(backend_id) else {
                // Registry is append-only, so a selected ID always resolves;
                // defend anyway rather than panic in the dispatch path.
                continue;
            };

            info!("Attempting backend {}", backend_id);
            let started = Instant::now();

            let attempt = self.runner.run(&circuit, backend, cancel).await.and_then(
                |outcome| {
                    let elapsed_ms = outcome
                        .result
                        .execution_time_ms
                        .unwrap_or_else(|| started.elapsed().as_millis() as u64);
                    let counts = normalize(outcome.result, circuit.shots())?;
                    Ok((counts, elapsed_ms))
                },
            );

            match attempt {
                Ok((counts, execution_time_ms)) => {
                    info!("Dispatch succeeded on backend {}", backend_id);
                    return Ok(NormalizedResult {
                        backend_id: backend_id.clone(),
                        counts,
                        shots: circuit.shots(),
                        execution_time_ms,
                        warnings,
                    });
                }
                Err(AttemptError::Cancelled) => {
                    info!("Dispatch cancelled by caller");
                    return Err(DispatchError::Cancelled);
                }
                Err(error) => {
                    warn!("Backend {} failed: {}", backend_id, error);
                    attempts.push(AttemptRecord::new(backend_id.clone(), &error));
                    if position < last {
                        warnings.push(format!("fell back from backend {backend_id}: {error}"));
                    }
                }
            }
        }

        Err(DispatchError::AllBackendsExhausted { attempts })
    }
}
