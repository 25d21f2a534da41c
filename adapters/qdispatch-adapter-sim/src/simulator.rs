//! Simulator backend implementation.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use qdispatch_circuit::Circuit;
use qdispatch_hal::{
    Backend, BackendAvailability, BackendKind, Capabilities, ExecutionResult, HalError, HalResult,
    Job, JobId, JobStatus,
};

use crate::statevector::Statevector;

/// Default qubit limit; 2^24 amplitudes is already 256 MiB.
const DEFAULT_MAX_QUBITS: u32 = 24;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local statevector simulator backend.
///
/// Jobs complete synchronously inside `submit()`; `status` and `result`
/// read the stored outcome.
pub struct SimulatorBackend {
    name: String,
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
}

impl SimulatorBackend {
    /// Create a simulator with the default qubit limit.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with a custom qubit limit.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            name: "simulator".to_string(),
            capabilities: Capabilities::simulator(max_qubits),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Run the simulation synchronously.
    #[instrument(skip(self, circuit))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();
        debug!(
            "Starting simulation: {} qubits, {} gates, {} shots",
            circuit.num_qubits(),
            circuit.gates().len(),
            shots
        );

        let counts = Statevector::run(circuit, shots);

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        ExecutionResult::from_counts(counts, shots).with_execution_time(elapsed.as_millis() as u64)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if !self.capabilities.accepts_qubits(circuit.num_qubits()) {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but the simulator only supports {}",
                circuit.num_qubits(),
                self.capabilities.max_qubits
            )));
        }
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "Requested {} shots but the simulator accepts 1..={}",
                shots, self.capabilities.max_shots
            )));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let result = self.run_simulation(circuit, shots);

        let job = Job::new(job_id.clone(), shots).with_status(JobStatus::Completed);
        {
            let mut jobs = self
                .jobs
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            jobs.insert(
                job_id.0.clone(),
                SimJob {
                    job,
                    result: Some(result),
                },
            );
        }

        debug!("Submitted job: {}", job_id);
        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        jobs.get(&job_id.0)
            .and_then(|j| j.result.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match jobs.get_mut(&job_id.0) {
            Some(sim_job) => {
                // Simulator jobs are terminal by the time submit() returns,
                // so cancellation only applies to a job that never ran.
                if !sim_job.job.status.is_terminal() {
                    sim_job.job = sim_job.job.clone().with_status(JobStatus::Cancelled);
                }
                Ok(())
            }
            None => Err(HalError::JobNotFound(job_id.0.clone())),
        }
    }
}
