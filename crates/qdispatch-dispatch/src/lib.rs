//! The qdispatch execution-dispatch engine.
//!
//! This crate is the core of qdispatch. Given a validated circuit and a
//! registry of backends, it:
//!
//! 1. picks an ordered preference list of backends to attempt
//!    ([`selector::select_order`]) — local simulators first, the remote
//!    cloud service only when credentials are configured, the service is
//!    reachable, and the circuit fits;
//! 2. runs the circuit on each candidate in turn ([`runner::JobRunner`]),
//!    driving the remote submit → poll → retrieve state machine with a
//!    wait budget and cooperative cancellation;
//! 3. normalizes the backend-native output into one canonical counts
//!    shape ([`normalize::normalize`]);
//! 4. falls back to the next candidate on any per-attempt error,
//!    recording a warning, and surfaces the full attempt history when
//!    every candidate fails ([`orchestrator::Dispatcher`]).
//!
//! Per-attempt errors never cross the dispatch boundary raw: callers see
//! only [`DispatchError::Validation`], [`DispatchError::Capacity`],
//! [`DispatchError::Cancelled`], or
//! [`DispatchError::AllBackendsExhausted`].

pub mod config;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod runner;
pub mod selector;

pub use config::{ChannelPreference, CloudCredentials, DispatchConfig, DEFAULT_QUBIT_CEILING};
pub use error::{AttemptError, AttemptRecord, DispatchError, DispatchResult};
pub use normalize::normalize;
pub use orchestrator::{Dispatcher, NormalizedResult};
pub use runner::{CancelHandle, ExecutionJob, JobEvent, JobRunner, JobState, RunOutcome};
pub use selector::select_order;
