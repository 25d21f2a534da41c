//! qdispatch backend abstraction layer.
//!
//! This crate provides the unified interface the dispatch engine uses to
//! talk to execution backends, whether in-process simulators or remote
//! queued cloud services:
//!
//! - A common [`Backend`] trait covering the full job lifecycle
//!   (submit, status, result, cancel, liveness).
//! - [`Capabilities`] and [`BackendDescriptor`] to describe what a backend
//!   can accept.
//! - A [`BackendRegistry`] that preserves registration order and refreshes
//!   per-backend reachability through bounded-timeout probes.
//! - Unified result handling via [`ExecutionResult`], [`OutputPayload`],
//!   and [`Counts`].
//!
//! # Contract
//!
//! The lifecycle every backend implements:
//!
//! ```text
//!   capabilities() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)      (async)      (async)
//! ```
//!
//! - `capabilities()` is synchronous and infallible; a backend that cannot
//!   report capabilities without I/O is not correctly initialized.
//! - `submit()` returns a [`JobId`] with initial status `Queued`. Local
//!   simulators may complete the job before `submit()` returns.
//! - `result()` is only valid once `status()` reports `Completed`.
//! - `cancel()` is best-effort; callers must not depend on it succeeding.

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod registry;
pub mod result;

pub use backend::{Backend, BackendAvailability};
pub use capability::{BackendDescriptor, BackendId, BackendKind, Capabilities};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionResult, OutputPayload};
