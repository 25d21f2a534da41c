//! Remote queued cloud service backend.
//!
//! Talks to a quantum-cloud REST API with the usual queued-job shape:
//! submit a circuit, receive a job handle, poll its status, fetch the
//! result once the remote side reports completion, cancel best-effort.
//! Result payloads arrive either as bitstring counts or as a probability
//! vector; both are passed through unchanged for the dispatch layer to
//! normalize.
//!
//! Credentials (API token, endpoint) come from process configuration; the
//! backend is only constructed when they are present.

pub mod api;
pub mod backend;
pub mod error;

pub use api::{CloudClient, SubmitRequest};
pub use backend::{CloudBackend, CloudConfig};
pub use error::{CloudError, CloudResult};
