//! HTTP surface for the qdispatch execution engine.
//!
//! JSON in, JSON out; no static assets. Routes:
//!
//! - `POST /api/execute` — validate and dispatch a circuit, returning the
//!   normalized counts (or a structured error).
//! - `GET /api/backends` — registered backends with live reachability.
//! - `GET /api/health` — liveness.

pub mod api;
pub mod dto;
pub mod error;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::create_router;
pub use state::AppState;
