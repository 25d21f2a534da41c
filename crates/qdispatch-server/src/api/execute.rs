//! Circuit execution endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::info;

use qdispatch_dispatch::CancelHandle;
use qdispatch_hal::BackendId;

use crate::dto::{ExecuteRequest, ExecuteResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/execute - Validate and dispatch a circuit.
pub async fn execute(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    info!(
        "Execute request: {} qubits, {} gates",
        request.circuit.num_qubits,
        request.circuit.gates.len()
    );

    let override_backend = request.backend.map(|name| BackendId::new(name));

    let result = state
        .dispatcher
        .dispatch(
            &request.circuit,
            override_backend.as_ref(),
            &CancelHandle::new(),
        )
        .await?;

    Ok(Json(result.into()))
}
