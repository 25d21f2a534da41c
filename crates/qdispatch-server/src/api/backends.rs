//! Backend listing endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};

use qdispatch_hal::BackendKind;

use crate::dto::BackendInfo;
use crate::state::AppState;

/// GET /api/backends - Registered backends with live reachability.
pub async fn list_backends(State(state): State<Arc<AppState>>) -> Json<Vec<BackendInfo>> {
    let registry = state.dispatcher.registry();

    // Refresh remote reachability so the listing reflects reality, not
    // the last dispatch.
    for descriptor in registry.list() {
        if descriptor.kind == BackendKind::Remote {
            registry.probe(&descriptor.id).await;
        }
    }

    let backends = registry
        .list()
        .into_iter()
        .map(|d| BackendInfo {
            id: d.id.to_string(),
            kind: match d.kind {
                BackendKind::Local => "local".to_string(),
                BackendKind::Remote => "remote".to_string(),
            },
            max_qubits: d.capabilities.max_qubits,
            max_shots: d.capabilities.max_shots,
            requires_credentials: d.capabilities.requires_credentials,
            reachable: d.reachable,
        })
        .collect();

    Json(backends)
}
