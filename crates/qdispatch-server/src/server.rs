//! Axum server setup and routing.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/backends", get(api::backends::list_backends))
        .route("/execute", post(api::execute::execute));

    Router::new()
        .nest("/api", api_routes)
        // The circuit editor is served separately; allow it to call in.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use qdispatch_adapter_sim::SimulatorBackend;
    use qdispatch_dispatch::{DispatchConfig, Dispatcher};
    use qdispatch_hal::BackendRegistry;

    fn test_server() -> TestServer {
        let mut registry = BackendRegistry::new();
        registry.register(Arc::new(SimulatorBackend::new()));
        let dispatcher = Dispatcher::new(Arc::new(registry), DispatchConfig::default());
        let state = Arc::new(AppState::with_dispatcher(dispatcher));
        TestServer::new(create_router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let server = test_server();
        let response = server.get("/api/health").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_list_backends() {
        let server = test_server();
        let response = server.get("/api/backends").await;
        response.assert_status_ok();

        let body: Value = response.json();
        let backends = body.as_array().unwrap();
        assert_eq!(backends.len(), 1);
        assert_eq!(backends[0]["id"], "simulator");
        assert_eq!(backends[0]["kind"], "local");
        assert_eq!(backends[0]["reachable"], true);
    }

    #[tokio::test]
    async fn test_execute_bell_circuit() {
        let server = test_server();
        let response = server
            .post("/api/execute")
            .json(&json!({
                "num_qubits": 2,
                "gates": [
                    {"name": "h", "qubits": [0]},
                    {"name": "cx", "qubits": [0, 1]}
                ],
                "measurements": [0, 1],
                "shots": 1000
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["backend_used"], "simulator");
        assert_eq!(body["shots"], 1000);

        let total: u64 = body["counts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| {
                let bitstring = entry["bitstring"].as_str().unwrap();
                assert!(bitstring == "00" || bitstring == "11");
                entry["count"].as_u64().unwrap()
            })
            .sum();
        assert_eq!(total, 1000);
    }

    #[tokio::test]
    async fn test_execute_unknown_gate_is_bad_request() {
        let server = test_server();
        let response = server
            .post("/api/execute")
            .json(&json!({
                "num_qubits": 1,
                "gates": [{"name": "warp", "qubits": [0]}]
            }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_execute_oversized_circuit_is_capacity_error() {
        let server = test_server();
        let response = server
            .post("/api/execute")
            .json(&json!({
                "num_qubits": 100,
                "gates": []
            }))
            .await;

        response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["error"], "capacity_error");
    }
}
