//! Health endpoint.

use axum::Json;

/// GET /api/health - Liveness check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
