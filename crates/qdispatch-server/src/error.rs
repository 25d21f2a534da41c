//! Error types for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use qdispatch_dispatch::{AttemptRecord, DispatchError};

/// API error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    attempts: Option<Vec<AttemptRecord>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, attempts) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", None),
            ApiError::Dispatch(e) => {
                let status = match e {
                    DispatchError::Validation(_) => StatusCode::BAD_REQUEST,
                    DispatchError::Capacity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    DispatchError::Cancelled => StatusCode::INTERNAL_SERVER_ERROR,
                    DispatchError::AllBackendsExhausted { .. } => StatusCode::BAD_GATEWAY,
                };
                let attempts = match e {
                    DispatchError::AllBackendsExhausted { attempts } => Some(attempts.clone()),
                    _ => None,
                };
                (status, e.kind(), attempts)
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            attempts,
        });

        (status, body).into_response()
    }
}
