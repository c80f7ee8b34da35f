//! JSON error responses.
//!
//! # Responsibilities
//! - Shape every error the proxy emits as `{"error": "..."}`
//! - 404 for unknown routes, 500 for panics and expired request deadlines
//!
//! # Design Decisions
//! - Messages are fixed strings; nothing from the request or upstream is
//!   echoed back

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::any::Any;

use crate::proxy::error::FETCH_FAILED_MESSAGE;

pub const NOT_FOUND_MESSAGE: &str = "Endpoint not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

/// Router fallback for unmatched paths and methods.
pub async fn fallback() -> Response {
    not_found()
}

/// Rewrites the request-deadline 408 into the generic fetch failure.
///
/// Only the timeout layer produces a 408; handlers never do.
pub async fn timeout_as_json(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    tracing::warn!("Request deadline expired before the upstream answered");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED_MESSAGE)
}

/// Turns a handler panic into a sanitized 500.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = not_found();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": "Endpoint not found"}));
    }

    #[tokio::test]
    async fn test_panic_body_hides_detail() {
        let response = panic_response(Box::new("boom: key=abc".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"error": "Internal server error"}));
    }

    #[tokio::test]
    async fn test_timeout_becomes_fetch_failure() {
        let response = timeout_as_json(StatusCode::REQUEST_TIMEOUT.into_response()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"error": "Failed to fetch news"}));

        let response = timeout_as_json(not_found()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
