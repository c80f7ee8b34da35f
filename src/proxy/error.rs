//! Proxy error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response::json_error;

pub const AUTH_FAILED_MESSAGE: &str = "Upstream authentication failed";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch news";

/// Everything that can go wrong while proxying one request.
///
/// Variants carry only redacted detail; none of them may hold a URL, since
/// upstream URLs embed the API key.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The upstream rejected our key.
    #[error("upstream rejected credentials (status {0})")]
    UpstreamAuth(StatusCode),

    #[error("upstream request timed out")]
    Timeout,

    /// Connection or protocol failure.
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    /// Non-success status that is not an auth failure.
    #[error("upstream returned status {0}")]
    UpstreamStatus(StatusCode),

    /// Body is not JSON, or not a JSON object.
    #[error("malformed upstream body: {0}")]
    Malformed(String),

    #[error("could not build upstream url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamAuth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::UpstreamAuth(_) => "auth",
            ProxyError::Timeout => "timeout",
            ProxyError::Unreachable(_) => "unreachable",
            ProxyError::UpstreamStatus(_) => "upstream_status",
            ProxyError::Malformed(_) => "malformed",
            ProxyError::InvalidUrl(_) => "invalid_url",
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ProxyError::Timeout;
        }
        // The request URL carries the key.
        let err = err.without_url();
        if err.is_decode() {
            ProxyError::Malformed(err.to_string())
        } else {
            ProxyError::Unreachable(err.to_string())
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = match self {
            ProxyError::UpstreamAuth(_) => AUTH_FAILED_MESSAGE,
            _ => FETCH_FAILED_MESSAGE,
        };
        json_error(self.status_code(), message)
    }
}
