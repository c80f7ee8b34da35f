//! The generic news proxy handler.
//!
//! # Flow
//! ```text
//! GET /api/{provider}?country=..&language=..
//!     → provider table lookup (unknown or disabled → 404)
//!     → params.rs (allow-list coercion)
//!     → provider.rs (upstream URL with key)
//!     → client.rs (one GET with deadline)
//!     → 200 upstream JSON | 401 auth failure | 500 generic error
//! ```

use axum::{
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::time::Instant;

use crate::http::request::RequestIdExt;
use crate::http::response::not_found;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::proxy::client::UpstreamClient;
use crate::proxy::error::ProxyError;
use crate::proxy::params::{NewsQuery, ValidatedParams};
use crate::proxy::provider::ProviderEndpoint;

/// Fetch headlines from one provider with already validated parameters.
pub async fn proxy_news(
    client: &UpstreamClient,
    endpoint: &ProviderEndpoint,
    params: ValidatedParams,
) -> Result<Value, ProxyError> {
    let url = endpoint.upstream_url(params)?;
    client.fetch(endpoint.spec(), url).await
}

/// Axum handler for `/api/{provider}`.
pub async fn news_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let Some(endpoint) = state.providers.get(&name) else {
        return not_found();
    };

    let start_time = Instant::now();
    let request_id = headers.request_id();
    let provider = endpoint.spec().name;
    let params = ValidatedParams::from_query(&NewsQuery::parse(raw_query.as_deref()));

    tracing::debug!(
        request_id = %request_id,
        provider,
        country = params.country,
        language = params.language,
        "Proxying news request"
    );

    let result = proxy_news(&state.upstream, endpoint, params).await;
    metrics::record_upstream(provider, start_time);

    match result {
        Ok(body) => {
            tracing::info!(
                request_id = %request_id,
                provider,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Upstream request succeeded"
            );
            metrics::record_request(provider, 200);
            Json(body).into_response()
        }
        Err(e) => {
            let status = e.status_code();
            match &e {
                ProxyError::UpstreamAuth(_) => tracing::error!(
                    request_id = %request_id,
                    provider,
                    error = %e,
                    "Upstream rejected API key"
                ),
                _ => tracing::warn!(
                    request_id = %request_id,
                    provider,
                    kind = e.kind(),
                    error = %e,
                    "Upstream request failed"
                ),
            }
            metrics::record_request(provider, status.as_u16());
            e.into_response()
        }
    }
}
