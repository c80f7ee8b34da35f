//! Outbound HTTP client for upstream news APIs.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::TimeoutConfig;
use crate::proxy::error::ProxyError;
use crate::proxy::provider::ProviderSpec;

/// Shared upstream client. Cheap to clone; the connection pool is shared.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    max_body_size: usize,
}

impl UpstreamClient {
    /// Build a client whose every request carries the configured deadline.
    /// Bodies larger than `max_body_size` bytes are rejected as malformed.
    pub fn new(timeouts: &TimeoutConfig, max_body_size: usize) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeouts.upstream_ms))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .user_agent(concat!("news-proxy/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, max_body_size })
    }

    /// Issue one GET and return the upstream JSON object.
    pub async fn fetch(&self, spec: &ProviderSpec, url: Url) -> Result<Value, ProxyError> {
        let mut response = self.http.get(url).send().await?;
        let status = response.status();

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_size as u64)
        {
            return Err(self.too_large());
        }
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_body_size {
                return Err(self.too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        let parsed = serde_json::from_slice::<Value>(&bytes);
        if spec.is_auth_failure(status, parsed.as_ref().ok()) {
            return Err(ProxyError::UpstreamAuth(status));
        }
        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus(status));
        }

        match parsed {
            Ok(body @ Value::Object(_)) => Ok(body),
            Ok(_) => Err(ProxyError::Malformed("expected a JSON object".to_string())),
            Err(e) => Err(ProxyError::Malformed(e.to_string())),
        }
    }

    fn too_large(&self) -> ProxyError {
        ProxyError::Malformed(format!("body exceeds {} bytes", self.max_body_size))
    }
}
