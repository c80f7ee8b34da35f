//! Minimal client for the news proxy HTTP API.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub status: String,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: String,
    pub uptime: f64,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A proxied reply: status plus the raw JSON body.
#[derive(Debug, Clone)]
pub struct NewsResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl NewsResponse {
    pub fn error(&self) -> Option<ErrorBody> {
        serde_json::from_value(self.body.clone()).ok()
    }
}

pub struct NewsProxyClient {
    client: Client,
    proxy_url: String,
}

impl NewsProxyClient {
    pub fn new(proxy_url: &str) -> Self {
        Self {
            client: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_else(|_| Client::new()),
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn info(&self) -> Result<ServiceInfo, reqwest::Error> {
        self.client
            .get(format!("{}/", self.proxy_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub async fn health(&self) -> Result<Health, reqwest::Error> {
        self.client
            .get(format!("{}/health", self.proxy_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// GET `/api/{provider}` with the given query pairs, whatever the status.
    pub async fn headlines(
        &self,
        provider: &str,
        query: &[(&str, &str)],
    ) -> Result<NewsResponse, reqwest::Error> {
        self.get_json(&format!("/api/{}", provider), query).await
    }

    /// GET any path and decode the JSON body, whatever the status.
    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<NewsResponse, reqwest::Error> {
        let res = self
            .client
            .get(format!("{}{}", self.proxy_url, path))
            .query(query)
            .send()
            .await?;
        let status = res.status();
        let body = res.json().await?;
        Ok(NewsResponse { status, body })
    }
}
