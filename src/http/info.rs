//! Informational endpoints: `/` and `/health`.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// RFC 3339, UTC.
    pub timestamp: String,
    /// Seconds since the server was built.
    pub uptime: f64,
}

pub async fn get_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let endpoints = ["/health".to_string()]
        .into_iter()
        .chain(state.providers.providers().map(|p| p.path()))
        .collect();

    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        endpoints,
    })
}

pub async fn get_health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK",
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
