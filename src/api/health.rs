//! Health and status endpoints

use axum::{http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::Serialize;

use crate::api::types::Json;

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
}

/// Service overview listing the public endpoints
#[derive(Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub endpoints: Vec<&'static str>,
}

/// Returns 200 while the process is serving requests
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Ok,
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(response))
}

/// Liveness probe
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn api_status() -> impl IntoResponse {
    Json(StatusResponse {
        message: format!("{} is running", SERVICE_NAME),
        endpoints: vec![
            "POST /api/auth/register",
            "POST /api/auth/login",
            "GET /api/auth/me",
            "GET /health",
        ],
    })
}
