//! Health check endpoints for load balancers and monitoring

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::Envelope;
use crate::AppState;

/// Basic health check - fast, no external dependencies
/// Use for load balancer health checks
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness check - verifies both config stores answer
pub async fn readyz(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<ReadinessResponse>>, ApiError> {
    let (checks, all_ok) = store_checks(&state).await;

    if !all_ok {
        tracing::error!("Readiness check failed: {:?}", checks);
        return Err(ApiError::Unavailable);
    }

    Ok(Json(Envelope::new(ReadinessResponse {
        status: "ready".to_string(),
        checks,
    })))
}

/// Detailed health check with store status and request counters
/// Served behind authentication
pub async fn health_detail(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<Envelope<DetailedHealthResponse>>) {
    let (checks, all_ok) = store_checks(&state).await;
    let metrics = state.metrics.snapshot().await;

    let response = DetailedHealthResponse {
        status: if all_ok { "healthy".to_string() } else { "degraded".to_string() },
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
        uptime_secs: metrics.uptime_secs,
        counters: metrics.counters,
    };

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(Envelope::new(response)))
}

async fn store_checks(state: &AppState) -> (Vec<HealthCheck>, bool) {
    let bots = state.bots.ping().await;
    let engines = state.engines.ping().await;
    let all_ok = bots.is_ok() && engines.is_ok();

    let checks = vec![
        HealthCheck::from_result("bot_configs", bots.is_ok()),
        HealthCheck::from_result("engine_configs", engines.is_ok()),
    ];
    (checks, all_ok)
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: Vec<HealthCheck>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    pub status: String,
    pub version: String,
    pub checks: Vec<HealthCheck>,
    pub uptime_secs: u64,
    pub counters: std::collections::HashMap<String, u64>,
}

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
}

impl HealthCheck {
    fn from_result(name: &str, ok: bool) -> Self {
        Self {
            name: name.to_string(),
            status: if ok { "ok".to_string() } else { "error".to_string() },
        }
    }
}
