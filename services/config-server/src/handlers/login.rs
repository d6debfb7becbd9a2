//! Token issuance

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{Envelope, LoginRequest, TokenResponse},
    observability::{metrics, Logger},
    AppState,
};

/// POST /api/auth/login - Exchange username/password for a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Envelope<TokenResponse>>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::Validation(e.body_text()))?;

    if !state.login_limiter.check(&format!("login:{}", req.username)).await {
        state.metrics.increment(metrics::LOGIN_RATE_LIMITED, 1).await;
        Logger::login_event(&req.username, "rate_limited");
        return Err(ApiError::TooManyRequests);
    }

    // Argon2 verification is CPU bound; keep it off the async workers.
    let accounts = state.accounts.clone();
    let username = req.username.clone();
    let password = req.password;
    let verified = tokio::task::spawn_blocking(move || accounts.verify(&username, &password))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if verified.is_err() {
        state.metrics.increment(metrics::LOGIN_FAILED, 1).await;
        Logger::login_event(&req.username, "invalid_credentials");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state
        .jwt
        .issue(&req.username)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    state.metrics.increment(metrics::LOGIN_SUCCESS, 1).await;
    Logger::login_event(&req.username, "success");

    Ok(Json(Envelope::new(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.ttl_secs(),
    })))
}
