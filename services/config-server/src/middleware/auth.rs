//! Authentication middleware for bearer JWT validation
//!
//! Runs in front of every protected route. Requests without a valid token are
//! answered with 401 before any handler (and so any store access) runs.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::error::ApiError;

/// Auth middleware that validates `Authorization: Bearer <token>`
///
/// Attaches the resulting [`crate::auth::AuthContext`] to the request extensions.
pub async fn auth_middleware(
    State(verifier): State<Arc<dyn TokenVerifier>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    let auth_context = verifier.verify(token).map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        ApiError::Unauthorized
    })?;

    request.extensions_mut().insert(auth_context);

    Ok(next.run(request).await)
}
