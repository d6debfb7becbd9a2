//! Authentication: login accounts and bearer token issuance/verification.

mod accounts;
mod jwt;

pub use accounts::{hash_password, Accounts};
pub use jwt::{Claims, JwtService};

use serde::{Deserialize, Serialize};

/// Authenticated caller, attached to request extensions by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub username: String,
}

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("failed to create token: {0}")]
    TokenCreation(String),
    #[error("failed to hash password: {0}")]
    PasswordHash(String),
}

/// Capability the auth middleware needs: turn a bearer token into a caller.
pub trait TokenVerifier: Send + Sync + 'static {
    fn verify(&self, token: &str) -> Result<AuthContext, AuthError>;
}
