use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthContext, AuthError, TokenVerifier};

/// JWT claims issued on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 token service shared by the login handler and the auth middleware.
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl_secs: u64,
}

impl JwtService {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl_secs: u64) -> Self {
        let issuer = issuer.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            issuer,
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Issue a token for an already authenticated username.
    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_secs as i64,
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

impl TokenVerifier for JwtService {
    fn verify(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = self.decode(token)?;
        Ok(AuthContext {
            username: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(b"test-secret", "config-server", 3600)
    }

    #[test]
    fn test_issue_and_verify() {
        let jwt = service();
        let token = jwt.issue("admin").unwrap();

        let ctx = jwt.verify(&token).unwrap();
        assert_eq!(ctx.username, "admin");

        let claims = jwt.decode(&token).unwrap();
        assert_eq!(claims.iss, "config-server");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = service();
        let now = Utc::now().timestamp();
        let token = jwt
            .encode(&Claims {
                sub: "admin".to_string(),
                iss: "config-server".to_string(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        assert_eq!(jwt.verify(&token).unwrap_err(), AuthError::TokenExpired);
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let other = JwtService::new(b"someone-else", "config-server", 3600);
        let token = other.issue("admin").unwrap();

        assert_eq!(service().verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let other = JwtService::new(b"test-secret", "another-service", 3600);
        let token = other.issue("admin").unwrap();

        assert_eq!(service().verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(service().verify("not.a.jwt").unwrap_err(), AuthError::InvalidToken);
        assert_eq!(service().verify("").unwrap_err(), AuthError::InvalidToken);
    }
}
