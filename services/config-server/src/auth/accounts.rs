use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::AuthError;

/// Login accounts: username -> argon2 PHC hash.
#[derive(Debug, Clone, Default)]
pub struct Accounts {
    hashes: HashMap<String, String>,
}

impl Accounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with an existing PHC hash string.
    pub fn insert_hash(&mut self, username: impl Into<String>, hash: impl Into<String>) -> Result<(), AuthError> {
        let hash = hash.into();
        PasswordHash::new(&hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        self.hashes.insert(username.into(), hash);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// produce the same error.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let Some(hash) = self.hashes.get(username) else {
            // Unknown users still pay for one argon2 verification.
            if let Some(decoy) = decoy_hash().and_then(|h| PasswordHash::new(h).ok()) {
                let _ = Argon2::default().verify_password(password.as_bytes(), &decoy);
            }
            return Err(AuthError::InvalidCredentials);
        };
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)
    }
}

/// Hash a password with argon2id default parameters and a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash_with(&Argon2::default(), password)
}

/// Default-parameter hash of a throwaway password, verified against when the
/// username is unknown.
static DECOY_HASH: OnceLock<Option<String>> = OnceLock::new();

fn decoy_hash() -> Option<&'static str> {
    DECOY_HASH
        .get_or_init(|| hash_password("decoy-password").ok())
        .as_deref()
}

pub(crate) fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{Algorithm, Params, Version};

    // Cheap parameters keep debug-build tests fast; verification reads them from the hash.
    fn quick_hash(password: &str) -> String {
        let params = Params::new(1024, 1, 1, None).unwrap();
        hash_with(&Argon2::new(Algorithm::Argon2id, Version::V0x13, params), password).unwrap()
    }

    #[test]
    fn test_verify_known_user() {
        let mut accounts = Accounts::new();
        accounts.insert_hash("admin", quick_hash("admin")).unwrap();

        assert!(accounts.verify("admin", "admin").is_ok());
        assert_eq!(accounts.verify("admin", "wrong"), Err(AuthError::InvalidCredentials));
        assert_eq!(accounts.verify("nobody", "admin"), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn test_unknown_user_runs_argon2_against_decoy() {
        let mut accounts = Accounts::new();
        accounts.insert_hash("admin", quick_hash("admin")).unwrap();

        assert_eq!(accounts.verify("ghost", "admin"), Err(AuthError::InvalidCredentials));

        let decoy = DECOY_HASH.get().cloned().flatten().unwrap();
        assert!(decoy.starts_with("$argon2id$"));
        // nobody can log in with the decoy password either
        assert_eq!(
            accounts.verify("ghost", "decoy-password"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_rejects_malformed_hash() {
        let mut accounts = Accounts::new();
        assert!(accounts.insert_hash("admin", "plaintext-password").is_err());
        assert!(accounts.is_empty());
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(quick_hash("same"), quick_hash("same"));
    }
}
