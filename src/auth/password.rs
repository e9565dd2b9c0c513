//! Password hashing with Argon2id
//!
//! Hashes are stored as PHC strings, which carry the salt and parameters, so
//! verification needs nothing besides the stored hash.

use argon2::{
    Argon2, PasswordHash, PasswordHasher as ArgonPasswordHasher, PasswordVerifier,
    password_hash::{Error as ArgonError, SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Invalid hash format: {0}")]
    InvalidHashFormat(String),
}

#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hashes a plaintext password with a fresh random salt
    #[instrument(skip_all)]
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        debug!("Hashed password");
        Ok(hash.to_string())
    }

    /// Checks a plaintext password against a stored PHC hash
    ///
    /// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
    #[instrument(skip_all)]
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            warn!("Stored password hash is malformed");
            PasswordError::InvalidHashFormat(e.to_string())
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(ArgonError::Password) => Ok(false),
            Err(e) => Err(PasswordError::InvalidHashFormat(e.to_string())),
        }
    }
}
