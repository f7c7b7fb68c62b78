//! Password hashing and opaque token helpers.

use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher as _, SaltString};
use rand::Rng;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::OnboardError;
use crate::config::HashingConfig;

/// Slow, salted password hashing.
///
/// Registries call this before any credential touches storage; the plaintext
/// never leaves the registry call that received it.
pub trait PasswordHasher: Send + Sync {
    /// # Errors
    ///
    /// Returns `OnboardError::PasswordHashError` if the parameters are invalid.
    fn hash(&self, password: &str) -> Result<String, OnboardError>;

    /// # Errors
    ///
    /// Returns `OnboardError::PasswordHashError` if `hash` is not a PHC string.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, OnboardError>;
}

/// Argon2id with a fresh random salt per hash.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::from_config(&HashingConfig::default())
    }
}

impl Argon2Hasher {
    #[must_use]
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    #[must_use]
    pub fn from_config(config: &HashingConfig) -> Self {
        Self::new(config.memory_cost, config.time_cost, config.parallelism)
    }

    /// 64 MiB, 3 passes, 4 lanes.
    #[must_use]
    pub fn production() -> Self {
        Self::from_config(&HashingConfig::production())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, OnboardError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| OnboardError::PasswordHashError)?;

        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| OnboardError::PasswordHashError)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, OnboardError> {
        let parsed = PasswordHash::new(hash).map_err(|_| OnboardError::PasswordHashError)?;

        // parameters come from the PHC string, not from self
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Random alphanumeric token of `length` characters (~5.95 bits each).
pub fn generate_token(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
        .collect()
}

/// SHA-256 hex digest used as the storage key for invitation tokens.
///
/// Tokens are high-entropy, so a fast hash is enough; a leaked table does not
/// hand out live tokens.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
