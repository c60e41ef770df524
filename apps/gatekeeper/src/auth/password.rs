//! bcrypt password hashing.
//!
//! Plaintexts and hashes are never logged. All hashing runs on the blocking
//! pool under a timeout so a slow cost factor cannot stall a worker thread.

use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinError;

use crate::state::security_config::SecurityConfig;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password does not match")]
    Mismatch,
    #[error("stored hash is not a valid bcrypt hash: {0}")]
    MalformedHash(String),
    #[error("hashing failed: {0}")]
    Hashing(#[source] bcrypt::BcryptError),
    #[error("hashing exceeded {0:?}")]
    TimedOut(Duration),
    #[error("hashing worker failed: {0}")]
    Worker(#[from] JoinError),
}

// Salt and digest of a hash nobody can log in with; only the cost is swapped in.
const DECOY_BODY: &str = "CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW";

/// Hash with a fresh random salt. Same input gives a different hash each call.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, CredentialError> {
    bcrypt::hash(plaintext, cost).map_err(CredentialError::Hashing)
}

/// Accepts `$2a$`, `$2b$` and `$2y$` hashes.
pub fn verify_password(stored_hash: &str, plaintext: &str) -> Result<(), CredentialError> {
    match bcrypt::verify(plaintext, stored_hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CredentialError::Mismatch),
        Err(e) => Err(CredentialError::MalformedHash(e.to_string())),
    }
}

fn decoy_hash(cost: u32) -> String {
    format!("$2b${cost:02}${DECOY_BODY}")
}

/// Async front for [`hash_password`] and [`verify_password`].
#[derive(Debug, Clone, Copy)]
pub struct CredentialVerifier {
    cost: u32,
    timeout: Duration,
}

impl CredentialVerifier {
    pub fn new(cost: u32, timeout: Duration) -> Self {
        Self { cost, timeout }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.bcrypt_cost, security.hash_timeout)
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub async fn hash(&self, plaintext: String) -> Result<String, CredentialError> {
        let cost = self.cost;
        self.run(move || hash_password(&plaintext, cost)).await
    }

    pub async fn verify(&self, stored_hash: String, plaintext: String) -> Result<(), CredentialError> {
        self.run(move || verify_password(&stored_hash, &plaintext))
            .await
    }

    /// Spend the same bcrypt work as [`Self::verify`] when there is no stored
    /// hash to check, so a missing account costs as much as a wrong password.
    /// Always ends in [`CredentialError::Mismatch`] or an infrastructure error.
    pub async fn verify_decoy(&self, plaintext: String) -> Result<(), CredentialError> {
        let decoy = decoy_hash(self.cost);
        match self.verify(decoy, plaintext).await {
            Ok(()) => Err(CredentialError::Mismatch),
            Err(e) => Err(e),
        }
    }

    async fn run<T, F>(&self, work: F) -> Result<T, CredentialError>
    where
        F: FnOnce() -> Result<T, CredentialError> + Send + 'static,
        T: Send + 'static,
    {
        let task = tokio::task::spawn_blocking(work);
        match tokio::time::timeout(self.timeout, task).await {
            Ok(joined) => joined?,
            Err(_) => Err(CredentialError::TimedOut(self.timeout)),
        }
    }
}
