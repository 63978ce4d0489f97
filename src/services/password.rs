//! One-way salted hashing for passwords and issued API tokens.
//!
//! Argon2 is CPU-bound, so the async entry points run on the blocking pool.

use anyhow::{Context, Result, anyhow};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task;

use crate::config::SecurityConfig;

#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new(security: &SecurityConfig) -> Result<Self> {
        let params = Params::new(
            security.argon2_memory_cost_kib,
            security.argon2_time_cost,
            security.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow!("Invalid argon2 parameters: {e}"))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow!("Hashing failed: {e}"))
    }

    /// Returns false for a mismatch and for a hash that cannot be parsed.
    #[must_use]
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        PasswordHash::new(hash).is_ok_and(|parsed| {
            self.argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
    }

    pub async fn hash_password(&self, password: &str) -> Result<String> {
        self.hash_blocking(password.to_string()).await
    }

    pub async fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        self.verify_any_blocking(password.to_string(), vec![hash.to_string()])
            .await
    }

    /// Hashes a freshly signed token for storage. Only the hash is persisted.
    pub async fn hash_api_key(&self, token: &str) -> Result<String> {
        self.hash_blocking(token.to_string()).await
    }

    /// True when `token` matches any of `stored_hashes`.
    pub async fn verify_api_key(&self, token: &str, stored_hashes: Vec<String>) -> Result<bool> {
        self.verify_any_blocking(token.to_string(), stored_hashes)
            .await
    }

    async fn hash_blocking(&self, plaintext: String) -> Result<String> {
        let hasher = self.clone();
        task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .context("Hashing task panicked")?
    }

    async fn verify_any_blocking(&self, plaintext: String, hashes: Vec<String>) -> Result<bool> {
        let hasher = self.clone();
        task::spawn_blocking(move || hashes.iter().any(|hash| hasher.verify(&plaintext, hash)))
            .await
            .context("Verification task panicked")
    }
}

/// Compares stored credential material without short-circuiting on the first differing byte.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
