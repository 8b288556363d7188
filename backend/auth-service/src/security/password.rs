/// Password hashing and verification using Argon2id
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher as _, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
};
use tracing::warn;

use crate::error::{AuthError, Result};

/// Argon2id hasher with a fixed cost.
///
/// CPU-bound: call from `tokio::task::spawn_blocking`.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher {
    /// Hasher with explicit cost (memory in KiB, iterations, lanes).
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::Hashing(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt.
    /// Returns a PHC string suitable for storage.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .to_string();

        Ok(hash)
    }

    /// Check `candidate` against a stored hash in constant time.
    ///
    /// `Ok(false)` on mismatch; `MalformedHash` if `hashed` cannot be parsed or
    /// names an algorithm this hasher does not support.
    pub fn verify(&self, hashed: &str, candidate: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hashed).map_err(|_| AuthError::MalformedHash)?;

        match self.argon2().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => {
                warn!(error = %e, "Stored password hash rejected by verifier");
                Err(AuthError::MalformedHash)
            }
        }
    }
}
