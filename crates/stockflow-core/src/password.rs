//! Password hashing and verification.
//!
//! Hashes are bcrypt digests: salted, self-contained (algorithm, cost and
//! salt are embedded in the string) and irreversible. The work factor is
//! configurable through [`PasswordHasher::new`]; [`DEFAULT_COST`] is 12.
//!
//! bcrypt only reads the first [`MAX_PASSWORD_BYTES`] bytes of its input.
//! Longer passwords are refused when hashing and never match when verifying,
//! so two passwords sharing a 72-byte prefix stay distinct.
//!
//! Plaintext passwords are never logged and never appear in error messages.

use crate::errors::AuthError;

/// Default bcrypt work factor (2^12 rounds).
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Longest password, in bytes, bcrypt can hash without truncation.
pub const MAX_PASSWORD_BYTES: usize = 72;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    /// Creates a hasher with the given work factor, clamped to the range bcrypt accepts.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Fails with an internal error when `plaintext` exceeds [`MAX_PASSWORD_BYTES`].
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::non_truncating_hash(plaintext, self.cost)
            .map_err(|e| AuthError::internal(anyhow::anyhow!("Failed to hash password: {}", e)))
    }

    /// Returns `Ok(false)` on mismatch, including a `plaintext` too long to
    /// have been hashed. A malformed stored hash is an internal error.
    pub fn verify(&self, hash: &str, plaintext: &str) -> Result<bool, AuthError> {
        match bcrypt::non_truncating_verify(plaintext, hash) {
            Ok(matches) => Ok(matches),
            Err(bcrypt::BcryptError::Truncation(_)) => Ok(false),
            Err(e) => Err(AuthError::internal(anyhow::anyhow!(
                "Failed to verify password: {}",
                e
            ))),
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_async(&self, plaintext: String) -> Result<String, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(AuthError::internal)?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    pub async fn verify_async(&self, hash: String, plaintext: String) -> Result<bool, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &plaintext))
            .await
            .map_err(AuthError::internal)?
    }
}
