//! bcrypt-backed `PasswordHasher`.
//!
//! bcrypt is CPU bound, so both operations run on the blocking pool. The
//! plaintext copy handed to that thread is zeroised on drop.
//!
//! Only the first 72 bytes of input reach bcrypt, so both operations use the
//! non-truncating variants: longer passwords are refused outright rather
//! than silently sharing a hash with their 72-byte prefix.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// bcrypt hasher with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Use `cost` rounds; bcrypt accepts 4 to 31.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

fn join_error(error: tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::hashing(format!("hashing task failed: {error}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::non_truncating_hash(password.as_bytes(), cost))
            .await
            .map_err(join_error)?
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        let outcome =
            tokio::task::spawn_blocking(move || bcrypt::non_truncating_verify(password.as_bytes(), &hash))
                .await
                .map_err(join_error)?;
        match outcome {
            Ok(matches) => Ok(matches),
            // Nothing over 72 bytes was ever hashed, so it cannot match.
            Err(bcrypt::BcryptError::Truncation(_)) => Ok(false),
            Err(err @ (bcrypt::BcryptError::InvalidHash(_) | bcrypt::BcryptError::CostNotAllowed(_))) => {
                Err(PasswordHashError::malformed_hash(err.to_string()))
            }
            Err(other) => Err(PasswordHashError::hashing(other.to_string())),
        }
    }
}
