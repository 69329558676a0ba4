//! Password hashing with Argon2id.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

/// Raised when a password cannot be hashed. Never includes the password.
#[derive(Debug, Clone, Error)]
#[error("password hashing failed")]
pub struct PasswordHashError;

/// Hashes and verifies passwords.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;

    /// Returns false for both wrong passwords and malformed stored hashes.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id hasher with the library's default parameters.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| PasswordHashError)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_rejects() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("P@ssw0rd1").unwrap();

        assert!(hasher.verify("P@ssw0rd1", &hash));
        assert!(!hasher.verify("wrong", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = Argon2PasswordHasher::new();
        assert_ne!(
            hasher.hash("P@ssw0rd1").unwrap(),
            hasher.hash("P@ssw0rd1").unwrap()
        );
    }

    #[test]
    fn malformed_stored_hash_fails_closed() {
        let hasher = Argon2PasswordHasher::new();
        assert!(!hasher.verify("P@ssw0rd1", "not-a-hash"));
    }
}
