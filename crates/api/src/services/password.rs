//! Password hashing.
//!
//! Customer passwords are stored as Argon2id PHC strings with a fresh random
//! salt per hash, so hashing the same password twice yields different output.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Password hashing failed.
#[derive(Debug, Error)]
#[error("password hashing error: {0}")]
pub struct PasswordError(String);

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `PasswordError` if the hasher rejects its parameters or input.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError(e.to_string()))
}

/// Check a password against a stored hash.
///
/// Malformed hashes never verify.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("PasS1234").unwrap();
        assert_ne!(hash, "PasS1234");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("PasS1234", &hash));
        assert!(!verify_password("PasS12345", &hash));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let a = hash_password("PasS1234").unwrap();
        let b = hash_password("PasS1234").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
