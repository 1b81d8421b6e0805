//! Password hashing with Argon2
//!
//! Hashes are stored as PHC strings, so the salt and parameters travel with
//! the hash.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Check a plaintext password against a stored hash.
///
/// A mismatch is `Ok(false)`; only a corrupt stored hash is an error.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn hash_then_verify() {
        let hash = assert_ok!(hash_password("Abcd123!"));
        assert!(hash.starts_with("$argon2"));
        assert!(assert_ok!(verify_password("Abcd123!", &hash)));
        assert!(!assert_ok!(verify_password("abcd123!", &hash)));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let first = hash_password("Abcd123!").unwrap();
        let second = hash_password("Abcd123!").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn whitespace_is_part_of_the_password() {
        let hash = hash_password(" Abcd123! ").unwrap();
        assert!(!verify_password("Abcd123!", &hash).unwrap());
    }

    #[test]
    fn corrupt_hash_is_an_error() {
        assert_err!(verify_password("Abcd123!", "not-a-phc-string"));
    }
}
