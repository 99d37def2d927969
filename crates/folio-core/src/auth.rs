//! # Shop Password
//!
//! Argon2 hashing for the login gate. The stored value is a PHC string
//! (`$argon2id$v=19$...`) carrying its own random salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};

use crate::error::{CoreError, CoreResult};

/// Hash a password for storage.
pub fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::PasswordHash(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Check a password against a stored hash.
///
/// A mismatch is `InvalidCredentials`; a corrupt hash is `PasswordHash`.
pub fn verify_password(password: &str, stored_hash: &str) -> CoreResult<()> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| CoreError::PasswordHash(format!("Stored hash is invalid: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| CoreError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("scope").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("scope", &hash).is_ok());
        assert!(matches!(
            verify_password("scopes", &hash),
            Err(CoreError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("scope").unwrap();
        let b = hash_password("scope").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_hash() {
        assert!(matches!(
            verify_password("scope", "not-a-hash"),
            Err(CoreError::PasswordHash(_))
        ));
    }
}
