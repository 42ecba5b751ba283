use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use std::sync::LazyLock;

use crate::error::{AuthError, Result};

/// Hash a password using Argon2 with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashingError(e.to_string()))
}

/// Verify a password against a stored hash.
///
/// A malformed hash and a wrong password both yield `PasswordMismatch`.
pub fn verify_password(password: &str, hash: &str) -> Result<()> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordMismatch)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::PasswordMismatch)
}

/// Hash verified when a login names an unknown email
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("orderin-unknown-account").ok());

/// Run a verification that always fails against the dummy hash
pub(crate) fn verify_dummy(password: &str) -> Result<()> {
    match DUMMY_HASH.as_deref() {
        Some(hash) => verify_password(password, hash).and(Err(AuthError::PasswordMismatch)),
        None => Err(AuthError::PasswordMismatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "my_secure_password";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).is_ok());
        assert_eq!(
            verify_password("wrong_password", &hash),
            Err(AuthError::PasswordMismatch)
        );
    }

    #[test]
    fn test_different_hashes() {
        let password = "same_password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // Different salts should produce different hashes
        assert_ne!(hash1, hash2);

        assert!(verify_password(password, &hash1).is_ok());
        assert!(verify_password(password, &hash2).is_ok());
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert_eq!(
            verify_password("secret1", "not-a-phc-string"),
            Err(AuthError::PasswordMismatch)
        );
    }

    #[test]
    fn test_dummy_hash_uses_default_params() {
        let dummy = DUMMY_HASH.as_deref().unwrap();
        let real = hash_password("secret1").unwrap();

        let dummy = PasswordHash::new(dummy).unwrap();
        let real = PasswordHash::new(&real).unwrap();
        assert_eq!(dummy.algorithm, real.algorithm);
        assert_eq!(dummy.params, real.params);
    }

    #[test]
    fn test_verify_dummy_always_fails() {
        assert_eq!(verify_dummy("orderin-unknown-account"), Err(AuthError::PasswordMismatch));
        assert_eq!(verify_dummy("secret1"), Err(AuthError::PasswordMismatch));
    }
}
