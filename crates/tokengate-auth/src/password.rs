//! Password hashing
//!
//! Passwords are stored as PHC strings, which embed the algorithm, its cost
//! parameters and the salt. Verification reads those back out of the stored
//! hash, so hashes written under an older scheme keep verifying after the
//! configured scheme changes.

use std::fmt;
use std::str::FromStr;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use tracing::warn;

use crate::error::AuthError;

/// Password hashing scheme selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    #[default]
    Argon2id,
    Argon2i,
    Argon2d,
}

impl PasswordScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordScheme::Argon2id => "argon2id",
            PasswordScheme::Argon2i => "argon2i",
            PasswordScheme::Argon2d => "argon2d",
        }
    }

    fn algorithm(&self) -> Algorithm {
        match self {
            PasswordScheme::Argon2id => Algorithm::Argon2id,
            PasswordScheme::Argon2i => Algorithm::Argon2i,
            PasswordScheme::Argon2d => Algorithm::Argon2d,
        }
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PasswordScheme {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "argon2id" => Ok(PasswordScheme::Argon2id),
            "argon2i" => Ok(PasswordScheme::Argon2i),
            "argon2d" => Ok(PasswordScheme::Argon2d),
            _ => Err(AuthError::PasswordHash(format!(
                "Unknown password scheme: {}",
                s
            ))),
        }
    }
}

/// One-way password hasher
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    scheme: PasswordScheme,
}

impl PasswordHasher {
    pub fn new(scheme: PasswordScheme) -> Self {
        Self { scheme }
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(self.scheme.algorithm(), Version::V0x13, Params::default());

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Check a plaintext password against a stored hash
    ///
    /// A mismatch is `false`, not an error. A stored hash that cannot be
    /// parsed never matches.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Stored password hash is malformed: {}", e);
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::default();
        let hash = hasher.hash("correct horse").unwrap();

        assert!(hasher.verify("correct horse", &hash));
        assert!(!hasher.verify("wrong horse", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::default();
        let first = hasher.hash("secret").unwrap();
        let second = hasher.hash("secret").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("secret", &first));
        assert!(hasher.verify("secret", &second));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hasher = PasswordHasher::default();
        let hash = hasher.hash("plaintext-password").unwrap();

        assert!(!hash.contains("plaintext-password"));
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_malformed_hash_is_false() {
        let hasher = PasswordHasher::default();

        assert!(!hasher.verify("secret", "invalid_hash"));
        assert!(!hasher.verify("secret", ""));
        // A plaintext accidentally stored in place of a hash never matches
        assert!(!hasher.verify("secret", "secret"));
    }

    #[test]
    fn test_verify_uses_scheme_embedded_in_hash() {
        let old = PasswordHasher::new(PasswordScheme::Argon2i);
        let hash = old.hash("secret").unwrap();
        assert!(hash.starts_with("$argon2i$"));

        let current = PasswordHasher::new(PasswordScheme::Argon2id);
        assert!(current.verify("secret", &hash));
        assert!(!current.verify("other", &hash));
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("argon2id".parse::<PasswordScheme>().unwrap(), PasswordScheme::Argon2id);
        assert_eq!("Argon2i".parse::<PasswordScheme>().unwrap(), PasswordScheme::Argon2i);
        assert_eq!("argon2d".parse::<PasswordScheme>().unwrap(), PasswordScheme::Argon2d);
        assert!("bcrypt".parse::<PasswordScheme>().is_err());
    }
}
