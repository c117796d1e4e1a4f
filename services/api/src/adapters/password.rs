//! services/api/src/adapters/password.rs
//!
//! Argon2 implementation of the `PasswordHasher` port.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString},
    Argon2,
};
use wellness_core::ports::{PasswordHasher, PortError, PortResult};

/// Hashes passwords with Argon2 defaults and a fresh random salt per hash.
/// The output is a self-describing PHC string, so parameters travel with the hash.
#[derive(Default, Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> PortResult<String> {
        use argon2::password_hash::PasswordHasher as _;

        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PortError::Unexpected(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, password_hash: &str) -> PortResult<bool> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| PortError::Unexpected(format!("Failed to parse password hash: {}", e)))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
