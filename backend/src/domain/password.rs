//! Hashed credential material.
//!
//! The hashing scheme itself is delegated to the `argon2` collaborator; the
//! rest of the domain treats a [`CredentialHash`] as an opaque PHC string and
//! only ever asks "does this candidate verify?". The comparison inside
//! `argon2` is constant time, so failure classification never depends on how
//! close a candidate was.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use super::Error;

/// Opaque hashed credential material (a PHC-formatted string).
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap an existing PHC string, e.g. when loading from the store.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// The stored PHC string, for persistence adapters only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialHash(..)")
    }
}

/// Hash a raw password into storable credential material.
pub fn hash_password(password: &str) -> Result<CredentialHash, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| CredentialHash(hash.to_string()))
        .map_err(|err| Error::internal(format!("failed to hash credential: {err}")))
}

/// Verify a candidate password against stored credential material.
///
/// An undecodable stored hash is reported as `false` rather than an error;
/// the caller classifies it as a bad credential, never as a server fault
/// visible to the client.
pub fn verify_password(hash: &CredentialHash, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash.expose()) else {
        tracing::error!("stored credential hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}
