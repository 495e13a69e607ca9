//! Password hashing component
//!
//! One-way transformation of a plaintext secret into a printable digest
//! stored in place of the password. Deterministic by contract, so repeated
//! hashes of the same secret compare equal.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

/// Stateless password hasher: SHA-256 over the UTF-8 bytes of the secret,
/// encoded as standard base64. The secret is neither retained nor logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret into a fixed-length printable digest
    pub fn hash(&self, secret: &str) -> String {
        let digest = Sha256::digest(secret.as_bytes());
        STANDARD.encode(digest)
    }
}
