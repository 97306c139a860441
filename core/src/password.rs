//! Password digests.

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of a plaintext password.
///
/// The plaintext never reaches storage; credential checks compare digests.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PasswordHash([u8; 32]);

impl PasswordHash {
    /// Hash a plaintext password.
    #[must_use]
    pub fn from_plaintext(password: &str) -> Self {
        Self(Sha256::digest(password.as_bytes()).into())
    }

    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}
