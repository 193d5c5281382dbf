//! Password digest
//!
//! Passwords are stored as a lowercase hex SHA-256 digest. The digest is
//! unsalted so a login can be checked with a single exact-match lookup.

use sha2::{Digest, Sha256};

/// Length of a digest produced by [`digest_password`]
#[cfg(test)]
pub(crate) const DIGEST_LEN: usize = 64;

/// Hex SHA-256 of the UTF-8 password bytes
pub fn digest_password(plain: &str) -> String {
    hex::encode(Sha256::digest(plain.as_bytes()))
}
