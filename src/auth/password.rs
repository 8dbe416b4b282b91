//! Password hashing

use crate::error::Result;

/// Hash a plaintext password with bcrypt
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String> {
    Ok(bcrypt::hash(plaintext, cost)?)
}

/// Verify a plaintext password against a stored hash.
/// Fails closed: a malformed hash counts as a mismatch.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}
