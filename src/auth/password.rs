//! Salted password hashing.
//!
//! Each user gets a random 16-byte salt at registration, stored hex-encoded next
//! to the hash. Verification recomputes bcrypt with that salt and the cost found
//! in the stored hash, then compares the two hashes in constant time.

use bcrypt::{hash_with_salt, Version};

use crate::error::AppError;

pub const SALT_LEN: usize = 16;

/// Returns a fresh random salt, hex-encoded.
pub fn generate_salt() -> String {
    hex::encode(rand::random::<[u8; SALT_LEN]>())
}

pub fn hash_password(password: &str, salt: &str, cost: u32) -> Result<String, AppError> {
    let salt = decode_salt(salt)?;
    let parts = hash_with_salt(password, cost, salt)?;
    Ok(parts.format_for_version(Version::TwoB))
}

/// Checks `password` against a stored hash and salt.
pub fn verify_password(password: &str, salt: &str, stored_hash: &str) -> Result<bool, AppError> {
    let cost = hash_cost(stored_hash)?;
    let candidate = hash_password(password, salt, cost)?;
    Ok(constant_time_eq(candidate.as_bytes(), stored_hash.as_bytes()))
}

/// Spends the same work as a real verification at `cost`, for lookups that
/// found no account.
pub fn dummy_verify(password: &str, cost: u32) {
    let _ = hash_with_salt(password, cost, [0u8; SALT_LEN]);
}

/// Byte comparison whose running time depends only on the input lengths.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn decode_salt(salt: &str) -> Result<[u8; SALT_LEN], AppError> {
    hex::decode(salt)
        .ok()
        .and_then(|bytes| <[u8; SALT_LEN]>::try_from(bytes).ok())
        .ok_or_else(|| AppError::InternalServerError("Stored salt is malformed".into()))
}

// Stored hashes look like `$2b$12$<salt><hash>`.
fn hash_cost(stored_hash: &str) -> Result<u32, AppError> {
    stored_hash
        .split('$')
        .nth(2)
        .and_then(|cost| cost.parse().ok())
        .ok_or_else(|| AppError::InternalServerError("Stored password hash is malformed".into()))
}
