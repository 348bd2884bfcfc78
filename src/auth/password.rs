/// Password hashing and verification.
///
/// Passwords are digested with HMAC-SHA512, keyed by a per-user random salt
/// generated at registration and stored next to the digest. Verification
/// recomputes the digest with the stored salt and compares in constant time.

use hmac::{Hmac, Mac};
use rand::{thread_rng, Rng};
use sha2::Sha512;

use crate::error::AppError;

type HmacSha512 = Hmac<Sha512>;

const SALT_LENGTH: usize = 64;

/// Generate a fresh random salt for a new user.
pub fn generate_salt() -> Vec<u8> {
    let mut salt = [0u8; SALT_LENGTH];
    thread_rng().fill(&mut salt[..]);
    salt.to_vec()
}

/// Compute the keyed digest of a password under the given salt.
pub fn hash_password(password: &str, salt: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut mac = HmacSha512::new_from_slice(salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
    mac.update(password.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Recompute the digest with the stored salt and compare against the stored
/// one. `verify_slice` performs the comparison in constant time.
pub fn verify_password(password: &str, salt: &[u8], digest: &[u8]) -> bool {
    let mut mac = match HmacSha512::new_from_slice(salt) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(password.as_bytes());
    mac.verify_slice(digest).is_ok()
}
