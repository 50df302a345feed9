//! One-way password hashing and verification.
//!
//! New credentials are hashed with bcrypt. Verification also accepts the
//! legacy `"{salt}${hex_digest}"` format (PBKDF2-HMAC-SHA256, fixed iteration
//! count) so credentials stored by earlier deployments keep working. The
//! legacy path is only tried when the stored value does not parse as a bcrypt
//! hash; anything unparseable verifies as `false`, never as an error.

use bcrypt::{hash, verify, DEFAULT_COST};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Iteration count used by the legacy PBKDF2 scheme.
const LEGACY_PBKDF2_ITERATIONS: u32 = 100_000;

/// Hashes a password with bcrypt. Each call salts freshly, so equal passwords
/// never produce equal outputs.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verifies a password against a stored hash, bcrypt first and the legacy
/// PBKDF2 format as a fallback.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match verify(password, stored_hash) {
        Ok(matched) => matched,
        // Not a bcrypt hash; the stored value may be in the legacy format.
        Err(_) => verify_legacy(password, stored_hash),
    }
}

fn verify_legacy(password: &str, stored_hash: &str) -> bool {
    let Some((salt, digest_hex)) = stored_hash.split_once('$') else {
        log::debug!("stored hash matches neither bcrypt nor the legacy format");
        return false;
    };
    if salt.is_empty() || digest_hex.is_empty() {
        log::debug!("legacy hash has an empty salt or digest");
        return false;
    }
    let Ok(expected) = hex::decode(digest_hex) else {
        log::debug!("legacy hash digest is not valid hex");
        return false;
    };
    let Some(derived) = pbkdf2_sha256(
        password.as_bytes(),
        salt.as_bytes(),
        LEGACY_PBKDF2_ITERATIONS,
    ) else {
        return false;
    };
    derived.as_slice() == expected.as_slice()
}

/// PBKDF2-HMAC-SHA256 for a single 32-byte output block, which is all the
/// legacy format ever stored.
fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32) -> Option<[u8; 32]> {
    let base = HmacSha256::new_from_slice(password).ok()?;

    let mut mac = base.clone();
    mac.update(salt);
    mac.update(&1u32.to_be_bytes());
    let mut block: [u8; 32] = mac.finalize().into_bytes().into();

    let mut output = block;
    for _ in 1..iterations {
        let mut mac = base.clone();
        mac.update(&block);
        block = mac.finalize().into_bytes().into();
        for (out_byte, block_byte) in output.iter_mut().zip(block.iter()) {
            *out_byte ^= block_byte;
        }
    }
    Some(output)
}
