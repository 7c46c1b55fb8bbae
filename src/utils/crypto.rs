//! HMAC signing, constant-time comparison and random tokens

use crate::utils::error::{Result, StorefrontError};
use base64::{Engine as _, engine::general_purpose};
use hmac::{Hmac, Mac, digest::KeyInit as HmacKeyInit};
use rand::{Rng, distributions::Alphanumeric};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Create a hex-encoded HMAC-SHA256 signature
pub fn sign(secret: &str, data: &str) -> Result<String> {
    let mut mac = <HmacSha256 as HmacKeyInit>::new_from_slice(secret.as_bytes())
        .map_err(|e| StorefrontError::Crypto(format!("Invalid HMAC key: {}", e)))?;

    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a hex-encoded HMAC-SHA256 signature
pub fn verify(secret: &str, data: &str, signature: &str) -> Result<bool> {
    let expected = sign(secret, data)?;
    Ok(constant_time_eq(&expected, signature))
}

/// Constant-time string comparison
pub(crate) fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.bytes().zip(b.bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}

/// Generate an alphanumeric token of the given length
pub fn generate_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generate a URL-safe secret with 48 bytes of entropy
pub fn generate_secret() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..48).map(|_| rng.r#gen()).collect();
    general_purpose::URL_SAFE_NO_PAD.encode(&bytes)
}
