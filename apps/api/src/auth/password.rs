//! Salted PBKDF2-HMAC-SHA256 password hashes and opaque bearer tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 120_000;
const SALT_LEN: usize = 16;
const TOKEN_BYTES: usize = 48;

/// Random salt, hex-encoded for storage.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    hex::encode(salt)
}

/// URL-safe random bearer token (64 characters).
pub fn generate_access_token() -> String {
    let mut raw = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut raw);
    URL_SAFE_NO_PAD.encode(raw)
}

/// Hex digest of `password` under the hex-encoded `salt`.
pub fn hash_password(password: &str, salt_hex: &str) -> anyhow::Result<String> {
    let salt = hex::decode(salt_hex)?;
    Ok(hex::encode(pbkdf2_sha256(
        password.as_bytes(),
        &salt,
        PBKDF2_ITERATIONS,
    )))
}

pub fn verify_password(password: &str, salt_hex: &str, expected_hash: &str) -> bool {
    match hash_password(password, salt_hex) {
        Ok(supplied) => supplied.as_bytes().ct_eq(expected_hash.as_bytes()).into(),
        Err(_) => false,
    }
}

fn pbkdf2_sha256(password: &[u8], salt: &[u8], rounds: u32) -> [u8; 32] {
    let mut derived = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password, salt, rounds, &mut derived);
    derived
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pbkdf2_known_vectors() {
        assert_eq!(
            hex::encode(pbkdf2_sha256(b"password", b"salt", 1)),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
        assert_eq!(
            hex::encode(pbkdf2_sha256(b"password", b"salt", 2)),
            "ae4d0c95af6b46d32d0adff928f06dd02a303f8ef3c251dfd6e2d85a95474c43"
        );
    }

    #[test]
    fn test_verify_requires_matching_password_and_salt() {
        let salt = generate_salt();
        let hash = hash_password("correct horse battery", &salt).unwrap();
        assert!(verify_password("correct horse battery", &salt, &hash));
        assert!(!verify_password("wrong horse battery", &salt, &hash));
        assert!(!verify_password("correct horse battery", &generate_salt(), &hash));
        assert!(!verify_password("correct horse battery", "not-hex", &hash));
    }

    #[test]
    fn test_salts_and_tokens_are_random() {
        assert_eq!(generate_salt().len(), SALT_LEN * 2);
        assert_ne!(generate_salt(), generate_salt());
        let token = generate_access_token();
        assert_eq!(token.len(), 64);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(token, generate_access_token());
    }

    #[test]
    fn test_verify_rejects_truncated_or_altered_hash() {
        let salt = generate_salt();
        let hash = hash_password("correct horse battery", &salt).unwrap();
        assert!(!verify_password("correct horse battery", &salt, &hash[..63]));
        assert!(!verify_password("correct horse battery", &salt, ""));
        let mut altered = hash.clone();
        let last = if altered.ends_with('0') { "1" } else { "0" };
        altered.replace_range(63.., last);
        assert!(!verify_password("correct horse battery", &salt, &altered));
    }
}
