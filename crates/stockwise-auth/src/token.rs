//! Opaque session token generation and hashing.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// Generate a cryptographically random opaque session token
/// (32 bytes → base64url-encoded, no padding).
///
/// The raw value only ever travels in the session cookie.
pub fn generate_session_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 hash of a raw session token, hex-encoded.
///
/// This is the value stored in the database as `session.token_hash`.
pub fn hash_session_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_is_url_safe() {
        let token = generate_session_token();
        // base64url characters only (A-Z a-z 0-9 - _), no padding.
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        // 32 bytes → 43 base64url chars.
        assert_eq!(token.len(), 43);
    }

    #[test]
    fn session_tokens_are_unique() {
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn session_token_hash_is_deterministic() {
        let raw = "some-session-token";
        assert_eq!(hash_session_token(raw), hash_session_token(raw));
        assert_eq!(hash_session_token(raw).len(), 64);
    }

    #[test]
    fn different_tokens_different_hashes() {
        let h1 = hash_session_token("token-a");
        let h2 = hash_session_token("token-b");
        assert_ne!(h1, h2);
    }
}
