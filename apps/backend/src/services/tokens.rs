//! Bearer token issuing and hashing.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generate a fresh opaque bearer token.
pub fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// SHA-256 of a token as lowercase hex. Only this value is persisted.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_hex() {
        let hash = hash_token("abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash, hash_token("abc"));
    }

    #[test]
    fn generated_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert_ne!(hash_token(&a), hash_token(&b));
    }
}
