//! Cryptographic utilities for API key comparison.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares a presented API key with the configured secret.
///
/// Both sides are hashed first so the comparison always runs over two
/// 32-byte digests, independent of the presented key's length.
pub fn api_key_matches(expected: &str, presented: &str) -> bool {
    let expected = Sha256::digest(expected.as_bytes());
    let presented = Sha256::digest(presented.as_bytes());

    expected
        .iter()
        .zip(presented.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Returns a short, loggable fingerprint of a key (first 8 hex chars of its hash).
pub fn key_fingerprint(key: &str) -> String {
    sha256_hex(key)[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        let hash = sha256_hex("");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_api_key_matches_same_key() {
        assert!(api_key_matches("academic-pcru", "academic-pcru"));
    }

    #[test]
    fn test_api_key_matches_rejects_different_key() {
        assert!(!api_key_matches("academic-pcru", "academic-pcrx"));
        assert!(!api_key_matches("academic-pcru", "academic"));
        assert!(!api_key_matches("academic-pcru", ""));
    }

    #[test]
    fn test_api_key_matches_is_case_sensitive() {
        assert!(!api_key_matches("Secret", "secret"));
    }

    #[test]
    fn test_key_fingerprint() {
        let fp = key_fingerprint("test");
        assert_eq!(fp, "9f86d081");
        assert_eq!(fp.len(), 8);
    }
}
