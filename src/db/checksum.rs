//! Checksums for detecting unchanged scrape payloads.

use sha2::{Digest, Sha256};

/// SHA-256 of a serialized payload, hex-encoded.
///
/// A refresh compares the checksum of the freshly extracted course payload
/// with the stored one to tell (and log) whether anything actually changed.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_payload_same_checksum() {
        let payload = r#"[{"code":"18CSC302J"}]"#;
        assert_eq!(calculate_checksum(payload), calculate_checksum(payload));
    }

    #[test]
    fn different_payload_different_checksum() {
        assert_ne!(calculate_checksum("a"), calculate_checksum("b"));
    }
}
