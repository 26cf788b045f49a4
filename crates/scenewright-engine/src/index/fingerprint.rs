use sha2::{Digest, Sha256};

/// Hex SHA-256 of the full document text; equal text gives equal fingerprints.
pub fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
