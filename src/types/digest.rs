// ABOUTME: Short stable digests used to name workspaces and backup archives.
// ABOUTME: SHA-256 truncated to 16 hex characters.

use sha2::{Digest, Sha256};

const SHORT_DIGEST_LEN: usize = 16;

/// Hex-encoded SHA-256 of `input`, cut to 16 characters.
pub fn short_digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let mut encoded = hex::encode(hasher.finalize());
    encoded.truncate(SHORT_DIGEST_LEN);
    encoded
}
