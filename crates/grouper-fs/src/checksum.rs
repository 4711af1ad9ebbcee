//! SHA-256 digests
//!
//! One canonical checksum format (`sha256:<hex>`) for change detection, and
//! short hex digests used as stable asset identifiers.

use sha2::{Digest, Sha256};

const PREFIX: &str = "sha256:";

fn hex_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compute the SHA-256 checksum of string content as `"sha256:<hex>"`.
pub fn compute_content_checksum(content: &str) -> String {
    format!("{}{}", PREFIX, hex_digest(content))
}

/// First `len` hex digits of the SHA-256 of `content`.
///
/// `len` is capped at the full digest length of 64.
pub fn short_digest(content: &str, len: usize) -> String {
    let mut hex = hex_digest(content);
    hex.truncate(len.min(64));
    hex
}
