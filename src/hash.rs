use sha2::{Digest, Sha256};

/// Hex SHA-256 of a clipping's content, used as the dedup key by the sink.
pub fn content_hash(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}
