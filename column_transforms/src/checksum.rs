//! Row checksums for change detection.

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Separator placed between rendered column values before hashing.
pub const FIELD_SEPARATOR: &str = "~~";

/// Hash function used for row checksums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

/// Hex-encoded digest of `content`.
pub fn calculate_checksum(content: &str, algorithm: ChecksumAlgorithm) -> String {
    match algorithm {
        ChecksumAlgorithm::Sha1 => hex::encode(Sha1::digest(content.as_bytes())),
        ChecksumAlgorithm::Sha256 => hex::encode(Sha256::digest(content.as_bytes())),
    }
}
