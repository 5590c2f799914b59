//! Identity types for AI document records

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Store-assigned row identifier. Monotonic, assigned on first persist.
pub type RecordId = i64;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Schema version stamped on records that do not carry one.
pub const CURRENT_SCHEMA_VERSION: &str = "1.0.0-tier1";

/// Largest row id the external allocation mode accepts (2^48 - 1).
pub const MAX_ROW_ID: RecordId = (1 << 48) - 1;

/// Generate a new record UUID as a string.
/// UUIDv7 embeds a Unix timestamp, making ids naturally sortable by creation time.
pub fn new_record_uuid() -> String {
    Uuid::now_v7().to_string()
}

/// Compute the SHA-256 hash of source content, hex encoded.
///
/// This is the format expected in `sourceDocumentHash`.
pub fn compute_content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_uuid_is_parseable() {
        let id = new_record_uuid();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, new_record_uuid());
    }

    #[test]
    fn test_content_hash_known_value() {
        assert_eq!(
            compute_content_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_max_row_id() {
        assert_eq!(MAX_ROW_ID, 281_474_976_710_655);
    }
}
