//! Content identifier derivation and normalization.
//!
//! Content ids are six decimal digits. Upstream systems occasionally hand out
//! five-digit ids which are missing their leading zero.

use sha2::{Digest, Sha256};

const CONTENT_ID_MODULUS: u64 = 1_000_000;

/// Derives a deterministic six-digit content id from a lookup id.
///
/// The id is the first eight bytes of the SHA-256 digest of the lookup id,
/// reduced modulo one million and left-padded to six digits. The same lookup
/// id always yields the same content id, across processes.
pub fn generate_content_id(lookup_id: &str) -> String {
    let digest = Sha256::digest(lookup_id.as_bytes());

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let value = u64::from_be_bytes(prefix) % CONTENT_ID_MODULUS;

    format!("{:06}", value)
}

/// Left-pads a five-digit content id with a single zero.
///
/// Anything else is returned trimmed but otherwise unchanged.
pub fn pad_content_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() == 5 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("0{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Returns true if the value is a final six-digit content id.
pub fn is_valid_content_id(value: &str) -> bool {
    value.len() == 6 && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_five_digits() {
        assert_eq!(pad_content_id("12345"), "012345");
    }

    #[test]
    fn test_pad_six_digits_unchanged() {
        assert_eq!(pad_content_id("123456"), "123456");
    }

    #[test]
    fn test_pad_non_numeric_unchanged() {
        assert_eq!(pad_content_id("abcde"), "abcde");
        assert_eq!(pad_content_id(" 123456 "), "123456");
    }

    #[test]
    fn test_generate_is_six_digits() {
        for id in ["TSRC-OPS-000001", "CMS-HR-123456", "ABC-123", ""] {
            let content_id = generate_content_id(id);
            assert!(is_valid_content_id(&content_id), "bad id {content_id}");
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        assert_eq!(
            generate_content_id("TSRC-OPS-000001"),
            generate_content_id("TSRC-OPS-000001")
        );
        assert_ne!(
            generate_content_id("TSRC-OPS-000001"),
            generate_content_id("TSRC-OPS-000002")
        );
    }

    #[test]
    fn test_is_valid_content_id() {
        assert!(is_valid_content_id("012345"));
        assert!(!is_valid_content_id("12345"));
        assert!(!is_valid_content_id("1234567"));
        assert!(!is_valid_content_id("12a456"));
    }
}
