//! Hashing primitives for ChainTrace
//!
//! Block contents are hashed over a canonical JSON form: object keys sorted
//! lexicographically and floats in serde_json's shortest round-trip notation,
//! so the same logical content always produces the same digest.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 of `bytes` as lower-case hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Canonical content hash of any serializable value.
///
/// The value is converted to a `serde_json::Value` first; its object maps are
/// BTreeMap-backed, so keys come out lexicographically sorted no matter the
/// insertion order of the source fields.
pub fn canonical_json_hash<T: Serialize>(value: &T) -> String {
    let canonical = serde_json::to_value(value).expect("value converts to JSON");
    sha256_hex(canonical.to_string().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_canonical_hash_ignores_key_order() {
        let a = json!({"b": 1, "a": {"y": 2.5, "x": "s"}});
        let b = json!({"a": {"x": "s", "y": 2.5}, "b": 1});
        assert_eq!(canonical_json_hash(&a), canonical_json_hash(&b));
    }

    #[test]
    fn test_canonical_hash_differs_on_content() {
        let a = json!({"index": 1, "proof": 100});
        let b = json!({"index": 1, "proof": 101});
        assert_ne!(canonical_json_hash(&a), canonical_json_hash(&b));
    }

    #[test]
    fn test_fractional_timestamps_hash_stably() {
        let v = json!({"timestamp": 1754300000.123456});
        assert_eq!(canonical_json_hash(&v), canonical_json_hash(&v.clone()));
    }
}
