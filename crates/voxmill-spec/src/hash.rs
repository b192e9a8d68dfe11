//! Canonical hashing and seed derivation.
//!
//! - Request canonicalization using RFC 8785 (JCS) style key ordering
//! - BLAKE3 hashing for request hashes and watermark checksums
//! - Seed derivation for deterministic noise sources

use crate::batch::BatchRequest;
use crate::error::SpecError;

/// Number of hex characters kept for a watermark payload checksum.
pub const CHECKSUM_HEX_LEN: usize = 16;

/// Computes the canonical BLAKE3 hash of a batch request.
///
/// ```text
/// request_hash = hex(BLAKE3(JCS(request_json)))
/// ```
///
/// # Example
/// ```
/// use voxmill_spec::BatchRequest;
/// use voxmill_spec::hash::canonical_request_hash;
///
/// let request = BatchRequest::builder("job-0001")
///     .item("Hello", "narrator")
///     .build();
///
/// let hash = canonical_request_hash(&request).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_request_hash(request: &BatchRequest) -> Result<String, SpecError> {
    let value = request.to_value()?;
    canonical_value_hash(&value)
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> Result<String, SpecError> {
    let canonical = canonicalize_json(value)?;
    let hash = blake3::hash(canonical.as_bytes());
    Ok(hash.to_hex().to_string())
}

/// Canonicalizes a JSON value.
///
/// Object keys are sorted lexicographically, there is no whitespace between
/// tokens, and integral floats print without a fraction.
pub fn canonicalize_json(value: &serde_json::Value) -> Result<String, SpecError> {
    Ok(canonicalize_value(value))
}

fn canonicalize_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => format_jcs_number(n),
        serde_json::Value::String(s) => format_jcs_string(s),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(canonicalize_value).collect();
            format!("[{}]", items.join(","))
        }
        serde_json::Value::Object(obj) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = obj.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let pairs: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", format_jcs_string(k), canonicalize_value(v)))
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

fn format_jcs_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f == 0.0 {
                return "0".to_string();
            }
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
            let s = format!("{}", f);
            if s.contains('.') && !s.contains('e') && !s.contains('E') {
                return s.trim_end_matches('0').trim_end_matches('.').to_string();
            }
            s
        }
        _ => "null".to_string(),
    }
}

fn format_jcs_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c < '\x20' => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

/// Computes the integrity checksum of a watermark payload.
///
/// ```text
/// checksum = hex(BLAKE3(data || auxiliary))[..16]
/// ```
pub fn payload_checksum(data: &str, auxiliary: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(data.as_bytes());
    hasher.update(auxiliary.as_bytes());
    let hex = hasher.finalize().to_hex();
    hex[..CHECKSUM_HEX_LEN].to_string()
}

/// Derives a seed for a named component from a base seed.
///
/// ```text
/// component_seed = truncate_u32(BLAKE3(base_seed || key))
/// ```
///
/// # Example
/// ```
/// use voxmill_spec::hash::derive_component_seed;
///
/// let reverb = derive_component_seed(7, "reverb");
/// let chorus = derive_component_seed(7, "chorus");
/// assert_ne!(reverb, chorus);
/// ```
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Computes a BLAKE3 hash of arbitrary data as lowercase hex.
pub fn blake3_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonicalize_sorts_keys() {
        let value = json!({"b": 1, "a": {"d": true, "c": null}});
        assert_eq!(
            canonicalize_json(&value).unwrap(),
            r#"{"a":{"c":null,"d":true},"b":1}"#
        );
    }

    #[test]
    fn test_canonicalize_numbers() {
        let value = json!([1.0, 0.5, 2.50, -0.0]);
        assert_eq!(canonicalize_json(&value).unwrap(), "[1,0.5,2.5,0]");
    }

    #[test]
    fn test_canonicalize_escapes() {
        let value = json!("line\n\"quoted\"\u{0001}");
        assert_eq!(
            canonicalize_json(&value).unwrap(),
            r#""line\n\"quoted\"\u0001""#
        );
    }

    #[test]
    fn test_value_hash_ignores_key_order() {
        let a = json!({"x": 1, "y": [1, 2]});
        let b = json!({"y": [1, 2], "x": 1});
        assert_eq!(
            canonical_value_hash(&a).unwrap(),
            canonical_value_hash(&b).unwrap()
        );
    }

    #[test]
    fn test_payload_checksum() {
        let checksum = payload_checksum("owner-42", "");
        assert_eq!(checksum.len(), CHECKSUM_HEX_LEN);
        assert_eq!(checksum, payload_checksum("owner-42", ""));
        assert_ne!(checksum, payload_checksum("owner-43", ""));
        assert_eq!(checksum, blake3_hash(b"owner-42")[..CHECKSUM_HEX_LEN]);
    }

    #[test]
    fn test_derive_component_seed_deterministic() {
        assert_eq!(
            derive_component_seed(42, "reverb"),
            derive_component_seed(42, "reverb")
        );
        assert_ne!(
            derive_component_seed(42, "reverb"),
            derive_component_seed(43, "reverb")
        );
    }
}
