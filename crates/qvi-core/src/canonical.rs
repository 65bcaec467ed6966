//! # Canonical Serialization -- Digest-Ready Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for bytes
//! used in SAID computation across the workspace.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only way to
//! construct it is through `CanonicalBytes::new()` (or `from_value()`), which
//! applies the coercion pipeline (float rejection) before serialization. Any
//! function that hashes must accept `&CanonicalBytes`, so the wrong
//! serialization path cannot reach a digest.
//!
//! ## Encoding Rules
//!
//! 1. **Compact JSON**: no insignificant whitespace, `,` and `:` separators.
//! 2. **UTF-8, unescaped**: non-ASCII characters are emitted raw; only the
//!    JSON-mandated escapes are applied.
//! 3. **Declared member order**: object members keep the order in which the
//!    record emits them. Typed records emit in field-declaration order; types
//!    whose members are order-free by meaning (edge slots) sort their own keys
//!    before emitting. This is the ordering the KERI/ACDC ecosystem hashes,
//!    and the published vLEI edge SAIDs only reproduce under it.
//! 4. **Reject floats**: non-integer numbers have no portable text form.
//!    Non-finite values cannot appear: `serde_json` has no representation
//!    for them.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by the canonical JSON encoding.
///
/// # Invariants
///
/// - The only constructors are `CanonicalBytes::new()` and `from_value()`.
/// - No float numbers are present.
/// - Serialization is compact with members in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// float. Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (e.g. a map with non-string keys).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(value)
    }

    /// Construct canonical bytes from an already-built JSON value.
    pub fn from_value(value: Value) -> Result<Self, CanonicalizationError> {
        let coerced = coerce_json_value(value)?;
        let bytes = serde_json::to_vec(&coerced)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively validate a JSON value for canonical encoding.
///
/// 1. `null`, `bool`, `string`, integer: pass through unchanged.
/// 2. float (non-integer): **rejected** with `FloatRejected`.
/// 3. `object`: values recursed, member order kept.
/// 4. `array`: elements recursed.
fn coerce_json_value(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value),
        Value::Number(ref n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(value)
        }
        Value::Object(map) => {
            let mut coerced = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                coerced.insert(k, coerce_json_value(v)?);
            }
            Ok(Value::Object(coerced))
        }
        Value::Array(arr) => {
            let coerced: Result<Vec<_>, _> = arr.into_iter().map(coerce_json_value).collect();
            Ok(Value::Array(coerced?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Node {
        n: String,
        s: String,
        o: String,
    }

    #[test]
    fn test_canonical_bytes_compact() {
        let data = serde_json::json!({"d": "", "a": 1, "c": "hello"});
        let cb = CanonicalBytes::new(&data).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"d":"","a":1,"c":"hello"}"#);
    }

    #[test]
    fn test_struct_field_order_is_kept() {
        // n, s, o is not lexicographic; the declared order must survive.
        let node = Node {
            n: "a SAID".into(),
            s: "ENPX".into(),
            o: "I2I".into(),
        };
        let cb = CanonicalBytes::new(&node).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"n":"a SAID","s":"ENPX","o":"I2I"}"#);
    }

    #[test]
    fn test_nested_order_is_kept() {
        let data = serde_json::json!({
            "outer": {"b": 2, "a": 1},
            "list": [3, 2, 1]
        });
        let cb = CanonicalBytes::new(&data).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, r#"{"outer":{"b":2,"a":1},"list":[3,2,1]}"#);
    }

    #[test]
    fn test_float_rejection() {
        let data = serde_json::json!({"amount": 1.5});
        match CanonicalBytes::new(&data).unwrap_err() {
            CanonicalizationError::FloatRejected(f) => assert_eq!(f, 1.5),
            other => panic!("Expected FloatRejected, got: {other}"),
        }
    }

    #[test]
    fn test_deeply_nested_float_rejected() {
        let data = serde_json::json!({"a": {"b": [{"c": 3.25}]}});
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn test_integer_accepted() {
        let data = serde_json::json!({"amount": -42, "big": 9999999999u64});
        let cb = CanonicalBytes::new(&data).expect("integers should be accepted");
        assert_eq!(cb.as_bytes(), br#"{"amount":-42,"big":9999999999}"#);
    }

    #[test]
    fn test_non_string_map_keys_rejected() {
        let mut data = HashMap::new();
        data.insert((1u8, 2u8), "pair");
        let err = CanonicalBytes::new(&data).unwrap_err();
        assert!(matches!(err, CanonicalizationError::SerializationFailed(_)));
    }

    #[test]
    fn test_unicode_passthrough() {
        let data = serde_json::json!({"name": "\u{00e9}l\u{00e8}ve"});
        let cb = CanonicalBytes::new(&data).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert!(s.contains('\u{00e9}'));
        assert!(!s.contains("\\u"));
    }

    #[test]
    fn test_empty_object() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
        assert_eq!(cb.len(), 2);
        assert!(!cb.is_empty());
    }
}
