//! # Self-Addressing Identifiers
//!
//! A SAID is a digest of a record's canonical content that is embedded as a
//! field (the *label*, `d` by default) of that same record.
//!
//! ## Computation
//!
//! 1. Serialize the record with the label set to a placeholder of exactly the
//!    final identifier's length (`#` repeated).
//! 2. Hash the [`CanonicalBytes`] with the selected [`DerivationCode`].
//! 3. Encode: prepend one zero lead byte to the 32-byte digest, base64url
//!    encode the 33 bytes (44 characters, no padding), then replace the
//!    leading character with the derivation code.
//! 4. Write the identifier into the label field.
//!
//! Because the placeholder has the same length as the result, re-running the
//! computation over a finalized record with its label reset reproduces the
//! stored identifier exactly.

use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::SaidError;

/// Default label of the self-addressing field.
pub const DEFAULT_LABEL: &str = "d";

/// Character used to fill the label field during the hash pass.
const PLACEHOLDER_CHAR: char = '#';

/// Size in bytes of every supported raw digest.
const RAW_DIGEST_SIZE: usize = 32;

/// Number of zero bytes prepended before base64 encoding a 32-byte digest.
const LEAD_SIZE: usize = 1;

/// The hash algorithm and digest length that produced a SAID.
///
/// Each variant owns a one-character derivation code that prefixes the
/// encoded identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DerivationCode {
    /// BLAKE3 with 256-bit output, code `E`. Used for all vLEI schemas and edges.
    #[default]
    Blake3_256,
    /// SHA2-256, code `I`.
    Sha2_256,
}

impl DerivationCode {
    /// Returns the derivation code prefix.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Blake3_256 => "E",
            Self::Sha2_256 => "I",
        }
    }

    /// Length in characters of an identifier carrying this code.
    pub fn full_size(&self) -> usize {
        (LEAD_SIZE + RAW_DIGEST_SIZE) * 4 / 3
    }

    /// Resolve a derivation code from the first character of an identifier.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "E" => Some(Self::Blake3_256),
            "I" => Some(Self::Sha2_256),
            _ => None,
        }
    }

    /// Placeholder text held by the label field during the hash pass.
    pub fn placeholder(&self) -> String {
        std::iter::repeat(PLACEHOLDER_CHAR)
            .take(self.full_size())
            .collect()
    }

    /// Hash canonical bytes and encode the result as an identifier.
    pub fn digest(&self, data: &CanonicalBytes) -> Said {
        let raw = self.hash(data.as_bytes());
        self.encode(&raw)
    }

    fn hash(&self, bytes: &[u8]) -> [u8; RAW_DIGEST_SIZE] {
        match self {
            Self::Blake3_256 => *blake3::hash(bytes).as_bytes(),
            Self::Sha2_256 => {
                let hash = Sha256::digest(bytes);
                let mut out = [0u8; RAW_DIGEST_SIZE];
                out.copy_from_slice(&hash);
                out
            }
        }
    }

    fn encode(&self, raw: &[u8; RAW_DIGEST_SIZE]) -> Said {
        let mut padded = Vec::with_capacity(LEAD_SIZE + RAW_DIGEST_SIZE);
        padded.extend_from_slice(&[0u8; LEAD_SIZE]);
        padded.extend_from_slice(raw);
        let text = URL_SAFE_NO_PAD.encode(&padded);
        let code = self.code();
        Said(format!("{code}{}", &text[code.len()..]))
    }
}

impl fmt::Display for DerivationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blake3_256 => f.write_str("Blake3-256"),
            Self::Sha2_256 => f.write_str("SHA2-256"),
        }
    }
}

/// A self-addressing identifier.
///
/// Opaque text compared byte-for-byte. Computed identifiers are 44 characters
/// beginning with a derivation code, but the type also carries references
/// taken from external input (an edge may point at any credential SAID the
/// caller supplies), so construction does not validate. Use
/// [`Said::decode`] when the text must be a well-formed computed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Said(String);

impl Said {
    /// Wrap identifier text without validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode a computed identifier into its derivation code and raw digest.
    ///
    /// # Errors
    ///
    /// Returns [`SaidError::Malformed`] for unknown codes, wrong lengths,
    /// invalid base64url text, or a non-zero lead byte.
    pub fn decode(&self) -> Result<(DerivationCode, [u8; RAW_DIGEST_SIZE]), SaidError> {
        let malformed = |reason: &str| SaidError::Malformed {
            said: self.0.clone(),
            reason: reason.to_string(),
        };

        let code = self
            .0
            .get(..1)
            .and_then(DerivationCode::from_code)
            .ok_or_else(|| malformed("unknown derivation code"))?;
        if self.0.len() != code.full_size() {
            return Err(malformed("wrong length"));
        }

        // The code occupies the position of the zero lead byte's first sextet.
        let text = format!("A{}", &self.0[code.code().len()..]);
        let bytes = URL_SAFE_NO_PAD
            .decode(text.as_bytes())
            .map_err(|_| malformed("invalid base64url"))?;
        if bytes.len() != LEAD_SIZE + RAW_DIGEST_SIZE || bytes[0] != 0 {
            return Err(malformed("non-zero lead byte"));
        }

        let mut raw = [0u8; RAW_DIGEST_SIZE];
        raw.copy_from_slice(&bytes[LEAD_SIZE..]);
        Ok((code, raw))
    }

    /// Returns true if this text decodes as a computed identifier.
    pub fn is_computed(&self) -> bool {
        self.decode().is_ok()
    }
}

impl fmt::Display for Said {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Said {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Said {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Said {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Computes and embeds SAIDs over arbitrary serializable records.
///
/// A `Saider` pairs a derivation code with the label of the self-addressing
/// field. It holds no state beyond that and is freely shared across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saider {
    code: DerivationCode,
    label: String,
}

impl Default for Saider {
    fn default() -> Self {
        Self::new(DerivationCode::default(), DEFAULT_LABEL)
    }
}

impl Saider {
    /// Create a saider for the given code and label.
    pub fn new(code: DerivationCode, label: impl Into<String>) -> Self {
        Self {
            code,
            label: label.into(),
        }
    }

    /// The derivation code this saider produces.
    pub fn code(&self) -> DerivationCode {
        self.code
    }

    /// The label of the self-addressing field.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Compute the SAID of a record.
    ///
    /// If the record is an object holding the label field, that field is
    /// replaced by the placeholder before hashing; otherwise the record is
    /// hashed as-is.
    ///
    /// Members are hashed in the order the record serializes them. Typed
    /// records have a fixed field order; an untyped `serde_json::Value` keeps
    /// insertion order, so `{"a":1,"b":2}` and `{"b":2,"a":1}` have different
    /// SAIDs. Callers hashing untyped records must build them in a stable
    /// order.
    pub fn digest(&self, record: &impl Serialize) -> Result<Said, SaidError> {
        let mut value = serde_json::to_value(record)?;
        self.blank_label(&mut value);
        Ok(self.code.digest(&CanonicalBytes::from_value(value)?))
    }

    /// Compute the SAID of a record and embed it in the label field.
    ///
    /// Returns the populated record and its SAID. The label keeps its
    /// position among the record's members.
    ///
    /// # Errors
    ///
    /// Returns [`SaidError::MissingLabel`] if the record is not an object
    /// containing the label field.
    pub fn saidify(&self, record: &impl Serialize) -> Result<(Value, Said), SaidError> {
        let mut value = serde_json::to_value(record)?;
        if !self.blank_label(&mut value) {
            return Err(SaidError::MissingLabel {
                label: self.label.clone(),
            });
        }
        let said = self.code.digest(&CanonicalBytes::from_value(value.clone())?);
        if let Some(map) = value.as_object_mut() {
            map.insert(self.label.clone(), Value::String(said.to_string()));
        }
        Ok((value, said))
    }

    /// Check that a record's label field holds its own SAID.
    ///
    /// Returns `Ok(false)` when the label is absent, not a string, or holds a
    /// different value than the recomputed digest.
    pub fn verify(&self, record: &impl Serialize) -> Result<bool, SaidError> {
        let value = serde_json::to_value(record)?;
        let stored = match value.get(&self.label).and_then(Value::as_str) {
            Some(s) => s.to_string(),
            None => return Ok(false),
        };
        let recomputed = self.digest(&value)?;
        Ok(recomputed.as_str() == stored)
    }

    /// Replace the label field with the placeholder. Returns whether the label
    /// was present.
    fn blank_label(&self, value: &mut Value) -> bool {
        match value.as_object_mut() {
            Some(map) if map.contains_key(&self.label) => {
                map.insert(self.label.clone(), Value::String(self.code.placeholder()));
                true
            }
            _ => false,
        }
    }
}

/// A typed record whose label field holds its own SAID.
///
/// Implementors must serialize the label field in every state, as `null`
/// while unsealed.
pub trait SelfAddressing: Serialize + Sized {
    /// The stored SAID, if the record has been sealed.
    fn said(&self) -> Option<&Said>;

    /// Store a computed SAID.
    fn set_said(&mut self, said: Said);

    /// Compute this record's SAID with the default saider.
    fn compute_said(&self) -> Result<Said, SaidError> {
        Saider::default().digest(self)
    }

    /// Compute and store this record's SAID.
    fn seal(mut self) -> Result<Self, SaidError> {
        let said = self.compute_said()?;
        self.set_said(said);
        Ok(self)
    }

    /// Returns true if the stored SAID matches the recomputed one.
    fn verify_said(&self) -> Result<bool, SaidError> {
        match self.said() {
            Some(stored) => Ok(&self.compute_said()? == stored),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn placeholder_matches_identifier_length() {
        for code in [DerivationCode::Blake3_256, DerivationCode::Sha2_256] {
            assert_eq!(code.placeholder().len(), 44);
            assert_eq!(code.full_size(), 44);
        }
    }

    #[test]
    fn blake3_said_shape() {
        let said = Saider::default().digest(&json!({"d": "", "a": 1})).unwrap();
        assert_eq!(said.as_str().len(), 44);
        assert!(said.as_str().starts_with('E'));
    }

    #[test]
    fn sha2_said_shape() {
        let saider = Saider::new(DerivationCode::Sha2_256, "d");
        let said = saider.digest(&json!({"d": "", "a": 1})).unwrap();
        assert_eq!(said.as_str().len(), 44);
        assert!(said.as_str().starts_with('I'));
    }

    #[test]
    fn untyped_records_hash_in_insertion_order() {
        let saider = Saider::default();
        let ab = saider.digest(&json!({"a": 1, "b": 2, "d": ""})).unwrap();
        let ba = saider.digest(&json!({"b": 2, "a": 1, "d": ""})).unwrap();
        assert_ne!(ab, ba);
        assert_eq!(ab, saider.digest(&json!({"a": 1, "b": 2, "d": ""})).unwrap());
    }

    #[test]
    fn derivation_codes_produce_different_saids() {
        let record = json!({"d": "", "a": 1});
        let e = Saider::default().digest(&record).unwrap();
        let i = Saider::new(DerivationCode::Sha2_256, "d")
            .digest(&record)
            .unwrap();
        assert_ne!(e, i);
    }

    #[test]
    fn known_blake3_vector_for_placeholder_record() {
        // BLAKE3 of the empty input is a published vector; check the encoder
        // against it directly.
        let raw = blake3::hash(b"");
        let said = DerivationCode::Blake3_256.encode(raw.as_bytes());
        let (code, decoded) = said.decode().unwrap();
        assert_eq!(code, DerivationCode::Blake3_256);
        assert_eq!(&decoded, raw.as_bytes());
        assert_eq!(
            raw.to_hex().as_str(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn digest_ignores_existing_label_value() {
        let a = Saider::default().digest(&json!({"d": "", "x": "y"})).unwrap();
        let b = Saider::default()
            .digest(&json!({"d": "anything at all", "x": "y"}))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn digest_without_label_hashes_record_as_is() {
        let with_label = Saider::default().digest(&json!({"d": "", "x": "y"})).unwrap();
        let without = Saider::default().digest(&json!({"x": "y"})).unwrap();
        assert_ne!(with_label, without);
    }

    #[test]
    fn saidify_embeds_said_in_place() {
        let (value, said) = Saider::default()
            .saidify(&json!({"a": "first", "d": "", "z": "last"}))
            .unwrap();
        assert_eq!(value["d"], json!(said.as_str()));
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["a", "d", "z"]);
    }

    #[test]
    fn saidify_requires_label() {
        let err = Saider::default().saidify(&json!({"a": 1})).unwrap_err();
        assert!(matches!(err, SaidError::MissingLabel { .. }));
        let err = Saider::default().saidify(&json!("scalar")).unwrap_err();
        assert!(matches!(err, SaidError::MissingLabel { .. }));
    }

    #[test]
    fn saidify_with_custom_label() {
        let saider = Saider::new(DerivationCode::Blake3_256, "i");
        let (value, said) = saider.saidify(&json!({"i": "", "v": 1})).unwrap();
        assert_eq!(value["i"], json!(said.as_str()));
        assert!(saider.verify(&value).unwrap());
    }

    #[test]
    fn verify_detects_tampering() {
        let saider = Saider::default();
        let (mut value, _) = saider.saidify(&json!({"d": "", "LEI": "an LEI"})).unwrap();
        assert!(saider.verify(&value).unwrap());
        value["LEI"] = json!("another LEI");
        assert!(!saider.verify(&value).unwrap());
    }

    #[test]
    fn verify_without_label_is_false() {
        assert!(!Saider::default().verify(&json!({"x": 1})).unwrap());
    }

    #[test]
    fn float_in_record_is_an_encoding_error() {
        let err = Saider::default()
            .digest(&json!({"d": "", "ratio": 0.5}))
            .unwrap_err();
        assert!(matches!(err, SaidError::Canonicalization(_)));
    }

    #[test]
    fn decode_rejects_malformed_text() {
        for bad in ["said", "", "Xabc", "E", "E!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!"] {
            assert!(Said::from(bad).decode().is_err(), "{bad:?} should not decode");
        }
    }

    #[test]
    fn decode_rejects_non_zero_lead_byte() {
        // 'E' followed by '_' sets the low bits of the lead byte.
        let text = format!("E_{}", "A".repeat(42));
        assert!(Said::new(text).decode().is_err());
    }

    #[test]
    fn said_display_and_serde_are_transparent() {
        let said = Said::from("EBfdlu8R27Fbx-ehrqwImnK-8Cm79sqbAQ4MmvEAYqao");
        assert_eq!(said.to_string(), said.as_str());
        assert_eq!(
            serde_json::to_string(&said).unwrap(),
            "\"EBfdlu8R27Fbx-ehrqwImnK-8Cm79sqbAQ4MmvEAYqao\""
        );
        assert!(said.is_computed());
    }

    #[derive(Serialize)]
    struct Sealable {
        d: Option<Said>,
        v: String,
    }

    impl SelfAddressing for Sealable {
        fn said(&self) -> Option<&Said> {
            self.d.as_ref()
        }

        fn set_said(&mut self, said: Said) {
            self.d = Some(said);
        }
    }

    #[test]
    fn self_addressing_seal_and_verify() {
        let sealed = Sealable {
            d: None,
            v: "value".into(),
        }
        .seal()
        .unwrap();
        assert!(sealed.said().is_some());
        assert!(sealed.verify_said().unwrap());

        let unsealed = Sealable {
            d: None,
            v: "value".into(),
        };
        assert!(!unsealed.verify_said().unwrap());
        assert_eq!(unsealed.compute_said().unwrap(), *sealed.said().unwrap());
    }
}
