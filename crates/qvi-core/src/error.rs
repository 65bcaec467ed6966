//! # Error Types
//!
//! Errors raised while canonicalizing and digesting records. Every variant
//! here is an encoding failure in the sense of the issuance pipeline: the
//! record could not be turned into a deterministic byte sequence, or an
//! identifier could not be decoded.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Numeric attributes must be strings or integers.
    #[error("float values are not permitted in canonical representations; use string or integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed (non-string map keys, custom serializer errors).
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error computing, embedding, or decoding a self-addressing identifier.
#[derive(Error, Debug)]
pub enum SaidError {
    /// The record could not be canonicalized.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// `saidify` was asked to embed a SAID into a record lacking the label field.
    #[error("record has no {label:?} field to hold its SAID")]
    MissingLabel {
        /// The label that was expected.
        label: String,
    },

    /// A string claimed to be a computed SAID but is not one.
    #[error("malformed SAID {said:?}: {reason}")]
    Malformed {
        /// The offending identifier text.
        said: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl From<serde_json::Error> for SaidError {
    fn from(err: serde_json::Error) -> Self {
        Self::Canonicalization(CanonicalizationError::SerializationFailed(err))
    }
}

/// Validation failure for a domain newtype.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An AID was empty or whitespace only.
    #[error("AID must not be empty")]
    EmptyAid,

    /// An AID contained control characters.
    #[error("AID contains control characters: {0:?}")]
    InvalidAid(String),

    /// A timestamp could not be parsed.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The raw input.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_rejected_display() {
        let err = CanonicalizationError::FloatRejected(1.5);
        assert!(format!("{err}").contains("1.5"));
    }

    #[test]
    fn serde_json_error_converts_to_canonicalization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SaidError::from(json_err);
        assert!(matches!(
            err,
            SaidError::Canonicalization(CanonicalizationError::SerializationFailed(_))
        ));
    }

    #[test]
    fn missing_label_names_the_label() {
        let err = SaidError::MissingLabel {
            label: "d".to_string(),
        };
        assert!(format!("{err}").contains("\"d\""));
    }

    #[test]
    fn malformed_carries_reason() {
        let err = SaidError::Malformed {
            said: "Exyz".to_string(),
            reason: "wrong length".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("Exyz"));
        assert!(msg.contains("wrong length"));
    }
}
