//! Issuance error types.
//!
//! Every variant except [`IssuanceError::Store`] is raised before the
//! credential store is contacted. None of them are retried.

use qvi_acdc::{CredentialTypeTag, RegistryError};
use qvi_core::{Said, SaidError};

/// Errors from preparing or submitting an issuance.
#[derive(Debug, thiserror::Error)]
pub enum IssuanceError {
    /// A record could not be canonically serialized for digesting.
    #[error("encoding failed: {0}")]
    Encoding(#[from] SaidError),

    /// The registry holds no record for the requested credential type.
    #[error("unknown credential type: {0}")]
    UnknownCredentialType(String),

    /// The payload variant belongs to another credential type.
    #[error("payload for {found} supplied when issuing {expected}")]
    PayloadTypeMismatch {
        expected: CredentialTypeTag,
        found: CredentialTypeTag,
    },

    /// The edge's slots or operators differ from what the type requires.
    #[error("invalid edge for {tag}: {reason}")]
    InvalidEdgeShape {
        tag: CredentialTypeTag,
        reason: String,
    },

    /// An edge slot references a credential of the wrong type.
    #[error(
        "edge slot {slot:?} of {tag} must reference a {upstream} credential \
         (schema {expected}), found schema {found}"
    )]
    EdgeTypeMismatch {
        tag: CredentialTypeTag,
        slot: String,
        upstream: CredentialTypeTag,
        expected: Said,
        found: Said,
    },

    /// The caller-supplied edge SAID does not match its content.
    #[error("edge SAID {stored} does not match its content (computed {computed})")]
    EdgeSaidMismatch { stored: Said, computed: Said },

    /// Registry failure other than a missing type.
    #[error(transparent)]
    Registry(RegistryError),

    /// The credential store rejected or failed the request.
    #[error("credential store failed: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<RegistryError> for IssuanceError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownCredentialType(code) => Self::UnknownCredentialType(code),
            other => Self::Registry(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_from_registry_is_flattened() {
        let err = IssuanceError::from(RegistryError::UnknownCredentialType("XYZ".into()));
        assert!(matches!(err, IssuanceError::UnknownCredentialType(code) if code == "XYZ"));
    }

    #[test]
    fn other_registry_errors_are_wrapped() {
        let err = IssuanceError::from(RegistryError::RootType(
            CredentialTypeTag::QualifiedVleiIssuer,
        ));
        assert!(matches!(err, IssuanceError::Registry(_)));
    }

    #[test]
    fn store_error_keeps_source() {
        use std::error::Error as _;

        let inner = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = IssuanceError::Store(Box::new(inner));
        assert!(err.to_string().contains("connection reset"));
        assert!(err.source().is_some());
    }

    #[test]
    fn edge_type_mismatch_names_both_schemas() {
        let err = IssuanceError::EdgeTypeMismatch {
            tag: CredentialTypeTag::EngagementContextRole,
            slot: "auth".into(),
            upstream: CredentialTypeTag::LegalEntity,
            expected: Said::from("E-expected"),
            found: Said::from("E-found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("E-expected"));
        assert!(msg.contains("E-found"));
        assert!(msg.contains("LE"));
    }
}
