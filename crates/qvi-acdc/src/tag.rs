//! # Credential Types
//!
//! One enum for every vLEI credential type this workspace knows about.
//! Adding a variant is a compile-time event: every `match` over
//! `CredentialTypeTag` (the registry table, payload dispatch, rule sets) must
//! handle it before the workspace builds again.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::registry::RegistryError;

/// A vLEI credential type.
///
/// | Code | Credential | Issued by |
/// |------|------------|-----------|
/// | `QVI` | Qualified vLEI Issuer | GLEIF |
/// | `LE`  | Legal Entity | QVI |
/// | `ECR` | Engagement Context Role | QVI |
/// | `OOR` | Official Organizational Role | QVI |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CredentialTypeTag {
    /// Qualified vLEI Issuer credential. The root every chain here anchors to.
    #[serde(rename = "QVI")]
    QualifiedVleiIssuer,
    /// Legal Entity vLEI credential.
    #[serde(rename = "LE")]
    LegalEntity,
    /// Engagement Context Role vLEI credential.
    #[serde(rename = "ECR")]
    EngagementContextRole,
    /// Official Organizational Role vLEI credential.
    #[serde(rename = "OOR")]
    OfficialOrganizationalRole,
}

impl CredentialTypeTag {
    /// Returns every credential type.
    pub fn all() -> &'static [CredentialTypeTag] {
        &[
            Self::QualifiedVleiIssuer,
            Self::LegalEntity,
            Self::EngagementContextRole,
            Self::OfficialOrganizationalRole,
        ]
    }

    /// Returns the short code, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QualifiedVleiIssuer => "QVI",
            Self::LegalEntity => "LE",
            Self::EngagementContextRole => "ECR",
            Self::OfficialOrganizationalRole => "OOR",
        }
    }
}

impl std::fmt::Display for CredentialTypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialTypeTag {
    type Err = RegistryError;

    /// Parse a credential type from its short code. Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QVI" => Ok(Self::QualifiedVleiIssuer),
            "LE" => Ok(Self::LegalEntity),
            "ECR" => Ok(Self::EngagementContextRole),
            "OOR" => Ok(Self::OfficialOrganizationalRole),
            other => Err(RegistryError::UnknownCredentialType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_roundtrip() {
        for tag in CredentialTypeTag::all() {
            let parsed: CredentialTypeTag = tag.as_str().parse().unwrap();
            assert_eq!(*tag, parsed);
        }
    }

    #[test]
    fn from_str_unknown() {
        for bad in ["", "le", "vLEI", "ECR "] {
            assert!(matches!(
                bad.parse::<CredentialTypeTag>(),
                Err(RegistryError::UnknownCredentialType(_))
            ));
        }
    }

    #[test]
    fn serde_format_matches_as_str() {
        for tag in CredentialTypeTag::all() {
            let json = serde_json::to_string(tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.as_str()));
            let back: CredentialTypeTag = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *tag);
        }
    }

    #[test]
    fn display_matches_as_str() {
        for tag in CredentialTypeTag::all() {
            assert_eq!(tag.to_string(), tag.as_str());
        }
    }
}
