//! # Credential Payloads
//!
//! Attribute data for each vLEI credential type. Field order in these
//! structs is the order on the wire, and since the credential store digests
//! the attributes as serialized, reordering fields here changes every
//! credential SAID downstream.

use serde::{Deserialize, Serialize};

use qvi_core::{Aid, Timestamp};

use crate::tag::CredentialTypeTag;

/// Attributes of a Qualified vLEI Issuer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QviData {
    #[serde(rename = "LEI")]
    pub lei: String,
    pub issuee: Aid,
    pub timestamp: Timestamp,
}

impl QviData {
    pub fn new(lei: impl Into<String>, issuee: Aid, timestamp: Timestamp) -> Self {
        Self {
            lei: lei.into(),
            issuee,
            timestamp,
        }
    }
}

/// Attributes of a Legal Entity credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalEntityData {
    /// Legal Entity Identifier of the issuee organisation.
    #[serde(rename = "LEI")]
    pub lei: String,
    pub issuee: Aid,
    pub timestamp: Timestamp,
}

impl LegalEntityData {
    pub fn new(lei: impl Into<String>, issuee: Aid, timestamp: Timestamp) -> Self {
        Self {
            lei: lei.into(),
            issuee,
            timestamp,
        }
    }

    /// Legal entity attributes stamped with the current time.
    pub fn issued_now(lei: impl Into<String>, issuee: Aid) -> Self {
        Self::new(lei, issuee, Timestamp::now())
    }
}

/// Attributes of an Engagement Context Role credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcrData {
    pub issuee: Aid,
    /// Optional privacy nonce. Omitted from the wire when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    pub timestamp: Timestamp,
    #[serde(rename = "LEI")]
    pub lei: String,
    pub person_legal_name: String,
    pub engagement_context_role: String,
}

impl EcrData {
    pub fn new(
        issuee: Aid,
        lei: impl Into<String>,
        person_legal_name: impl Into<String>,
        engagement_context_role: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            issuee,
            nonce: None,
            timestamp,
            lei: lei.into(),
            person_legal_name: person_legal_name.into(),
            engagement_context_role: engagement_context_role.into(),
        }
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }
}

/// Attributes of an Official Organizational Role credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OorData {
    pub issuee: Aid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    pub timestamp: Timestamp,
    #[serde(rename = "LEI")]
    pub lei: String,
    pub person_legal_name: String,
    pub official_organizational_role: String,
}

impl OorData {
    pub fn new(
        issuee: Aid,
        lei: impl Into<String>,
        person_legal_name: impl Into<String>,
        official_organizational_role: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            issuee,
            nonce: None,
            timestamp,
            lei: lei.into(),
            person_legal_name: person_legal_name.into(),
            official_organizational_role: official_organizational_role.into(),
        }
    }

    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }
}

/// Credential attributes, one variant per credential type.
///
/// Serializes as the bare attribute object. There is no `Deserialize`: QVI
/// and LE payloads share a shape, so the type cannot be recovered from the
/// wire form alone. Deserialize the concrete payload struct instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CredentialData {
    QualifiedVleiIssuer(QviData),
    LegalEntity(LegalEntityData),
    EngagementContextRole(EcrData),
    OfficialOrganizationalRole(OorData),
}

impl CredentialData {
    /// The credential type these attributes belong to.
    pub fn tag(&self) -> CredentialTypeTag {
        match self {
            Self::QualifiedVleiIssuer(_) => CredentialTypeTag::QualifiedVleiIssuer,
            Self::LegalEntity(_) => CredentialTypeTag::LegalEntity,
            Self::EngagementContextRole(_) => CredentialTypeTag::EngagementContextRole,
            Self::OfficialOrganizationalRole(_) => CredentialTypeTag::OfficialOrganizationalRole,
        }
    }

    pub fn lei(&self) -> &str {
        match self {
            Self::QualifiedVleiIssuer(d) => &d.lei,
            Self::LegalEntity(d) => &d.lei,
            Self::EngagementContextRole(d) => &d.lei,
            Self::OfficialOrganizationalRole(d) => &d.lei,
        }
    }

    /// The issuee named inside the attributes.
    pub fn issuee(&self) -> &Aid {
        match self {
            Self::QualifiedVleiIssuer(d) => &d.issuee,
            Self::LegalEntity(d) => &d.issuee,
            Self::EngagementContextRole(d) => &d.issuee,
            Self::OfficialOrganizationalRole(d) => &d.issuee,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::QualifiedVleiIssuer(d) => d.timestamp,
            Self::LegalEntity(d) => d.timestamp,
            Self::EngagementContextRole(d) => d.timestamp,
            Self::OfficialOrganizationalRole(d) => d.timestamp,
        }
    }
}

impl From<QviData> for CredentialData {
    fn from(data: QviData) -> Self {
        Self::QualifiedVleiIssuer(data)
    }
}

impl From<LegalEntityData> for CredentialData {
    fn from(data: LegalEntityData) -> Self {
        Self::LegalEntity(data)
    }
}

impl From<EcrData> for CredentialData {
    fn from(data: EcrData) -> Self {
        Self::EngagementContextRole(data)
    }
}

impl From<OorData> for CredentialData {
    fn from(data: OorData) -> Self {
        Self::OfficialOrganizationalRole(data)
    }
}
