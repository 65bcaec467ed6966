//! # Issuance Request
//!
//! The unit handed to a credential store. It carries the eight values of a
//! store `issue` call: registry name, registry AID, schema SAID, issuee AID,
//! credential data, rules block, edge block, and the revocation flag.
//!
//! Requests are only constructed by [`Issuer::prepare`](crate::Issuer::prepare),
//! after the edge and rules have been sealed and checked, and expose no
//! mutators.

use serde::Serialize;

use qvi_acdc::{CredentialData, CredentialTypeTag, EdgeBlock, Rule};
use qvi_core::{Aid, Said};

/// A validated, sealed issuance request.
///
/// Serializes with the field names credential stores expect:
///
/// ```json
/// {"registryName": "...", "registryAID": "...", "schemaSAID": "E...",
///  "issueeAID": "...", "data": {...}, "rule": {...}, "edge": {...},
///  "revoked": false}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceRequest {
    #[serde(skip)]
    tag: CredentialTypeTag,
    registry_name: String,
    #[serde(rename = "registryAID")]
    registry_aid: Aid,
    #[serde(rename = "schemaSAID")]
    schema_said: Said,
    #[serde(rename = "issueeAID")]
    issuee_aid: Aid,
    data: CredentialData,
    rule: Rule,
    edge: EdgeBlock,
    revoked: bool,
}

impl IssuanceRequest {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        tag: CredentialTypeTag,
        registry_name: String,
        registry_aid: Aid,
        schema_said: Said,
        issuee_aid: Aid,
        data: CredentialData,
        rule: Rule,
        edge: EdgeBlock,
    ) -> Self {
        Self {
            tag,
            registry_name,
            registry_aid,
            schema_said,
            issuee_aid,
            data,
            rule,
            edge,
            revoked: false,
        }
    }

    /// Credential type being issued.
    pub fn tag(&self) -> CredentialTypeTag {
        self.tag
    }

    pub fn registry_name(&self) -> &str {
        &self.registry_name
    }

    pub fn registry_aid(&self) -> &Aid {
        &self.registry_aid
    }

    pub fn schema_said(&self) -> &Said {
        &self.schema_said
    }

    pub fn issuee_aid(&self) -> &Aid {
        &self.issuee_aid
    }

    pub fn data(&self) -> &CredentialData {
        &self.data
    }

    /// The sealed rules block.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// The sealed edge block.
    pub fn edge(&self) -> &EdgeBlock {
        &self.edge
    }

    /// Always `false`: new credentials are never issued revoked.
    pub fn revoked(&self) -> bool {
        self.revoked
    }
}
