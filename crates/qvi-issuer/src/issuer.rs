//! # Issuer Orchestrator
//!
//! Turns (credential type, issuee, payload, edge) into one issuance request
//! and submits it.
//!
//! ## Checks, in order
//!
//! 1. The registry knows the credential type.
//! 2. The payload variant belongs to that type.
//! 3. The type chains to something (root types are issued elsewhere).
//! 4. The edge has exactly the required slots, each with the required
//!    operator.
//! 5. Every slot's schema SAID is the schema of the upstream type the slot
//!    must point at. This is what stops an ECR being chained to a QVI
//!    credential where an LE credential is required.
//! 6. The edge SAID is computed if absent, or confirmed if supplied.
//!
//! Then the rules block is sealed and the request assembled with
//! `revoked = false`. All of this happens in [`Issuer::prepare`] before the
//! store is touched; [`Issuer::issue`] adds exactly one store call.

use std::sync::Arc;

use tracing::{debug, info, warn};

use qvi_acdc::{
    CredentialData, CredentialTypeTag, EcrData, EdgeBlock, LegalEntityData, OorData, Operator,
    Registry,
};
use qvi_core::{Aid, SelfAddressing};

use crate::error::IssuanceError;
use crate::request::IssuanceRequest;
use crate::store::CredentialStore;

/// Issues vLEI credentials from one credential registry.
#[derive(Debug)]
pub struct Issuer<S> {
    store: S,
    registry: Arc<Registry>,
    registry_name: String,
    registry_aid: Aid,
}

impl<S> Issuer<S> {
    /// Create an issuer over the vLEI schema table.
    ///
    /// `registry_name` and `registry_aid` identify the credential registry
    /// every credential from this issuer is anchored in.
    pub fn new(store: S, registry_name: impl Into<String>, registry_aid: Aid) -> Self {
        Self {
            store,
            registry: Registry::shared(),
            registry_name: registry_name.into(),
            registry_aid,
        }
    }

    /// Replace the schema table.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_name(&self) -> &str {
        &self.registry_name
    }

    pub fn registry_aid(&self) -> &Aid {
        &self.registry_aid
    }

    /// Validate and seal everything needed for an issuance, without
    /// contacting the store.
    pub fn prepare(
        &self,
        tag: CredentialTypeTag,
        issuee: Aid,
        data: CredentialData,
        edge: EdgeBlock,
    ) -> Result<IssuanceRequest, IssuanceError> {
        let record = self.registry.resolve(tag)?;

        if data.tag() != tag {
            return Err(IssuanceError::PayloadTypeMismatch {
                expected: tag,
                found: data.tag(),
            });
        }
        if record.is_root() {
            return Err(IssuanceError::InvalidEdgeShape {
                tag,
                reason: "root credentials carry no edge".into(),
            });
        }

        if let Some(extra) = edge.slot_names().find(|name| record.slot(name).is_none()) {
            return Err(IssuanceError::InvalidEdgeShape {
                tag,
                reason: format!("unexpected slot {extra:?}"),
            });
        }
        for requirement in &record.edge_slots {
            let node = edge
                .slot(&requirement.name)
                .ok_or_else(|| IssuanceError::InvalidEdgeShape {
                    tag,
                    reason: format!("missing slot {:?}", requirement.name),
                })?;
            if node.operator != requirement.operator {
                return Err(IssuanceError::InvalidEdgeShape {
                    tag,
                    reason: format!(
                        "slot {:?} has operator {}, expected {}",
                        requirement.name,
                        operator_name(node.operator),
                        operator_name(requirement.operator),
                    ),
                });
            }
            let upstream = self.registry.resolve(requirement.upstream)?;
            if node.schema != upstream.schema_said {
                warn!(
                    credential_type = %tag,
                    slot = %requirement.name,
                    expected = %upstream.schema_said,
                    found = %node.schema,
                    "rejected edge chaining to the wrong credential type"
                );
                return Err(IssuanceError::EdgeTypeMismatch {
                    tag,
                    slot: requirement.name.clone(),
                    upstream: requirement.upstream,
                    expected: upstream.schema_said.clone(),
                    found: node.schema.clone(),
                });
            }
        }

        let edge = match edge.said().cloned() {
            None => edge.seal()?,
            Some(stored) => {
                let computed = edge.compute_said()?;
                if computed != stored {
                    return Err(IssuanceError::EdgeSaidMismatch { stored, computed });
                }
                edge
            }
        };
        let rule = record.rule.sealed()?;
        debug!(
            credential_type = %tag,
            edge = ?edge.said(),
            rule = ?rule.said,
            "sealed edge and rules"
        );

        Ok(IssuanceRequest::new(
            tag,
            self.registry_name.clone(),
            self.registry_aid.clone(),
            record.schema_said.clone(),
            issuee,
            data,
            rule,
            edge,
        ))
    }
}

impl<S: CredentialStore> Issuer<S> {
    /// Prepare an issuance and submit it to the store.
    ///
    /// The store is called exactly once on success of [`prepare`](Self::prepare)
    /// and never otherwise. Its receipt is returned as-is.
    pub async fn issue(
        &self,
        tag: CredentialTypeTag,
        issuee: Aid,
        data: CredentialData,
        edge: EdgeBlock,
    ) -> Result<S::Receipt, IssuanceError> {
        let request = self.prepare(tag, issuee, data, edge)?;
        let schema = request.schema_said().clone();
        let issuee = request.issuee_aid().clone();

        let receipt = self.store.issue(request).await.map_err(|e| {
            warn!(credential_type = %tag, issuee = %issuee, error = %e, "credential store failed");
            IssuanceError::Store(Box::new(e))
        })?;

        info!(
            credential_type = %tag,
            schema = %schema,
            issuee = %issuee,
            registry = %self.registry_name,
            "credential issued"
        );
        Ok(receipt)
    }

    /// Issue a Legal Entity credential chained to a QVI credential.
    pub async fn create_legal_entity_credential(
        &self,
        issuee: Aid,
        data: LegalEntityData,
        edge: EdgeBlock,
    ) -> Result<S::Receipt, IssuanceError> {
        self.issue(CredentialTypeTag::LegalEntity, issuee, data.into(), edge)
            .await
    }

    /// Issue an Engagement Context Role credential chained to an LE credential.
    pub async fn create_engagement_context_role_credential(
        &self,
        issuee: Aid,
        data: EcrData,
        edge: EdgeBlock,
    ) -> Result<S::Receipt, IssuanceError> {
        self.issue(CredentialTypeTag::EngagementContextRole, issuee, data.into(), edge)
            .await
    }

    /// Issue an Official Organizational Role credential chained to an LE
    /// credential.
    pub async fn create_official_organizational_role_credential(
        &self,
        issuee: Aid,
        data: OorData,
        edge: EdgeBlock,
    ) -> Result<S::Receipt, IssuanceError> {
        self.issue(
            CredentialTypeTag::OfficialOrganizationalRole,
            issuee,
            data.into(),
            edge,
        )
        .await
    }
}

fn operator_name(operator: Option<Operator>) -> &'static str {
    operator.map_or("none", |op| op.as_str())
}
