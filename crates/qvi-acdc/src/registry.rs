//! # Schema Registry
//!
//! Maps each [`CredentialTypeTag`] to the schema SAID credentials of that
//! type are issued under, the rules block they carry, and the edge slots
//! they must chain through.
//!
//! The vLEI table is built once per process and never mutated; every caller
//! shares the same `Arc`. Custom tables go through [`RegistryBuilder`],
//! which enforces the same invariants the vLEI table satisfies:
//!
//! - one record per tag, and no two tags sharing a schema SAID;
//! - every schema SAID decodes as a computed identifier;
//! - every slot names an upstream type that is itself registered;
//! - slot names are unique within a record and usable as edge slot names.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

use thiserror::Error;

use qvi_core::{Said, DEFAULT_LABEL};

use crate::edge::{EdgeBlock, EdgeError, EdgeNode, Operator};
use crate::rules::RuleSet;
use crate::tag::CredentialTypeTag;

const QVI_SCHEMA: &str = "EBfdlu8R27Fbx-ehrqwImnK-8Cm79sqbAQ4MmvEAYqao";
const LE_SCHEMA: &str = "ENPXp1vQzRF6JwIuS-mp2U8Uf1MoADoP_GqQ62VsDZWY";
const ECR_SCHEMA: &str = "EEy9PkikFcANV1l7EHukCeXqrzT1hNZjGlUk7wuMO5jw";
const OOR_SCHEMA: &str = "EBNaNu-M9P5cgrnfl2Fvymy4E_jvxxyjb70PRtiANlJy";

static VLEI: OnceLock<Arc<Registry>> = OnceLock::new();

/// Errors from registry construction and lookup.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No record for the requested credential type.
    #[error("unknown credential type: {0}")]
    UnknownCredentialType(String),

    #[error("credential type {0} registered twice")]
    DuplicateTag(CredentialTypeTag),

    /// Two credential types share one schema SAID.
    #[error("schema SAID {said} registered for both {first} and {second}")]
    DuplicateSchema {
        said: Said,
        first: CredentialTypeTag,
        second: CredentialTypeTag,
    },

    #[error("schema SAID {said:?} for {tag} is not a computed identifier")]
    MalformedSchemaSaid { tag: CredentialTypeTag, said: Said },

    /// A slot chains to a type the registry does not hold.
    #[error("slot {slot:?} of {tag} chains to unregistered type {upstream}")]
    UnknownUpstream {
        tag: CredentialTypeTag,
        slot: String,
        upstream: CredentialTypeTag,
    },

    /// A record's slot list repeats or reserves a name.
    #[error("slot {slot:?} of {tag} is duplicated or reserved")]
    InvalidSlotName { tag: CredentialTypeTag, slot: String },

    /// Root types chain to nothing, so no edge can be built for them.
    #[error("{0} is a root credential type and carries no edge")]
    RootType(CredentialTypeTag),

    #[error("{tag} has no edge slot {slot:?}")]
    UnknownSlot { tag: CredentialTypeTag, slot: String },

    #[error("{tag} requires edge slot {slot:?}")]
    MissingSlot { tag: CredentialTypeTag, slot: String },

    #[error(transparent)]
    Edge(#[from] EdgeError),
}

/// An edge slot a credential type must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequirement {
    /// Slot name inside the edge block.
    pub name: String,
    /// Credential type the slot must point at.
    pub upstream: CredentialTypeTag,
    /// Operator the slot's node must carry, if any.
    pub operator: Option<Operator>,
}

impl SlotRequirement {
    pub fn new(name: impl Into<String>, upstream: CredentialTypeTag) -> Self {
        Self {
            name: name.into(),
            upstream,
            operator: None,
        }
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }
}

/// Everything needed to issue one credential type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRecord {
    pub tag: CredentialTypeTag,
    pub schema_said: Said,
    pub rule: RuleSet,
    /// Required edge slots. Empty for root types.
    pub edge_slots: Vec<SlotRequirement>,
}

impl SchemaRecord {
    pub fn new(tag: CredentialTypeTag, schema_said: impl Into<Said>, rule: RuleSet) -> Self {
        Self {
            tag,
            schema_said: schema_said.into(),
            rule,
            edge_slots: Vec::new(),
        }
    }

    pub fn with_slot(mut self, slot: SlotRequirement) -> Self {
        self.edge_slots.push(slot);
        self
    }

    /// Returns true if credentials of this type chain to nothing.
    pub fn is_root(&self) -> bool {
        self.edge_slots.is_empty()
    }

    /// Look up a slot requirement by name.
    pub fn slot(&self, name: &str) -> Option<&SlotRequirement> {
        self.edge_slots.iter().find(|slot| slot.name == name)
    }

    /// Required slot names in declaration order.
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.edge_slots.iter().map(|slot| slot.name.as_str())
    }
}

/// An immutable credential type table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    records: BTreeMap<CredentialTypeTag, SchemaRecord>,
}

impl Registry {
    /// The process-wide vLEI table.
    pub fn vlei() -> &'static Registry {
        VLEI.get_or_init(|| Arc::new(Self::vlei_table()))
    }

    /// A shared handle to the process-wide vLEI table.
    pub fn shared() -> Arc<Registry> {
        Arc::clone(VLEI.get_or_init(|| Arc::new(Self::vlei_table())))
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    fn vlei_table() -> Self {
        let records = vlei_records()
            .into_iter()
            .map(|record| (record.tag, record))
            .collect();
        Self { records }
    }

    /// Look up the record for a credential type.
    pub fn resolve(&self, tag: CredentialTypeTag) -> Result<&SchemaRecord, RegistryError> {
        self.records
            .get(&tag)
            .ok_or_else(|| RegistryError::UnknownCredentialType(tag.to_string()))
    }

    /// Look up a record by short code (`"LE"`, `"ECR"`, ...).
    pub fn resolve_code(&self, code: &str) -> Result<&SchemaRecord, RegistryError> {
        self.resolve(code.parse()?)
    }

    /// Registered tags in order.
    pub fn tags(&self) -> impl Iterator<Item = CredentialTypeTag> + '_ {
        self.records.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build a sealed edge for `tag` from upstream credential SAIDs.
    ///
    /// `links` pairs each slot name with the SAID of the credential it points
    /// at. Schema SAIDs and operators come from the registry, so the result
    /// always has the shape `tag` requires.
    pub fn edge_for(
        &self,
        tag: CredentialTypeTag,
        links: &[(&str, Said)],
    ) -> Result<EdgeBlock, RegistryError> {
        let record = self.resolve(tag)?;
        if record.is_root() {
            return Err(RegistryError::RootType(tag));
        }

        let mut builder = EdgeBlock::builder();
        for (slot, said) in links {
            let requirement = record.slot(slot).ok_or_else(|| RegistryError::UnknownSlot {
                tag,
                slot: slot.to_string(),
            })?;
            let upstream = self.resolve(requirement.upstream)?;
            let mut node = EdgeNode::new(said.clone(), upstream.schema_said.clone());
            node.operator = requirement.operator;
            builder = builder.slot(*slot, node);
        }
        if let Some(missing) = record
            .slot_names()
            .find(|name| !links.iter().any(|(slot, _)| *slot == *name))
        {
            return Err(RegistryError::MissingSlot {
                tag,
                slot: missing.to_string(),
            });
        }
        Ok(builder.build()?)
    }
}

fn vlei_records() -> Vec<SchemaRecord> {
    use CredentialTypeTag::*;

    let auth = SlotRequirement::new("auth", LegalEntity).with_operator(Operator::IssuerToIssuee);
    vec![
        SchemaRecord::new(QualifiedVleiIssuer, QVI_SCHEMA, RuleSet::Standard),
        SchemaRecord::new(LegalEntity, LE_SCHEMA, RuleSet::Standard)
            .with_slot(SlotRequirement::new("qvi", QualifiedVleiIssuer)),
        SchemaRecord::new(EngagementContextRole, ECR_SCHEMA, RuleSet::WithPrivacy)
            .with_slot(auth.clone()),
        SchemaRecord::new(OfficialOrganizationalRole, OOR_SCHEMA, RuleSet::Standard)
            .with_slot(auth),
    ]
}

/// Builder for custom registries.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    records: Vec<SchemaRecord>,
}

impl RegistryBuilder {
    /// Start from the vLEI records.
    pub fn from_vlei() -> Self {
        Self {
            records: vlei_records(),
        }
    }

    pub fn register(mut self, record: SchemaRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Validate and freeze the table.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut records: BTreeMap<CredentialTypeTag, SchemaRecord> = BTreeMap::new();
        let mut schemas: BTreeMap<Said, CredentialTypeTag> = BTreeMap::new();

        for record in self.records {
            if records.contains_key(&record.tag) {
                return Err(RegistryError::DuplicateTag(record.tag));
            }
            if record.schema_said.decode().is_err() {
                return Err(RegistryError::MalformedSchemaSaid {
                    tag: record.tag,
                    said: record.schema_said,
                });
            }
            if let Some(first) = schemas.get(&record.schema_said) {
                return Err(RegistryError::DuplicateSchema {
                    said: record.schema_said,
                    first: *first,
                    second: record.tag,
                });
            }
            let mut names = BTreeSet::new();
            for slot in &record.edge_slots {
                if slot.name.is_empty() || slot.name == DEFAULT_LABEL || !names.insert(&slot.name) {
                    return Err(RegistryError::InvalidSlotName {
                        tag: record.tag,
                        slot: slot.name.clone(),
                    });
                }
            }
            schemas.insert(record.schema_said.clone(), record.tag);
            records.insert(record.tag, record);
        }

        for record in records.values() {
            for slot in &record.edge_slots {
                if !records.contains_key(&slot.upstream) {
                    return Err(RegistryError::UnknownUpstream {
                        tag: record.tag,
                        slot: slot.name.clone(),
                        upstream: slot.upstream,
                    });
                }
            }
        }

        Ok(Registry { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CredentialTypeTag::*;

    #[test]
    fn vlei_table_schema_saids() {
        let registry = Registry::vlei();
        assert_eq!(registry.len(), 4);
        for (tag, said) in [
            (QualifiedVleiIssuer, QVI_SCHEMA),
            (LegalEntity, LE_SCHEMA),
            (EngagementContextRole, ECR_SCHEMA),
            (OfficialOrganizationalRole, OOR_SCHEMA),
        ] {
            assert_eq!(registry.resolve(tag).unwrap().schema_said.as_str(), said);
        }
    }

    #[test]
    fn vlei_table_slots() {
        let registry = Registry::vlei();
        assert!(registry.resolve(QualifiedVleiIssuer).unwrap().is_root());

        let le = registry.resolve(LegalEntity).unwrap();
        assert_eq!(le.edge_slots, [SlotRequirement::new("qvi", QualifiedVleiIssuer)]);

        for tag in [EngagementContextRole, OfficialOrganizationalRole] {
            let record = registry.resolve(tag).unwrap();
            let auth = record.slot("auth").unwrap();
            assert_eq!(auth.upstream, LegalEntity);
            assert_eq!(auth.operator, Some(Operator::IssuerToIssuee));
        }
        assert_eq!(
            registry.resolve(EngagementContextRole).unwrap().rule,
            RuleSet::WithPrivacy
        );
    }

    #[test]
    fn vlei_table_passes_builder_checks() {
        let built = RegistryBuilder::from_vlei().build().unwrap();
        assert_eq!(&built, Registry::vlei());
    }

    #[test]
    fn shared_handles_point_at_one_table() {
        let a = Registry::shared();
        let b = Registry::shared();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(std::ptr::eq(a.as_ref(), Registry::vlei()));
    }

    #[test]
    fn resolve_code() {
        let record = Registry::vlei().resolve_code("OOR").unwrap();
        assert_eq!(record.tag, OfficialOrganizationalRole);
        assert!(matches!(
            Registry::vlei().resolve_code("XYZ"),
            Err(RegistryError::UnknownCredentialType(code)) if code == "XYZ"
        ));
    }

    #[test]
    fn custom_registry_misses_unregistered_type() {
        let registry = Registry::builder()
            .register(SchemaRecord::new(QualifiedVleiIssuer, QVI_SCHEMA, RuleSet::Standard))
            .build()
            .unwrap();
        assert!(matches!(
            registry.resolve(LegalEntity),
            Err(RegistryError::UnknownCredentialType(_))
        ));
    }

    #[test]
    fn builder_rejects_duplicate_tag() {
        let err = RegistryBuilder::from_vlei()
            .register(SchemaRecord::new(LegalEntity, ECR_SCHEMA, RuleSet::Standard))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTag(LegalEntity)));
    }

    #[test]
    fn builder_rejects_shared_schema() {
        let err = Registry::builder()
            .register(SchemaRecord::new(QualifiedVleiIssuer, QVI_SCHEMA, RuleSet::Standard))
            .register(SchemaRecord::new(LegalEntity, QVI_SCHEMA, RuleSet::Standard))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateSchema { first: QualifiedVleiIssuer, second: LegalEntity, .. }
        ));
    }

    #[test]
    fn builder_rejects_malformed_schema_said() {
        let err = Registry::builder()
            .register(SchemaRecord::new(QualifiedVleiIssuer, "not a said", RuleSet::Standard))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::MalformedSchemaSaid { .. }));
    }

    #[test]
    fn builder_rejects_unregistered_upstream() {
        let err = Registry::builder()
            .register(
                SchemaRecord::new(LegalEntity, LE_SCHEMA, RuleSet::Standard)
                    .with_slot(SlotRequirement::new("qvi", QualifiedVleiIssuer)),
            )
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnknownUpstream { upstream: QualifiedVleiIssuer, .. }
        ));
    }

    #[test]
    fn builder_rejects_bad_slot_names() {
        for slots in [vec!["d"], vec!["qvi", "qvi"], vec![""]] {
            let mut record = SchemaRecord::new(LegalEntity, LE_SCHEMA, RuleSet::Standard);
            for name in slots {
                record = record.with_slot(SlotRequirement::new(name, QualifiedVleiIssuer));
            }
            let err = Registry::builder()
                .register(SchemaRecord::new(QualifiedVleiIssuer, QVI_SCHEMA, RuleSet::Standard))
                .register(record)
                .build()
                .unwrap_err();
            assert!(matches!(err, RegistryError::InvalidSlotName { .. }));
        }
    }

    #[test]
    fn edge_for_legal_entity() {
        let edge = Registry::vlei()
            .edge_for(LegalEntity, &[("qvi", Said::from("said"))])
            .unwrap();
        assert_eq!(
            edge.said().unwrap().as_str(),
            "EBXFKc37aSCngzHUOX0Rfxq0l2JNS8SBDzzkHamXpkle"
        );
    }

    #[test]
    fn edge_for_role_credentials_carries_operator() {
        for tag in [EngagementContextRole, OfficialOrganizationalRole] {
            let edge = Registry::vlei()
                .edge_for(tag, &[("auth", Said::from("a SAID"))])
                .unwrap();
            assert_eq!(
                edge.said().unwrap().as_str(),
                "EO_ctStrce0aXRVzoD6Ej_vn6YCsovl5A-WMLaQGlvzs"
            );
            assert_eq!(
                edge.slot("auth").unwrap().operator,
                Some(Operator::IssuerToIssuee)
            );
        }
    }

    #[test]
    fn edge_for_rejects_bad_links() {
        let registry = Registry::vlei();
        assert!(matches!(
            registry.edge_for(QualifiedVleiIssuer, &[]),
            Err(RegistryError::RootType(QualifiedVleiIssuer))
        ));
        assert!(matches!(
            registry.edge_for(LegalEntity, &[]),
            Err(RegistryError::MissingSlot { slot, .. }) if slot == "qvi"
        ));
        assert!(matches!(
            registry.edge_for(LegalEntity, &[("auth", Said::from("x"))]),
            Err(RegistryError::UnknownSlot { slot, .. }) if slot == "auth"
        ));
        assert!(matches!(
            registry.edge_for(
                LegalEntity,
                &[("qvi", Said::from("x")), ("qvi", Said::from("y"))]
            ),
            Err(RegistryError::Edge(EdgeError::DuplicateSlot(_)))
        ));
    }
}
