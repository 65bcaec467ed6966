//! # Edge Blocks
//!
//! An edge links a credential to the credentials it is chained from. Each
//! link is an [`EdgeNode`]: the referenced credential's SAID (`n`), that
//! credential's schema SAID (`s`), and an optional [`Operator`] (`o`).
//! Links are collected under named slots in an [`EdgeBlock`], which is
//! itself self-addressing through its `d` field.
//!
//! ## Wire Shape
//!
//! ```json
//! {"d": "E...", "auth": {"n": "E...", "s": "E...", "o": "I2I"}}
//! ```
//!
//! `d` always comes first. Slots follow in lexicographic order of their
//! names, so the digest does not depend on the order slots were added in.
//! The in-memory order is insertion order and is what [`EdgeBlock::slots`]
//! yields.
//!
//! The builder checks structure only (non-empty, unique, not reserved). It
//! knows nothing about which slots a credential type requires; the issuer
//! checks that against the registry.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use qvi_core::{Said, SaidError, SelfAddressing, DEFAULT_LABEL};

/// Errors building an edge block.
#[derive(Error, Debug)]
pub enum EdgeError {
    /// An edge block must link to at least one credential.
    #[error("edge block needs at least one slot")]
    Empty,

    /// Two slots share a name.
    #[error("duplicate edge slot {0:?}")]
    DuplicateSlot(String),

    /// The slot name is empty or collides with the SAID label.
    #[error("edge slot name {0:?} is reserved")]
    ReservedSlotName(String),

    /// The completed block could not be digested.
    #[error("edge SAID computation failed: {0}")]
    Said(#[from] SaidError),
}

/// Constraint an edge places on the issuer/issuee relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// The issuer of this credential must be the issuee of the referenced one.
    #[serde(rename = "I2I")]
    IssuerToIssuee,
    /// No issuer/issuee constraint.
    #[serde(rename = "NI2I")]
    NotIssuerToIssuee,
    /// The issuer may be a delegate of the referenced credential's issuee.
    #[serde(rename = "DI2I")]
    DelegatedIssuerToIssuee,
}

impl Operator {
    /// Returns the wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IssuerToIssuee => "I2I",
            Self::NotIssuerToIssuee => "NI2I",
            Self::DelegatedIssuerToIssuee => "DI2I",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One link from an edge block to another credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeNode {
    /// SAID of the referenced credential.
    #[serde(rename = "n")]
    pub node: Said,
    /// Schema SAID of the referenced credential.
    #[serde(rename = "s")]
    pub schema: Said,
    /// Optional issuer/issuee constraint.
    #[serde(rename = "o", default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
}

impl EdgeNode {
    /// A link without an operator.
    pub fn new(node: impl Into<Said>, schema: impl Into<Said>) -> Self {
        Self {
            node: node.into(),
            schema: schema.into(),
            operator: None,
        }
    }

    /// Attach an operator to this link.
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }
}

/// A self-addressing collection of named edge links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeBlock {
    said: Option<Said>,
    slots: Vec<(String, EdgeNode)>,
}

impl EdgeBlock {
    /// Start building an edge block.
    pub fn builder() -> EdgeBuilder {
        EdgeBuilder::default()
    }

    /// The stored SAID, if sealed.
    pub fn said(&self) -> Option<&Said> {
        self.said.as_ref()
    }

    /// Returns true once `d` holds a value.
    pub fn is_sealed(&self) -> bool {
        self.said.is_some()
    }

    /// Slots in insertion order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &EdgeNode)> {
        self.slots.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Slot names in insertion order.
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(name, _)| name.as_str())
    }

    /// Look up a slot by name.
    pub fn slot(&self, name: &str) -> Option<&EdgeNode> {
        self.slots
            .iter()
            .find(|(slot, _)| slot == name)
            .map(|(_, node)| node)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the block has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in hashing order.
    fn canonical_slots(&self) -> Vec<&(String, EdgeNode)> {
        let mut ordered: Vec<&(String, EdgeNode)> = self.slots.iter().collect();
        ordered.sort_by(|a, b| a.0.cmp(&b.0));
        ordered
    }
}

impl SelfAddressing for EdgeBlock {
    fn said(&self) -> Option<&Said> {
        self.said.as_ref()
    }

    fn set_said(&mut self, said: Said) {
        self.said = Some(said);
    }
}

impl Serialize for EdgeBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len() + 1))?;
        map.serialize_entry(DEFAULT_LABEL, &self.said)?;
        for (name, node) in self.canonical_slots() {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EdgeBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EdgeBlockVisitor;

        impl<'de> Visitor<'de> for EdgeBlockVisitor {
            type Value = EdgeBlock;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an edge block object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<EdgeBlock, A::Error> {
                let mut said = None;
                let mut slots: Vec<(String, EdgeNode)> = Vec::new();
                while let Some(key) = access.next_key::<String>()? {
                    if key == DEFAULT_LABEL {
                        // An empty `d` is the unsealed placeholder.
                        said = access
                            .next_value::<Option<Said>>()?
                            .filter(|said| !said.as_str().is_empty());
                        continue;
                    }
                    if slots.iter().any(|(name, _)| *name == key) {
                        return Err(de::Error::custom(format!("duplicate edge slot {key:?}")));
                    }
                    let node = access.next_value::<EdgeNode>()?;
                    slots.push((key, node));
                }
                Ok(EdgeBlock { said, slots })
            }
        }

        deserializer.deserialize_map(EdgeBlockVisitor)
    }
}

/// Builder for [`EdgeBlock`].
///
/// Slot problems are reported by [`build`](EdgeBuilder::build), so calls can
/// be chained.
#[derive(Debug, Clone, Default)]
pub struct EdgeBuilder {
    slots: Vec<(String, EdgeNode)>,
}

impl EdgeBuilder {
    /// Add a named link.
    pub fn slot(mut self, name: impl Into<String>, node: EdgeNode) -> Self {
        self.slots.push((name.into(), node));
        self
    }

    /// Validate the slots and compute the block's SAID.
    pub fn build(self) -> Result<EdgeBlock, EdgeError> {
        Ok(self.build_unsealed()?.seal()?)
    }

    /// Validate the slots without computing `d`.
    ///
    /// The issuer seals unsealed edges itself, so callers that only hold the
    /// upstream SAIDs may stop here.
    pub fn build_unsealed(self) -> Result<EdgeBlock, EdgeError> {
        if self.slots.is_empty() {
            return Err(EdgeError::Empty);
        }
        for (i, (name, _)) in self.slots.iter().enumerate() {
            if name.is_empty() || name == DEFAULT_LABEL {
                return Err(EdgeError::ReservedSlotName(name.clone()));
            }
            if self.slots[..i].iter().any(|(prev, _)| prev == name) {
                return Err(EdgeError::DuplicateSlot(name.clone()));
            }
        }
        Ok(EdgeBlock {
            said: None,
            slots: self.slots,
        })
    }
}

/// Build and seal an edge block from named links.
pub fn build_edge<I, S>(slots: I) -> Result<EdgeBlock, EdgeError>
where
    I: IntoIterator<Item = (S, EdgeNode)>,
    S: Into<String>,
{
    slots
        .into_iter()
        .fold(EdgeBlock::builder(), |builder, (name, node)| builder.slot(name, node))
        .build()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn node() -> impl Strategy<Value = EdgeNode> {
        ("[ -~]{1,30}", "[A-Za-z0-9_-]{44}", any::<bool>()).prop_map(|(n, s, op)| {
            let node = EdgeNode::new(n, s);
            if op {
                node.with_operator(Operator::IssuerToIssuee)
            } else {
                node
            }
        })
    }

    proptest! {
        #[test]
        fn rebuilding_reproduces_said(
            slots in prop::collection::btree_map("[a-z]{2,8}", node(), 1..5)
        ) {
            let first = build_edge(slots.clone()).unwrap();
            let second = build_edge(slots).unwrap();
            prop_assert_eq!(first.said(), second.said());
            prop_assert!(first.verify_said().unwrap());
        }

        #[test]
        fn slot_order_never_reaches_the_digest(
            slots in prop::collection::btree_map("[a-z]{2,8}", node(), 1..5)
        ) {
            let forward = build_edge(slots.clone()).unwrap();
            let reversed = build_edge(slots.into_iter().rev()).unwrap();
            prop_assert_eq!(forward.said(), reversed.said());
        }

        #[test]
        fn changing_a_node_changes_the_said(n in "[ -~]{1,30}", m in "[ -~]{1,30}") {
            prop_assume!(n != m);
            let schema = "ENPXp1vQzRF6JwIuS-mp2U8Uf1MoADoP_GqQ62VsDZWY";
            let left = build_edge([("auth", EdgeNode::new(n, schema))]).unwrap();
            let right = build_edge([("auth", EdgeNode::new(m, schema))]).unwrap();
            prop_assert_ne!(left.said(), right.said());
        }
    }
}
