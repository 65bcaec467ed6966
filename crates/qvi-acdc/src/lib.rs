//! # qvi-acdc -- ACDC Building Blocks for vLEI Issuance
//!
//! - **Tags** (`tag.rs`): the closed set of vLEI credential types.
//!
//! - **Edges** (`edge.rs`): [`EdgeNode`] links and the [`EdgeBlock`] that
//!   collects them under named slots and carries its own SAID.
//!
//! - **Rules** (`rules.rs`): the SAID-bearing disclaimer blocks each
//!   credential type is issued under.
//!
//! - **Payloads** (`data.rs`): [`CredentialData`], one variant per issuable
//!   credential type.
//!
//! - **Registry** (`registry.rs`): the immutable table from credential type to
//!   schema SAID, rule set, and required edge slots.
//!
//! ## Security Invariant
//!
//! Every SAID in this crate is produced by `qvi_core::Saider` over
//! `CanonicalBytes`. Edge slot order never reaches the digest: the edge block
//! emits its slots in lexicographic order whatever order they were added in.

pub mod data;
pub mod edge;
pub mod registry;
pub mod rules;
pub mod tag;

pub use data::{CredentialData, EcrData, LegalEntityData, OorData, QviData};
pub use edge::{build_edge, EdgeBlock, EdgeBuilder, EdgeError, EdgeNode, Operator};
pub use registry::{Registry, RegistryBuilder, RegistryError, SchemaRecord, SlotRequirement};
pub use rules::{Disclaimer, Rule, RuleSet};
pub use tag::CredentialTypeTag;
