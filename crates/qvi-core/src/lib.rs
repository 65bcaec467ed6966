//! # qvi-core -- Foundational Types for the QVI Issuer
//!
//! This crate is the leaf of the workspace DAG. It owns the one piece of
//! cryptography every credential depends on: computing a Self-Addressing
//! Identifier (SAID) for a structured record.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** All digest computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests.
//!
//! 2. **Two-phase self-addressing.** A record is serialized with its label
//!    field (`d`) holding a placeholder of the final identifier's length,
//!    hashed, then finalized with the real value. No cyclic references.
//!
//! 3. **Self-describing identifiers.** Every computed [`Said`] starts with a
//!    derivation code naming its hash algorithm, so `E...` (BLAKE3-256) and
//!    `I...` (SHA2-256) identifiers can never be confused.
//!
//! 4. **Newtypes for identifiers.** [`Aid`] and [`Said`] are distinct types;
//!    an issuee AID cannot be passed where a schema SAID is expected.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `qvi-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod said;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use error::{CanonicalizationError, SaidError, ValidationError};
pub use identity::Aid;
pub use said::{DerivationCode, Said, SelfAddressing, Saider, DEFAULT_LABEL};
pub use temporal::Timestamp;
