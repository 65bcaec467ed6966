//! # qvi-issuer -- vLEI Issuance Orchestrator
//!
//! Assembles credential data, a chaining edge, and a rules block into a
//! single [`IssuanceRequest`], then submits it to a [`CredentialStore`].
//!
//! ## Flow
//!
//! ```text
//! Issuer::issue(tag, issuee, data, edge)
//!   ├── Registry::resolve(tag)          schema SAID, rules, required slots
//!   ├── edge shape + chain type checks  before any I/O
//!   ├── seal edge `d`, seal rules `d`
//!   └── CredentialStore::issue(request) exactly once
//! ```
//!
//! The issuer holds no mutable state. It is `Send + Sync` whenever its store
//! is, and concurrent issuances share nothing but the immutable registry.
//!
//! Stores live outside this crate. [`RecordingStore`] is an in-memory
//! implementation for tests; the HTTP implementation is in
//! `qvi-store-client`.

pub mod error;
pub mod issuer;
pub mod request;
pub mod store;

pub use error::IssuanceError;
pub use issuer::Issuer;
pub use request::IssuanceRequest;
pub use store::{CredentialStore, RecordingStore, RecordingStoreError};
