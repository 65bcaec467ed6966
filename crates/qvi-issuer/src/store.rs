//! # Credential Store Boundary
//!
//! [`CredentialStore`] is the only suspension point in an issuance: the
//! orchestrator prepares a request synchronously, then awaits exactly one
//! `issue` call. What the store does with the request (anchoring it in a
//! registry, signing, delivering to the issuee) is outside this crate, and
//! its receipt type is opaque here.
//!
//! [`RecordingStore`] keeps every request in memory and is what the tests
//! in this workspace issue against.

use std::future::Future;

use parking_lot::Mutex;

use crate::request::IssuanceRequest;

/// An external service that accepts issuance requests.
///
/// Implementations must be `Send + Sync` so an issuer can be shared across
/// tasks behind an `Arc`.
pub trait CredentialStore: Send + Sync {
    /// Whatever the store returns on success.
    type Receipt: Send;
    /// Store failure, propagated to the caller unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Submit one issuance request.
    fn issue(
        &self,
        request: IssuanceRequest,
    ) -> impl Future<Output = Result<Self::Receipt, Self::Error>> + Send;
}

/// Failure returned by a [`RecordingStore`] built with
/// [`RecordingStore::failing`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("recording store rejected request: {0}")]
pub struct RecordingStoreError(pub String);

/// In-memory store that records every request it receives.
///
/// The receipt is the request's zero-based position in the log. A failing
/// store still records the request before rejecting it, so tests can tell
/// "never called" apart from "called and failed".
#[derive(Debug, Default)]
pub struct RecordingStore {
    requests: Mutex<Vec<IssuanceRequest>>,
    failure: Option<String>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every request with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Number of `issue` calls received.
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// Copy of every request received, in call order.
    pub fn requests(&self) -> Vec<IssuanceRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request, if any.
    pub fn last(&self) -> Option<IssuanceRequest> {
        self.requests.lock().last().cloned()
    }
}

impl CredentialStore for RecordingStore {
    type Receipt = usize;
    type Error = RecordingStoreError;

    fn issue(
        &self,
        request: IssuanceRequest,
    ) -> impl Future<Output = Result<usize, RecordingStoreError>> + Send {
        let result = {
            let mut log = self.requests.lock();
            log.push(request);
            match &self.failure {
                Some(message) => Err(RecordingStoreError(message.clone())),
                None => Ok(log.len() - 1),
            }
        };
        std::future::ready(result)
    }
}
