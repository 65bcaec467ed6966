//! # qvi-store-client -- HTTP Credential Store
//!
//! [`HttpCredentialStore`] implements `qvi_issuer::CredentialStore` against
//! a KERI agent's REST interface. Each issuance is one JSON `POST`:
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | POST | `{base_url}/identifiers/{registryName}/credentials` | `IssuanceRequest` |
//!
//! The registry name is percent-encoded as a single path segment. Failures to
//! connect are retried with exponential backoff. A timeout or a response of
//! any status is final, so a request is never delivered twice. The agent's response body is returned untyped as the receipt,
//! since its shape belongs to the agent.

pub mod config;
pub mod error;
pub(crate) mod retry;

pub use config::{ConfigError, StoreClientConfig};
pub use error::StoreApiError;

use std::future::Future;
use std::time::Duration;

use qvi_issuer::{CredentialStore, IssuanceRequest};
use url::Url;

/// Credential store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCredentialStore {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpCredentialStore {
    /// Create a store client from configuration.
    pub fn new(config: StoreClientConfig) -> Result<Self, StoreApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(StoreApiError::Config(ConfigError::InvalidUrl(
                "base_url".into(),
                format!("{} cannot carry a path", config.base_url),
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!(
                        "Bearer {}",
                        config.api_token.as_str()
                    ))
                    .map_err(|_| StoreApiError::Config(ConfigError::InvalidToken))?,
                );
                headers
            })
            .build()
            .map_err(|e| StoreApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Build a store from `QVI_STORE_*` environment variables.
    pub fn from_env() -> Result<Self, StoreApiError> {
        Self::new(StoreClientConfig::from_env()?)
    }

    /// Submit an issuance request.
    ///
    /// Calls `POST {base_url}/identifiers/{registryName}/credentials`.
    pub async fn submit(
        &self,
        request: &IssuanceRequest,
    ) -> Result<serde_json::Value, StoreApiError> {
        let endpoint = format!("POST /identifiers/{}/credentials", request.registry_name());
        let url = self.credentials_url(request.registry_name())?;
        let body = serde_json::to_vec(request).map_err(|e| StoreApiError::Encoding {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        tracing::debug!(
            endpoint = %endpoint,
            schema = %request.schema_said(),
            bytes = body.len(),
            "submitting issuance request"
        );

        let resp = retry::retry_send(|| {
            self.http
                .post(url.clone())
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone())
                .send()
        })
        .await
        .map_err(|e| StoreApiError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreApiError::ApiError {
                endpoint,
                status,
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| StoreApiError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        if bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| StoreApiError::Deserialization {
            endpoint,
            source: e,
        })
    }

    fn credentials_url(&self, registry_name: &str) -> Result<Url, StoreApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StoreApiError::Config(ConfigError::InvalidUrl(
                    "base_url".into(),
                    format!("{} cannot carry a path", self.base_url),
                ))
            })?
            .pop_if_empty()
            .extend(["identifiers", registry_name, "credentials"]);
        Ok(url)
    }
}

impl CredentialStore for HttpCredentialStore {
    type Receipt = serde_json::Value;
    type Error = StoreApiError;

    fn issue(
        &self,
        request: IssuanceRequest,
    ) -> impl Future<Output = Result<serde_json::Value, StoreApiError>> + Send {
        async move { self.submit(&request).await }
    }
}
