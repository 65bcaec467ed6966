//! Credential store client error types.

/// Errors from credential store calls.
#[derive(Debug, thiserror::Error)]
pub enum StoreApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The store returned a non-2xx status.
    #[error("credential store {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The request could not be encoded as JSON.
    #[error("failed to encode request for {endpoint}: {source}")]
    Encoding {
        endpoint: String,
        source: serde_json::Error,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: serde_json::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
