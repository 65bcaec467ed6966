//! Connection retry for credential store HTTP calls.
//!
//! Issuance is not idempotent: once the agent has the request body, sending
//! it again may issue a second credential. Only failures to connect are
//! retried, since the request never left the client. Timeouts, body errors
//! and every response that arrives are final.

use std::time::Duration;

/// Maximum number of reconnect attempts after the initial request.
const MAX_RETRIES: u32 = 3;

/// Delay before the first reconnect, doubled per attempt: 200ms, 400ms, 800ms.
const BASE_DELAY_MS: u64 = 200;

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BASE_DELAY_MS << attempt)
}

/// Send a request, reconnecting with exponential backoff while the agent is
/// unreachable.
///
/// `send` is called at most `MAX_RETRIES + 1` times, and more than once only
/// when every earlier call failed to connect. The caller inspects the status.
pub(crate) async fn retry_send<F, Fut>(send: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt = 0;
    loop {
        let err = match send().await {
            Ok(resp) => return Ok(resp),
            Err(err) if err.is_connect() && attempt < MAX_RETRIES => err,
            Err(err) => return Err(err),
        };
        let delay = backoff(attempt);
        attempt += 1;
        tracing::warn!(
            attempt,
            max_retries = MAX_RETRIES,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "credential store unreachable, reconnecting"
        );
        tokio::time::sleep(delay).await;
    }
}
