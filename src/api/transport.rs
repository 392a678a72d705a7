//! Shared HTTP transport for the chat and weather clients.

use std::time::Duration;

/// Build an HTTP client, applying a timeout only when one is configured.
pub(crate) fn build_http_client(timeout: Option<Duration>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    // Fall back to reqwest defaults if builder creation fails for any reason.
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}
