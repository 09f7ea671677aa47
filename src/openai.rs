//! HTTP client configuration for OpenAI-compatible endpoints.

use crate::error::{RecapError, Result};
use std::time::Duration;

/// Create an HTTP client, optionally bounded by a request timeout.
///
/// With `None` a request waits as long as the remote end takes.
pub fn create_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| RecapError::Config(format!("Failed to create HTTP client: {}", e)))
}
