// src/error.rs

use thiserror::Error;

/// Failures reported by the completion provider. Quota, credential and
/// rate-limit conditions are kept distinct because the HTTP layer maps
/// each to its own status code; everything else collapses downstream.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion provider quota exhausted: {0}")]
    QuotaExceeded(String),
    #[error("completion provider API key is invalid or missing")]
    InvalidApiKey,
    #[error("completion provider rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected completion response: {0}")]
    Unexpected(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}
