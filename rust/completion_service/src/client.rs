// src/client.rs

use crate::error::CompletionError;
use crate::models::{ApiErrorEnvelope, ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Fixed model identifier sent with every request.
pub const DEFAULT_MODEL: &str = "gpt-4o";
/// Maximum-output-token budget for a single analysis.
pub const MAX_COMPLETION_TOKENS: usize = 4000;
/// Fixed sampling temperature.
pub const TEMPERATURE: f32 = 0.7;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl CompletionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        CompletionConfig {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read the credential from `OPENAI_API_KEY`; `OPENAI_API_BASE`
    /// optionally overrides the endpoint.
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            CompletionError::Configuration(
                "OPENAI_API_KEY environment variable not set".to_string(),
            )
        })?;

        let mut config = Self::new(api_key);
        if let Ok(api_base) = std::env::var("OPENAI_API_BASE") {
            config.api_base = api_base;
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Seam for the orchestrator; tests substitute a stub implementation.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Single-turn, non-streaming completion of one user prompt.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

pub struct CompletionClient {
    http: Client,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(CompletionClient { http, config })
    }
}

#[async_trait]
impl CompletionProvider for CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: MAX_COMPLETION_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let parsed: ChatResponse = response.json().await.map_err(|err| {
            CompletionError::Unexpected(format!("failed to parse response: {err}"))
        })?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "completion tokens: {} in / {} out",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Unexpected("no choices in response".to_string()))?;

        Ok(choice.message.content)
    }
}

/// Map a non-2xx provider response to the error taxonomy. The error
/// envelope's `code`/`type` is more specific than the status: quota
/// exhaustion arrives as HTTP 429 just like ordinary rate limiting.
fn classify_failure(status: StatusCode, body: &str) -> CompletionError {
    let api_error = serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error);
    let code = api_error
        .as_ref()
        .and_then(|err| err.code.clone().or_else(|| err.kind.clone()))
        .unwrap_or_default();
    let message = api_error
        .and_then(|err| err.message)
        .unwrap_or_else(|| body.to_string());

    if code == "insufficient_quota" {
        return CompletionError::QuotaExceeded(message);
    }
    if status == StatusCode::UNAUTHORIZED || code == "invalid_api_key" {
        return CompletionError::InvalidApiKey;
    }
    if status == StatusCode::TOO_MANY_REQUESTS || code == "rate_limit_exceeded" {
        return CompletionError::RateLimited(message);
    }
    CompletionError::Unexpected(format!("HTTP {status}: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_quota_before_rate_limit() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","code":"insufficient_quota"}}"#;
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, body);
        assert!(matches!(err, CompletionError::QuotaExceeded(_)));
    }

    #[test]
    fn test_classify_invalid_key() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        let err = classify_failure(StatusCode::UNAUTHORIZED, body);
        assert!(matches!(err, CompletionError::InvalidApiKey));
    }

    #[test]
    fn test_classify_rate_limit() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests","code":"rate_limit_exceeded"}}"#;
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, body);
        assert!(matches!(err, CompletionError::RateLimited(_)));
    }

    #[test]
    fn test_classify_unparseable_body_falls_back_to_status() {
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "gateway timeout");
        match err {
            CompletionError::Unexpected(message) => {
                assert!(message.contains("500"));
                assert!(message.contains("gateway timeout"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
