//! Core `CompletionClient` trait and `ApiClient` implementation.
//!
//! `ApiClient` calls any OpenAI-compatible `/v1/chat/completions` endpoint
//! (OpenAI, Groq, Ollama in OpenAI mode, LM Studio, vLLM, ...). All
//! connection details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while requesting a completion.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport, connection or non-success status error.
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The response body was not the expected chat-completion JSON.
    #[error("invalid LLM response: {0}")]
    InvalidResponse(String),

    /// The LLM returned a response with no text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Transport(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// CompletionClient trait
// ---------------------------------------------------------------------------

/// A remote service that turns a prompt into generated text.
///
/// Implementors must be `Send + Sync` so they can be shared with the
/// pipeline task as `Arc<dyn CompletionClient>`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint with a single
/// user-role message.
pub struct ApiClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ApiClient {
    /// Build an `ApiClient` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`; a default client is used if the builder fails.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "temperature": self.config.temperature
        })
    }
}

#[async_trait]
impl CompletionClient for ApiClient {
    /// The `Authorization: Bearer ...` header is attached only when
    /// `config.api_key` is a non-empty string.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        log::debug!("llm: POST {} (model={})", self.endpoint(), self.config.model);

        let mut req = self.client.post(self.endpoint()).json(&self.request_body(prompt));

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?.error_for_status()?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        extract_content(&json)
    }
}

/// Pull `choices[0].message.content` out of a chat-completion body.
///
/// The text is returned untouched; callers surface it as-is.
pub fn extract_content(json: &serde_json::Value) -> Result<String, LlmError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| {
            LlmError::InvalidResponse("missing choices[0].message.content".into())
        })?;

    if content.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(content.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
