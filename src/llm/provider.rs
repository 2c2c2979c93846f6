//! Text-generation provider trait and HTTP implementation.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

use super::types::{ChatRole, CompletionRequest, CompletionResponse, TokenUsage};

/// The transport seam of the pipeline.
///
/// Implementations turn a [`CompletionRequest`] into a reply, mapping
/// failures onto the crate's error taxonomy so the retry loop can classify
/// them. Tests substitute mock implementations for the network.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send an instruction and return the extracted reply.
    async fn generate(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

/// Configuration for the HTTP provider.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// API key.
    pub api_key: String,
    /// Base URL override.
    pub base_url: Option<String>,
    /// Default model.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl GenerationConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            model: "claude-3-5-sonnet-20241022".to_string(),
            timeout_secs: 120,
        }
    }

    /// Resolve the credential from `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| Error::config("ANTHROPIC_API_KEY is not set"))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Anthropic-backed text-generation provider.
pub struct AnthropicProvider {
    config: GenerationConfig,
    http: Client,
}

impl AnthropicProvider {
    const DEFAULT_BASE_URL: &'static str = "https://api.anthropic.com";
    const API_VERSION: &'static str = "2023-06-01";

    /// Create a provider. The credential is checked once here; a missing
    /// key is a fatal configuration error, never retried.
    pub fn new(config: GenerationConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::config("no API credential configured"));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(Self::DEFAULT_BASE_URL)
    }
}

// Anthropic API types
#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    id: String,
    model: String,
    content: Vec<ApiContent>,
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    #[allow(dead_code)]
    error_type: String,
}

#[async_trait]
impl TextGenerator for AnthropicProvider {
    async fn generate(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = request
            .model
            .unwrap_or_else(|| self.config.model.clone());

        let messages: Vec<ApiMessage> = request
            .messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    ChatRole::User => "user".to_string(),
                    ChatRole::Assistant => "assistant".to_string(),
                    ChatRole::System => "user".to_string(), // System handled separately
                },
                content: m.content.clone(),
            })
            .collect();

        let api_request = ApiRequest {
            model: model.clone(),
            messages,
            max_tokens: request.max_tokens.unwrap_or(4096),
            system: request.system,
            temperature: request.temperature,
        };

        let url = format!("{}/v1/messages", self.base_url());

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::transient(format!("request timed out: {e}"))
                } else {
                    Error::transient(format!("HTTP request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transient(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.clone());

            return Err(match status.as_u16() {
                401 | 403 => Error::auth(message),
                429 => Error::rate_limited(message),
                s if s >= 500 => Error::transient(format!("server error ({status}): {message}")),
                _ => Error::Provider(format!("unexpected status {status}: {message}")),
            });
        }

        let api_response: ApiResponse = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(format!("failed to parse response: {e}")))?;

        let content = api_response
            .content
            .iter()
            .filter_map(|c| c.text.as_ref())
            .cloned()
            .collect::<Vec<_>>()
            .join("");

        // Structural API drift is not a transient condition.
        if content.trim().is_empty() {
            return Err(Error::malformed("reply carried no message body"));
        }

        Ok(CompletionResponse {
            id: api_response.id,
            model: api_response.model,
            content,
            usage: TokenUsage {
                input_tokens: api_response.usage.input_tokens,
                output_tokens: api_response.usage.output_tokens,
            },
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = GenerationConfig::new("test-key")
            .with_base_url("https://custom.api.com")
            .with_model("claude-3-5-haiku-20241022")
            .with_timeout(60);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, Some("https://custom.api.com".to_string()));
        assert_eq!(config.model, "claude-3-5-haiku-20241022");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_missing_credential_is_config_error() {
        assert!(matches!(
            AnthropicProvider::new(GenerationConfig::new("")),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            AnthropicProvider::new(GenerationConfig::new("   ")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_provider_uses_default_base_url() {
        let provider = AnthropicProvider::new(GenerationConfig::new("key")).unwrap();
        assert_eq!(provider.base_url(), "https://api.anthropic.com");
    }
}
