//! Request and response types for the text-generation boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Completion request sent to the text-generation service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model to use (falls back to the provider's configured default).
    pub model: Option<String>,
    /// System instruction.
    pub system: Option<String>,
    /// Conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Token budget for the reply.
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 - 1.0).
    pub temperature: Option<f64>,
}

impl CompletionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Token usage reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Total tokens consumed by the round trip.
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Completion response from the text-generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Provider-assigned response id.
    pub id: String,
    /// Model that produced the reply.
    pub model: String,
    /// Extracted reply text.
    pub content: String,
    /// Token usage for the round trip.
    pub usage: TokenUsage,
    /// When the response was received.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new()
            .with_model("claude-3-5-sonnet-20241022")
            .with_system("You are a QA engineer")
            .with_message(ChatMessage::user("Generate test cases"))
            .with_max_tokens(4096)
            .with_temperature(0.7);

        assert_eq!(request.model.as_deref(), Some("claude-3-5-sonnet-20241022"));
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, ChatRole::User);
        assert_eq!(request.max_tokens, Some(4096));
    }

    #[test]
    fn test_usage_total() {
        let usage = TokenUsage {
            input_tokens: 120,
            output_tokens: 480,
        };
        assert_eq!(usage.total(), 600);
    }
}
