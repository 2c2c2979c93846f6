//! Resilient client for the external text-generation service.
//!
//! The service is an opaque, occasionally-unreliable dependency. This
//! module provides:
//!
//! - [`TextGenerator`]: the transport seam (HTTP in production, mocks in
//!   tests)
//! - [`AnthropicProvider`]: the HTTP implementation with status-class
//!   error mapping
//! - [`RetryPolicy`]: the back-off state machine (server-informed
//!   rate-limit delays, exponential transient delays, terminal otherwise)
//! - [`GenerationClient`]: the retrying wrapper that drives the attempt
//!   loop
//!
//! ## Example
//!
//! ```rust,ignore
//! use casegen_core::llm::{AnthropicProvider, GenerationClient, GenerationConfig};
//!
//! let provider = AnthropicProvider::new(GenerationConfig::from_env()?)?;
//! let client = GenerationClient::new(provider)
//!     .with_system("You are a senior QA engineer.");
//!
//! let reply = client.generate_text("Generate test cases for ...").await?;
//! ```

mod backoff;
mod client;
mod provider;
mod types;

pub use backoff::{RetryPolicy, DEFAULT_MAX_RETRIES};
pub use client::{GenerationClient, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
pub use provider::{AnthropicProvider, GenerationConfig, TextGenerator};
pub use types::{ChatMessage, ChatRole, CompletionRequest, CompletionResponse, TokenUsage};
