//! Error types for casegen-core.

use thiserror::Error;

/// Result type alias using casegen-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during test-case generation.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid configuration (e.g. no API credential)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential rejected by the text-generation service
    #[error("Provider rejected credentials: {0}")]
    ProviderAuth(String),

    /// The service asked us to slow down
    #[error("Provider rate limited: {message}")]
    RateLimited { message: String },

    /// Transient provider failure (network, timeout, 5xx)
    #[error("Transient provider failure: {0}")]
    ProviderTransient(String),

    /// Reply did not have the expected shape
    #[error("Malformed provider reply: {0}")]
    MalformedReply(String),

    /// Terminal provider failure outside the retryable status classes
    #[error("Provider error: {0}")]
    Provider(String),

    /// A requirement lacks the minimum content to be processed
    #[error("Invalid requirement: {0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an auth-rejection error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::ProviderAuth(message.into())
    }

    /// Create a rate-limit error carrying the provider's payload message.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Create a transient provider error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::ProviderTransient(message.into())
    }

    /// Create a malformed-reply error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedReply(message.into())
    }

    /// Whether the retry loop may re-attempt after this error.
    ///
    /// Only rate limiting and transient failures can self-heal; credential
    /// problems and structural API drift are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::ProviderTransient(_))
    }

    /// Whether this error aborts a whole batch rather than one requirement.
    pub fn is_fatal_for_batch(&self) -> bool {
        matches!(self, Self::Config(_) | Self::ProviderAuth(_))
    }
}
