//! Resilient client over a text generator.

use tracing::{debug, warn};

use crate::error::Result;

use super::backoff::RetryPolicy;
use super::provider::TextGenerator;
use super::types::{ChatMessage, CompletionRequest, CompletionResponse};

/// Default sampling temperature for generation requests.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default token budget for a reply.
pub const DEFAULT_MAX_TOKENS: u32 = 4_096;

/// Retrying wrapper around a [`TextGenerator`].
///
/// Drives the attempt loop: classify the failure, ask the policy for a
/// delay, sleep it, re-attempt; surface the last error once the policy
/// declares the failure terminal or the attempt budget spent.
pub struct GenerationClient<T: TextGenerator> {
    generator: T,
    policy: RetryPolicy,
    system: Option<String>,
    temperature: f64,
    max_tokens: u32,
}

impl<T: TextGenerator> GenerationClient<T> {
    pub fn new(generator: T) -> Self {
        Self {
            generator,
            policy: RetryPolicy::default(),
            system: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the system instruction sent with every request.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }

    /// Send an instruction, retrying per policy, and return the response.
    pub async fn generate(&self, prompt: &str) -> Result<CompletionResponse> {
        let mut attempt: u32 = 0;
        loop {
            match self.generator.generate(self.build_request(prompt)).await {
                Ok(response) => {
                    debug!(
                        attempt,
                        tokens = response.usage.total(),
                        "generation succeeded"
                    );
                    return Ok(response);
                }
                Err(err) => match self.policy.delay_for(&err, attempt) {
                    Some(delay) => {
                        warn!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "provider call failed, backing off"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    /// Send an instruction and return only the reply text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate(prompt).await.map(|response| response.content)
    }

    fn build_request(&self, prompt: &str) -> CompletionRequest {
        let mut request = CompletionRequest::new()
            .with_message(ChatMessage::user(prompt))
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        if let Some(system) = &self.system {
            request = request.with_system(system.clone());
        }
        request
    }
}
