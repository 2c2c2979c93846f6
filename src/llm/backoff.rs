//! Retry policy for provider invocations.
//!
//! Modeled as an explicit state machine over (classified failure, attempt
//! count) rather than nested conditionals, so the back-off policy is a
//! testable unit independent of the transport. Rate limiting has its own
//! server-informed delay path, distinct from generic transient back-off.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::Error;

/// Hard cap on re-attempts after the initial one.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Padding added on top of a server-suggested wait.
const RATE_LIMIT_PAD_MS: u64 = 1_000;

/// Base delay when the server gave no suggested wait.
const RATE_LIMIT_BASE_MS: u64 = 3_000;

/// Base delay for transient network/server failures.
const TRANSIENT_BASE_MS: u64 = 1_000;

/// Server-suggested wait in a rate-limit payload ("try again in 2.5s").
static SUGGESTED_WAIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)try again in\s+(\d+(?:\.\d+)?)\s*s").expect("Invalid regex")
});

/// Back-off policy for the generation client's attempt loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Re-attempts allowed after the initial one.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Delay before re-attempting after `error` on attempt `attempt`
    /// (0-based), or `None` when the failure is terminal or the attempt
    /// budget is spent.
    ///
    /// - Rate limit: server-suggested wait + 1s, else `3s * 2^attempt`
    /// - Transient (network/5xx): `1s * 2^attempt`
    /// - Auth, malformed reply, anything else: terminal
    pub fn delay_for(&self, error: &Error, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }
        match error {
            Error::RateLimited { message } => Some(rate_limit_delay(message, attempt)),
            Error::ProviderTransient(_) => Some(Duration::from_millis(
                TRANSIENT_BASE_MS * 2u64.pow(attempt),
            )),
            _ => None,
        }
    }
}

/// Compute the rate-limit delay from the provider's payload message.
fn rate_limit_delay(message: &str, attempt: u32) -> Duration {
    match suggested_wait_ms(message) {
        Some(ms) => Duration::from_millis(ms + RATE_LIMIT_PAD_MS),
        None => Duration::from_millis(RATE_LIMIT_BASE_MS * 2u64.pow(attempt)),
    }
}

/// Parse a server-suggested wait duration out of an error payload.
fn suggested_wait_ms(message: &str) -> Option<u64> {
    SUGGESTED_WAIT_PATTERN
        .captures(message)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|seconds| (seconds * 1000.0).round() as u64)
}
