//! Exponential-backoff retry policy shared by the HTTP clients.
//!
//! Retrying is a transport concern: the traversal controller never re-issues
//! a collaborator call itself, so transient 429/5xx handling lives down here.

use std::time::Duration;

use crate::domain::models::RetryConfig;

/// Exponential backoff with a cap. Attempt numbering is 0-based: attempt 0
/// is the first retry.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config.initial_backoff_ms,
            config.max_backoff_ms,
        )
    }

    /// Disable retries entirely (used by tests that assert on single calls).
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Delay before the given retry attempt: `initial * 2^attempt`, capped.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let multiplier = 2u64.saturating_pow(attempt);
        let delay_ms = self
            .initial_backoff_ms
            .saturating_mul(multiplier)
            .min(self.max_backoff_ms);
        Duration::from_millis(delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
