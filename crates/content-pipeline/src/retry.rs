use std::time::Duration;

use async_trait::async_trait;

/// Suspends the current pipeline run between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Non-blocking sleep on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Attempt caps and backoff delays for generation and expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Generation attempts before giving up.
    pub max_attempts: u32,
    /// Wait after a malformed or too-short response.
    pub invalid_response_delay: Duration,
    /// Base for the `base * attempt` wait after a failed backend call.
    pub error_backoff_base: Duration,
    pub expansion_attempts: u32,
    /// Wait after a failed expansion call.
    pub expansion_failure_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            invalid_response_delay: Duration::from_millis(2_000),
            error_backoff_base: Duration::from_millis(2_000),
            expansion_attempts: 3,
            expansion_failure_delay: Duration::from_millis(1_000),
        }
    }
}

impl RetryPolicy {
    /// Same attempt caps, zero waits.
    pub fn immediate() -> Self {
        Self {
            invalid_response_delay: Duration::ZERO,
            error_backoff_base: Duration::ZERO,
            expansion_failure_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn error_backoff(&self, attempt: u32) -> Duration {
        self.error_backoff_base.saturating_mul(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_backoff_grows_with_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.error_backoff(1), Duration::from_millis(2_000));
        assert_eq!(policy.error_backoff(2), Duration::from_millis(4_000));
        assert_eq!(policy.error_backoff(3), Duration::from_millis(6_000));
    }

    #[test]
    fn immediate_policy_keeps_attempt_caps() {
        let policy = RetryPolicy::immediate();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.expansion_attempts, 3);
        assert_eq!(policy.error_backoff(3), Duration::ZERO);
    }
}
