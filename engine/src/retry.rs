//! Retry policy for the optimistic item write.
//!
//! A conflicted compare-and-swap means another detection or a manual
//! update won the race; the whole read-plan-write sequence re-runs from a
//! fresh read. The bound is small on purpose: sustained conflicts on one
//! item indicate redundant readers hammering the same tag, and the caller
//! is better served by a `Conflict` error than by an unbounded loop.

use std::time::Duration;

/// Bounded retry with exponential backoff for conflicted writes.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Multiplier applied per retry.
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(10),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (zero-based).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.initial_delay * self.multiplier.saturating_pow(retry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(10));
        assert_eq!(policy.delay_for(1), Duration::from_millis(20));
        assert_eq!(policy.delay_for(2), Duration::from_millis(40));
    }
}
