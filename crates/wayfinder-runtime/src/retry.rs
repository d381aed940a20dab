//! Retry policy for section lookups.
//!
//! Lazily rendered pages mount their anchors some time after the hash
//! changes, so the navigator polls for the target element. [`RetryPolicy`]
//! bounds that poll: how many lookups in total, and how long to wait between
//! consecutive lookups.
//!
//! # Determinism
//!
//! Delays use fixed formulas (no jitter) so a recorded navigation replays
//! with identical timing.
//!
//! # Example
//!
//! ```
//! use wayfinder_runtime::retry::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::default();
//! assert_eq!(policy.max_attempts, 20);
//! assert_eq!(policy.delay(1), Duration::from_millis(150));
//! assert_eq!(policy.worst_case_wait(), Duration::from_millis(19 * 150));
//! ```

#![forbid(unsafe_code)]

use web_time::Duration;

/// Default total lookups per intent.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;
/// Default wait between lookups.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(150);

/// Backoff strategy between lookups.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum BackoffStrategy {
    /// Same delay every time.
    Fixed {
        /// Delay in milliseconds.
        delay_ms: u64,
    },
    /// `base_ms * attempt`, capped at `max_ms`.
    Linear {
        /// Base delay in milliseconds.
        base_ms: u64,
        /// Maximum delay cap in milliseconds.
        max_ms: u64,
    },
}

/// Bounded polling policy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RetryPolicy {
    /// Total lookups, including the first one. `0` behaves like `1`.
    pub max_attempts: u32,
    /// Wait between consecutive lookups.
    pub backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Fixed-delay policy.
    #[must_use]
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::Fixed {
                delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            },
        }
    }

    /// A single lookup, no polling.
    #[must_use]
    pub fn once() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// Effective attempt budget.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Whether another lookup is allowed after `attempts_made` lookups.
    #[must_use]
    pub fn allows_another(&self, attempts_made: u32) -> bool {
        attempts_made < self.attempts()
    }

    /// Delay to wait after lookup number `attempt` (1-based) failed.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match &self.backoff {
            BackoffStrategy::Fixed { delay_ms } => Duration::from_millis(*delay_ms),
            BackoffStrategy::Linear { base_ms, max_ms } => {
                let delay = base_ms.saturating_mul(u64::from(attempt.max(1)));
                Duration::from_millis(delay.min(*max_ms))
            }
        }
    }

    /// Longest time between the first and the last lookup.
    #[must_use]
    pub fn worst_case_wait(&self) -> Duration {
        (1..self.attempts()).map(|attempt| self.delay(attempt)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_covers_about_three_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 20);
        assert_eq!(policy.worst_case_wait(), Duration::from_millis(2_850));
    }

    #[test]
    fn zero_attempts_still_looks_once() {
        let policy = RetryPolicy::fixed(0, Duration::from_millis(10));
        assert_eq!(policy.attempts(), 1);
        assert!(policy.allows_another(0));
        assert!(!policy.allows_another(1));
        assert_eq!(policy.worst_case_wait(), Duration::ZERO);
    }

    #[test]
    fn allows_another_up_to_budget() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(10));
        assert!(policy.allows_another(2));
        assert!(!policy.allows_another(3));
    }

    #[test]
    fn linear_backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 5,
            backoff: BackoffStrategy::Linear {
                base_ms: 100,
                max_ms: 250,
            },
        };
        assert_eq!(policy.delay(1), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(250));
        assert_eq!(policy.worst_case_wait(), Duration::from_millis(800));
    }

    #[test]
    fn once_never_waits() {
        let policy = RetryPolicy::once();
        assert_eq!(policy.attempts(), 1);
        assert_eq!(policy.delay(1), Duration::ZERO);
    }
}
