//! Reconnect delay policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the delay grows between consecutive failed attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backoff {
    /// Same delay every time.
    Fixed(Duration),
    /// `initial * factor^(attempt - 1)`, capped at `max`.
    Exponential {
        initial: Duration,
        max: Duration,
        factor: u32,
    },
}

/// Configuration for reconnecting a dropped feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectPolicy {
    /// Delay growth.
    pub backoff: Backoff,
    /// Consecutive failures tolerated before giving up. `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            backoff: Backoff::Exponential {
                initial: Duration::from_secs(5),
                max: Duration::from_secs(300),
                factor: 2,
            },
            max_attempts: Some(10),
        }
    }
}

impl ReconnectPolicy {
    /// Constant delay, retrying forever.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            backoff: Backoff::Fixed(delay),
            max_attempts: None,
        }
    }

    pub fn exponential(initial: Duration, max: Duration) -> Self {
        Self {
            backoff: Backoff::Exponential {
                initial,
                max,
                factor: 2,
            },
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Delay before reconnect number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential {
                initial,
                max,
                factor,
            } => {
                let exponent = attempt.saturating_sub(1);
                let multiplier = factor.max(1).checked_pow(exponent).unwrap_or(u32::MAX);
                initial
                    .checked_mul(multiplier)
                    .map_or(max, |delay| delay.min(max))
            }
        }
    }

    /// Whether `attempt` consecutive failures exhaust the policy.
    pub fn is_exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt >= max)
    }
}
