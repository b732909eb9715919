//! Retry schedule for upstream fetches.
//!
//! Delay before retry `n` (1-based) is `initial * multiplier^(n-1)`, capped
//! at `max_backoff`, then spread by `±jitter_factor` so concurrent requests
//! that failed together do not retry in lockstep.

use std::time::Duration;

use rand::Rng;

use super::config::RetryConfig;

/// Retry schedule for one fetch.
#[derive(Debug)]
pub(super) struct ExponentialBackoff<'a> {
    pub(super) attempt: u32,
    config: &'a RetryConfig,
}

impl<'a> ExponentialBackoff<'a> {
    pub(super) const fn new(config: &'a RetryConfig) -> Self {
        Self { attempt: 0, config }
    }

    /// Record a failed attempt and return the delay before the next one,
    /// or `None` once attempts are exhausted.
    pub(super) fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.config.max_attempts {
            return None;
        }
        Some(self.jitter(self.base_delay(self.attempt)))
    }

    /// Cap a provider-requested delay at the configured maximum.
    pub(super) fn clamp(&self, delay: Duration) -> Duration {
        delay.min(self.config.max_backoff)
    }

    /// Un-jittered delay before retry number `retry` (1-based).
    fn base_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.config.initial_backoff.as_secs_f64() * self.config.multiplier.powi(exponent);
        let cap = self.config.max_backoff.as_secs_f64();

        if secs.is_finite() && secs < cap {
            Duration::from_secs_f64(secs.max(0.0))
        } else {
            self.config.max_backoff
        }
    }

    fn jitter(&self, delay: Duration) -> Duration {
        let factor = self.config.jitter_factor;
        if factor <= 0.0 || delay.is_zero() {
            return delay;
        }

        let spread = factor.min(1.0);
        let scale = rand::rng().random_range(1.0 - spread..=1.0 + spread);
        self.clamp(delay.mul_f64(scale))
    }
}
