//! Yahoo adapter configuration.

use std::time::Duration;

use crate::infrastructure::config::{DEFAULT_USER_AGENT, DEFAULT_YAHOO_BASE_URL, UpstreamSettings};

/// Configuration for the Yahoo chart adapter.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// Base URL of the chart API (no trailing slash).
    pub base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Retry policy configuration.
    pub retry: RetryConfig,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

impl YahooConfig {
    /// Create a configuration pointing at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

impl From<&UpstreamSettings> for YahooConfig {
    fn from(settings: &UpstreamSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            timeout: settings.timeout,
            user_agent: settings.user_agent.clone(),
            retry: RetryConfig {
                max_attempts: settings.max_attempts,
                ..RetryConfig::default()
            },
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts per fetch, including the first one.
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
    /// Random spread applied to each delay, as a fraction (0.1 = ±10%).
    pub jitter_factor: f64,
}

impl RetryConfig {
    /// A single attempt, no retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}
