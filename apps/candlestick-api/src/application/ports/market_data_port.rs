//! Market Data Port (Driven Port)
//!
//! Interface for fetching price history from an external provider.
//! The provider is opaque: it is addressed by `(symbol, interval, period)`
//! and answers with a [`RawSeries`] whose labels it chooses itself.

use async_trait::async_trait;

use crate::domain::candlesticks::RawSeries;

/// Market data error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketDataError {
    /// The provider could not be reached or failed on its side.
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable {
        /// Error details.
        message: String,
    },

    /// The provider is throttling requests.
    #[error("Upstream rate limited")]
    RateLimited {
        /// Seconds to wait before retrying, when the provider said so.
        retry_after_secs: Option<u64>,
    },

    /// The provider answered with a body that could not be understood.
    #[error("Invalid upstream response: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },

    /// The provider refused the request parameters.
    #[error("Upstream rejected request: {code} - {message}")]
    Rejected {
        /// Provider error code.
        code: String,
        /// Provider error description.
        message: String,
    },
}

impl MarketDataError {
    /// Short label for metrics and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable { .. } => "unavailable",
            Self::RateLimited { .. } => "rate_limited",
            Self::InvalidResponse { .. } => "invalid_response",
            Self::Rejected { .. } => "rejected",
        }
    }

    /// Whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable { .. } | Self::RateLimited { .. }
        )
    }
}

/// Port for fetching price history from an external provider.
///
/// Implementations return an empty series when the provider has no rows
/// for the request, including when it does not know the symbol.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Fetch raw bars for `symbol` at `interval` granularity over `period`.
    ///
    /// `interval` and `period` are forwarded to the provider unchanged.
    async fn fetch_series(
        &self,
        symbol: &str,
        interval: &str,
        period: &str,
    ) -> Result<RawSeries, MarketDataError>;
}
