//! Get Candlesticks Use Case
//!
//! Fetch-then-transform: one provider read, one normalization pass, no
//! caching and no retries at this level.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::domain::candlesticks::{BarError, BarNormalizer, NormalizedBar};

/// Interval used when the caller does not specify one.
pub const DEFAULT_TIMEFRAME: &str = "1m";

/// Lookback window used when the caller does not specify one.
pub const DEFAULT_DURATION: &str = "1d";

/// Parameters of a candlestick request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandlestickQuery {
    /// Ticker symbol, validated only by the provider.
    pub symbol: String,
    /// Bar interval code (e.g. `1m`, `1h`, `1d`).
    pub timeframe: String,
    /// Lookback window code (e.g. `1d`, `5d`, `1mo`).
    pub duration: String,
}

impl CandlestickQuery {
    /// Create a query with the default timeframe and duration.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: DEFAULT_TIMEFRAME.to_string(),
            duration: DEFAULT_DURATION.to_string(),
        }
    }

    /// Set the bar interval.
    #[must_use]
    pub fn with_timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = timeframe.into();
        self
    }

    /// Set the lookback window.
    #[must_use]
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }
}

/// Errors from the candlestick use case.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CandlestickError {
    /// The provider could not serve the request.
    #[error(transparent)]
    Upstream(#[from] MarketDataError),

    /// The provider's data lacks a required column.
    #[error(transparent)]
    Schema(#[from] BarError),
}

/// Use case producing chart-ready candlesticks for a symbol.
pub struct GetCandlesticksUseCase<M>
where
    M: MarketDataPort + ?Sized,
{
    market_data: Arc<M>,
}

impl<M> GetCandlesticksUseCase<M>
where
    M: MarketDataPort + ?Sized,
{
    /// Create a new `GetCandlesticksUseCase`.
    pub const fn new(market_data: Arc<M>) -> Self {
        Self { market_data }
    }

    /// Fetch and normalize candlesticks.
    ///
    /// An empty vector means the provider returned no rows. That covers both
    /// "no trading in the window" and "unknown symbol"; the provider does not
    /// distinguish them.
    ///
    /// # Errors
    ///
    /// Returns `CandlestickError::Upstream` if the provider call fails and
    /// `CandlestickError::Schema` if its data lacks a required column.
    #[tracing::instrument(
        name = "get_candlesticks",
        skip(self, query),
        fields(symbol = %query.symbol, timeframe = %query.timeframe, duration = %query.duration)
    )]
    pub async fn execute(
        &self,
        query: &CandlestickQuery,
    ) -> Result<Vec<NormalizedBar>, CandlestickError> {
        let started = Instant::now();

        let series = self
            .market_data
            .fetch_series(&query.symbol, &query.timeframe, &query.duration)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Upstream fetch failed"))?;

        let bars = BarNormalizer::normalize(&series)
            .inspect_err(|e| tracing::error!(error = %e, "Provider schema mismatch"))?;

        if bars.is_empty() {
            tracing::info!("Provider returned no rows");
        }

        tracing::debug!(
            bars = bars.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Candlesticks normalized"
        );

        Ok(bars)
    }
}
