//! Yahoo chart API response types.
//!
//! Only the fields the adapter reads are modeled; everything else in the
//! payload is ignored.

use chrono::{DateTime, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::application::ports::MarketDataError;
use crate::domain::candlesticks::RawSeries;

/// Error code Yahoo uses for unknown or delisted symbols.
pub const NOT_FOUND_CODE: &str = "Not Found";

/// Column labels of the provider's tabular shape, in order.
const COLUMNS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

/// Top-level chart response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    /// Response envelope.
    pub chart: ChartEnvelope,
}

/// Chart envelope: either results or an error.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    /// Results (at most one per symbol).
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    /// Provider error.
    #[serde(default)]
    pub error: Option<ChartError>,
}

/// Provider error object.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    /// Error code (e.g. `Not Found`, `Bad Request`).
    pub code: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

impl ChartError {
    /// Whether this error means "no data for this symbol".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == NOT_FOUND_CODE
    }
}

/// Price history for one symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    /// Instrument metadata.
    #[serde(default)]
    pub meta: ChartMeta,
    /// Bar start times, seconds since the epoch.
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    /// Price and volume arrays.
    #[serde(default)]
    pub indicators: Indicators,
}

/// Instrument metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default, rename = "gmtoffset")]
    pub gmt_offset: Option<i32>,
}

/// Indicator arrays.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Indicators {
    /// OHLCV arrays (one element in practice).
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
}

/// Parallel OHLCV arrays; entries are null where the provider has gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteIndicator {
    /// Opening prices.
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    /// High prices.
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    /// Low prices.
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    /// Closing prices.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    /// Traded volume.
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

/// Whether an interval code is finer than one day (`1m`, `90m`, `1h`).
#[must_use]
pub fn is_intraday(interval: &str) -> bool {
    let interval = interval.trim().to_lowercase();
    interval.ends_with('m') || interval.ends_with('h')
}

impl ChartResponse {
    /// Convert into the provider's tabular shape.
    ///
    /// Intraday series are indexed by `Datetime`, daily and coarser series by
    /// `Date` with the time of day dropped. Index timestamps are
    /// exchange-local; the series carries the offset needed to undo that.
    /// Rows missing any of open/high/low/close are skipped. Missing volume
    /// becomes zero.
    ///
    /// # Errors
    ///
    /// Returns `MarketDataError::Rejected` for provider errors other than
    /// "not found", and `InvalidResponse` for timestamps out of range.
    pub fn into_raw_series(self, interval: &str) -> Result<RawSeries, MarketDataError> {
        if let Some(error) = self.chart.error {
            if error.is_not_found() {
                return Ok(RawSeries::empty());
            }
            return Err(MarketDataError::Rejected {
                code: error.code,
                message: error.description,
            });
        }

        let Some(result) = self.chart.result.and_then(|results| results.into_iter().next())
        else {
            return Ok(RawSeries::empty());
        };

        let Some(timestamps) = result.timestamp else {
            return Ok(RawSeries::empty());
        };

        let intraday = is_intraday(interval);
        let offset = result.meta.gmt_offset.unwrap_or(0);
        let index_label = if intraday { "Datetime" } else { "Date" };

        let mut series = RawSeries::new(index_label, COLUMNS.to_vec()).with_utc_offset(offset);
        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

        for (i, ts) in timestamps.iter().enumerate() {
            let (Some(open), Some(high), Some(low), Some(close)) = (
                value_at(&quote.open, i),
                value_at(&quote.high, i),
                value_at(&quote.low, i),
                value_at(&quote.close, i),
            ) else {
                continue;
            };
            let volume = value_at(&quote.volume, i).unwrap_or(0.0);

            let local = exchange_local(*ts, offset).ok_or_else(|| {
                MarketDataError::InvalidResponse {
                    message: format!("timestamp out of range: {ts}"),
                }
            })?;
            let index = if intraday {
                local
            } else {
                local.date().and_time(NaiveTime::MIN)
            };

            series.push(index, vec![open, high, low, close, volume]);
        }

        let skipped = timestamps.len() - series.len();
        if skipped > 0 {
            tracing::debug!(skipped, "Dropped incomplete provider rows");
        }

        Ok(series)
    }
}

fn value_at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

fn exchange_local(epoch_secs: i64, offset_secs: i32) -> Option<NaiveDateTime> {
    epoch_secs
        .checked_add(i64::from(offset_secs))
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.naive_utc())
}
