//! Normalized Candlestick Bar

use serde::{Deserialize, Serialize};

/// A candlestick in the shape charting libraries expect.
///
/// Serializes to exactly `{"time", "open", "high", "low", "close"}` in that
/// order. Volume and any other provider columns never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizedBar {
    /// Bar start, seconds since the Unix epoch.
    pub time: i64,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
}
