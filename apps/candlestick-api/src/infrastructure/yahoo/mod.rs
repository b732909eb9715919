//! Yahoo Finance Chart Adapter
//!
//! REST implementation of `MarketDataPort` backed by the public Yahoo
//! Finance chart endpoint (`/v8/finance/chart/{symbol}`).

mod adapter;
mod api_types;
mod backoff;
mod config;

pub use adapter::YahooChartAdapter;
pub use api_types::ChartResponse;
pub use config::{RetryConfig, YahooConfig};
