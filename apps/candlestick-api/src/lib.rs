#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Candlestick API - Chart-Ready OHLC Bars
//!
//! An HTTP service that fetches historical price bars for a ticker from
//! Yahoo Finance and returns them as `{time, open, high, low, close}`
//! records with epoch-second timestamps.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Provider-agnostic bar types and normalization
//!   - `candlesticks`: Raw series, normalized bars, `BarNormalizer`
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: `MarketDataPort` for fetching raw series
//!   - `use_cases`: `GetCandlesticksUseCase` (fetch, then normalize)
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `yahoo`: Chart API client implementing `MarketDataPort`
//!   - `http`: Axum router, CORS and error envelope
//!   - `config`: Environment configuration
//!   - `metrics` / `telemetry`: Prometheus and tracing setup
//!
//! # Data Flow
//!
//! ```text
//! GET /api/stocks/{symbol}/candlesticks/?timeframe=&duration=
//!        │
//!        ▼
//! GetCandlesticksUseCase ──► MarketDataPort (Yahoo chart API)
//!        │                         │
//!        │◄──────── RawSeries ─────┘
//!        ▼
//! BarNormalizer ──► {"status":"success","data":[{time,open,high,low,close}]}
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Bar types and normalization with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::candlesticks::{BarError, BarNormalizer, NormalizedBar, RawBar, RawSeries};

// Application
pub use application::ports::{MarketDataError, MarketDataPort};
pub use application::use_cases::{CandlestickError, CandlestickQuery, GetCandlesticksUseCase};

// Infrastructure config
pub use infrastructure::config::{
    AllowList, ConfigError, CorsSettings, ServerSettings, ServiceConfig, UpstreamSettings,
};

// HTTP
pub use infrastructure::http::{AppState, HttpServer, ServerError, create_router};

// Yahoo adapter
pub use infrastructure::yahoo::{RetryConfig, YahooChartAdapter, YahooConfig};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
