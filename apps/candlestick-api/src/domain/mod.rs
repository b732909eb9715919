//! Domain Layer - Candlestick data types and normalization.
//!
//! Pure types and transformations with no I/O. The provider-facing
//! tabular shape (`RawSeries`) and the chart-facing record
//! (`NormalizedBar`) both live here, together with the normalizer that
//! maps one onto the other.

/// Candlestick bounded context.
pub mod candlesticks;
