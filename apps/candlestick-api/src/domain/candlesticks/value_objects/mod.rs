//! Candlestick Value Objects

mod normalized_bar;
mod raw_series;

pub use normalized_bar::NormalizedBar;
pub use raw_series::{RawBar, RawSeries};
