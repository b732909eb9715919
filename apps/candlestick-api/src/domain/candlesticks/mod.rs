//! Candlestick Bounded Context
//!
//! Reshapes provider price history into the ordered `{time, open, high,
//! low, close}` records consumed by charting widgets.

pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::BarError;
pub use services::BarNormalizer;
pub use value_objects::{NormalizedBar, RawBar, RawSeries};
