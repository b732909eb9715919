//! Candlestick Domain Services

mod bar_normalizer;

pub use bar_normalizer::BarNormalizer;
