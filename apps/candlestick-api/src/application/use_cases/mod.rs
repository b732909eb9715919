//! Application Use Cases

mod get_candlesticks;

pub use get_candlesticks::{
    CandlestickError, CandlestickQuery, DEFAULT_DURATION, DEFAULT_TIMEFRAME,
    GetCandlesticksUseCase,
};
