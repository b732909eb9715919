//! Application Ports
//!
//! ## Driven Ports (Outbound)
//!
//! - `MarketDataPort`: price history from an upstream provider

mod market_data_port;

#[cfg(test)]
pub use market_data_port::MockMarketDataPort;
pub use market_data_port::{MarketDataError, MarketDataPort};
