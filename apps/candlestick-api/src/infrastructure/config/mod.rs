//! Configuration Module
//!
//! Configuration loading for the candlestick service.

mod settings;

pub use settings::{
    AllowList, ConfigError, CorsSettings, DEFAULT_USER_AGENT, DEFAULT_YAHOO_BASE_URL,
    ServerSettings, ServiceConfig, UpstreamSettings,
};
